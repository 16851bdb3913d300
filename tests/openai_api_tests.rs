use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use polyai::generate::{
    embed_many, generate_image, generate_speech, generate_text, generate_transcription, moderate,
    rerank, stream_text, EmbedManyOptions, GenerateImageOptions, GenerateSpeechOptions,
    GenerateTextOptions, ModerateOptions, RerankOptions, TranscriptionOptions,
};
use polyai::model::{FinishReason, Message, TextStreamPart};
use polyai::{AiProvider, ClientError, ProviderRegistry, ProviderSettings};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn openai(server: &MockServer) -> std::sync::Arc<dyn AiProvider> {
    init_tracing();
    ProviderRegistry::with_builtins().get(
        "openai",
        ProviderSettings::new()
            .with_api_key("sk-test")
            .with_base_url(format!("{}/v1", server.uri())),
    )
}

#[tokio::test]
async fn chat_completion_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "Hello"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hi!"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 9, "completion_tokens": 2, "total_tokens": 11}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = openai(&server);
    let model = provider.language_model("gpt-4o-mini").unwrap();
    let mut options = GenerateTextOptions::new(model.as_ref(), vec![Message::user("Hello")]);
    options.system = Some("be brief".to_string());

    let result = generate_text(options).await.unwrap();

    assert_eq!(result.text, "Hi!");
    assert_eq!(result.finish_reason, FinishReason::Stop);
    assert_eq!(result.usage.total_tokens(), Some(11));
}

#[tokio::test]
async fn custom_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("x-title", "my-app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = ProviderRegistry::new().get(
        "acme",
        ProviderSettings::new()
            .with_base_url(server.uri())
            .with_header("X-Title", "my-app"),
    );
    let model = provider.language_model("acme-1").unwrap();

    let result = generate_text(GenerateTextOptions::new(
        model.as_ref(),
        vec![Message::user("ping")],
    ))
    .await
    .unwrap();
    assert_eq!(result.text, "ok");
}

#[tokio::test]
async fn api_errors_carry_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Rate limit reached", "type": "rate_limit_error"}
        })))
        .mount(&server)
        .await;

    let provider = openai(&server);
    let model = provider.language_model("gpt-4o-mini").unwrap();
    let err = generate_text(GenerateTextOptions::new(
        model.as_ref(),
        vec![Message::user("Hello")],
    ))
    .await
    .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "rate_limit_error: Rate limit reached");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn fallback_without_key_sends_no_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Missing API key"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        ProviderRegistry::new().get("unlisted", ProviderSettings::new().with_base_url(server.uri()));
    let model = provider.language_model("m").unwrap();
    let err = generate_text(GenerateTextOptions::new(
        model.as_ref(),
        vec![Message::user("hi")],
    ))
    .await
    .unwrap_err();

    assert_eq!(err.status(), Some(401));
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn streaming_stops_at_done_marker() {
    let server = MockServer::start().await;
    let sse = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\",\"content\":\"\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"},\"finish_reason\":\"stop\"}]}\n\n",
        "data: {\"choices\":[],\"usage\":{\"prompt_tokens\":4,\"completion_tokens\":2}}\n\n",
        "data: [DONE]\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse, "text/event-stream"))
        .mount(&server)
        .await;

    let provider = openai(&server);
    let model = provider.language_model("gpt-4o-mini").unwrap();
    let stream = stream_text(GenerateTextOptions::new(
        model.as_ref(),
        vec![Message::user("Hello")],
    ))
    .await
    .unwrap();
    let parts: Vec<_> = stream.map(|p| p.unwrap()).collect().await;

    let text: String = parts
        .iter()
        .filter_map(|p| match p {
            TextStreamPart::Delta(d) => Some(d.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(text, "Hello");
    assert!(parts.contains(&TextStreamPart::Finish(FinishReason::Stop)));
    assert!(matches!(
        parts.last(),
        Some(TextStreamPart::Usage(u)) if u.total_tokens() == Some(6)
    ));
}

#[tokio::test]
async fn embeddings_are_returned_in_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(body_partial_json(json!({
            "model": "text-embedding-3-small",
            "input": ["first", "second"],
            "encoding_format": "float"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"index": 1, "embedding": [0.5, 0.5]},
                {"index": 0, "embedding": [1.0, 0.0]}
            ],
            "usage": {"prompt_tokens": 4}
        })))
        .mount(&server)
        .await;

    let provider = openai(&server);
    let model = provider.embedding_model("text-embedding-3-small").unwrap();
    let result = embed_many(EmbedManyOptions {
        model: model.as_ref(),
        values: vec!["first".to_string(), "second".to_string()],
        dimensions: None,
    })
    .await
    .unwrap();

    assert_eq!(result.embeddings, vec![vec![1.0, 0.0], vec![0.5, 0.5]]);
    assert_eq!(result.usage.prompt_tokens, Some(4));
}

#[tokio::test]
async fn image_generation_maps_entries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(body_partial_json(json!({"prompt": "a red fox", "n": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created": 1,
            "data": [{"b64_json": "aGVsbG8=", "revised_prompt": "a red fox in snow"}]
        })))
        .mount(&server)
        .await;

    let provider = openai(&server);
    let model = provider.image_model("gpt-image-1").unwrap();
    let mut options = GenerateImageOptions::new(model.as_ref(), "a red fox");
    options.n = Some(1);
    let result = generate_image(options).await.unwrap();

    assert_eq!(result.images.len(), 1);
    let image = &result.images[0];
    assert_eq!(image.revised_prompt.as_deref(), Some("a red fox in snow"));
    assert_eq!(image.bytes().unwrap(), Some(b"hello".to_vec()));
}

#[tokio::test]
async fn speech_returns_raw_audio() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_partial_json(json!({
            "model": "tts-1",
            "input": "Hello world",
            "voice": "alloy"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"ID3fake".to_vec(), "audio/mpeg"))
        .mount(&server)
        .await;

    let provider = openai(&server);
    let model = provider.speech_model("tts-1").unwrap();
    let result = generate_speech(GenerateSpeechOptions::new(model.as_ref(), "Hello world"))
        .await
        .unwrap();

    assert_eq!(result.audio.as_ref(), b"ID3fake");
    assert_eq!(result.media_type, "audio/mpeg");
}

#[tokio::test]
async fn transcription_uploads_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .and(body_string_contains("whisper-1"))
        .and(body_string_contains("filename=\"audio.wav\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "hello there",
            "language": "english",
            "duration": 1.25
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = openai(&server);
    let model = provider.transcription_model("whisper-1").unwrap();
    let result = generate_transcription(TranscriptionOptions::new(
        model.as_ref(),
        &b"RIFF....WAVE"[..],
        "audio/wav",
    ))
    .await
    .unwrap();

    assert_eq!(result.text, "hello there");
    assert_eq!(result.duration_secs, Some(1.25));

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap();
    assert!(content_type
        .to_str()
        .unwrap()
        .starts_with("multipart/form-data"));
}

#[tokio::test]
async fn moderation_reports_flags() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/moderations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "modr-1",
            "model": "omni-moderation-latest",
            "results": [{
                "flagged": true,
                "categories": {"violence": true, "hate": false},
                "category_scores": {"violence": 0.91, "hate": 0.01}
            }]
        })))
        .mount(&server)
        .await;

    let provider = openai(&server);
    let model = provider.moderation_model("omni-moderation-latest").unwrap();
    let result = moderate(ModerateOptions {
        model: model.as_ref(),
        input: vec!["some text".to_string()],
    })
    .await
    .unwrap();

    assert!(result.any_flagged());
    assert_eq!(result.results[0].categories.get("violence"), Some(&true));
    assert_eq!(result.results[0].category_scores.get("hate"), Some(&0.01));
}

#[tokio::test]
async fn rerank_maps_hits_and_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/rerank"))
        .and(header("authorization", "Bearer sf-key"))
        .and(body_partial_json(json!({
            "model": "BAAI/bge-reranker-v2-m3",
            "query": "capital of France",
            "top_n": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "r-1",
            "results": [
                {"index": 1, "relevance_score": 0.98, "document": {"text": "Paris is the capital"}}
            ],
            "meta": {"tokens": {"input_tokens": 12, "output_tokens": 0}}
        })))
        .mount(&server)
        .await;

    let provider = ProviderRegistry::with_builtins().get(
        "siliconflow",
        ProviderSettings::new()
            .with_api_key("sf-key")
            .with_base_url(format!("{}/v1", server.uri())),
    );
    let model = provider.rerank_model("BAAI/bge-reranker-v2-m3").unwrap();
    let mut options = RerankOptions::new(
        model.as_ref(),
        "capital of France",
        vec!["Berlin".to_string(), "Paris is the capital".to_string()],
    );
    options.top_n = Some(1);
    let result = rerank(options).await.unwrap();

    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].index, 1);
    assert_eq!(result.results[0].document.as_deref(), Some("Paris is the capital"));
    assert_eq!(result.usage.and_then(|u| u.prompt_tokens), Some(12));
}

#[tokio::test]
async fn empty_choices_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let provider = openai(&server);
    let model = provider.language_model("gpt-4o-mini").unwrap();
    let err = generate_text(GenerateTextOptions::new(
        model.as_ref(),
        vec![Message::user("Hello")],
    ))
    .await
    .unwrap_err();

    assert!(matches!(err, ClientError::Provider(_)));
}

#[tokio::test]
async fn in_band_stream_errors_are_surfaced() {
    let server = MockServer::start().await;
    let sse = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        "data: {\"error\":{\"message\":\"upstream provider overloaded\",\"code\":502}}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse, "text/event-stream"))
        .mount(&server)
        .await;

    let provider = ProviderRegistry::with_builtins().get(
        "openrouter",
        ProviderSettings::new()
            .with_api_key("sk-or")
            .with_base_url(format!("{}/api/v1", server.uri())),
    );
    let model = provider.language_model("openai/gpt-4o-mini").unwrap();
    let stream = stream_text(GenerateTextOptions::new(
        model.as_ref(),
        vec![Message::user("Hello")],
    ))
    .await
    .unwrap();
    let items: Vec<_> = stream.collect().await;

    assert!(matches!(&items[0], Ok(TextStreamPart::Delta(d)) if d == "Hel"));
    assert!(matches!(
        items.last(),
        Some(Err(ClientError::Provider(msg))) if msg == "upstream provider overloaded"
    ));
}

#[tokio::test]
async fn timeout_setting_bounds_each_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_secs(3))
                .set_body_json(json!({
                    "choices": [{"message": {"role": "assistant", "content": "late"}}]
                })),
        )
        .mount(&server)
        .await;

    let provider = ProviderRegistry::new().get(
        "slow-host",
        ProviderSettings::new()
            .with_base_url(server.uri())
            .with_timeout(std::time::Duration::from_millis(200)),
    );
    let model = provider.language_model("m").unwrap();
    let err = generate_text(GenerateTextOptions::new(
        model.as_ref(),
        vec![Message::user("hi")],
    ))
    .await
    .unwrap_err();

    assert!(matches!(err, ClientError::Http(ref e) if e.is_timeout()), "got {err:?}");
}
