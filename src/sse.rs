//! Server-Sent Events decoding for streamed chat completions.
//!
//! Vendors stream completions as SSE frames:
//! ```text
//! event: content_block_delta
//! data: {"key": "value"}
//!
//! data: [DONE]
//! ```
//! Only `data:` payloads matter here; event names are carried inside the
//! JSON by every vendor this crate talks to.

use async_stream::try_stream;
use bytes::BytesMut;
use futures::stream::{Stream, StreamExt};

use crate::client::ClientError;

/// Extension trait turning a streaming HTTP response into SSE data payloads.
pub trait SseResponseExt {
    /// Stream the content of each `data:` line.
    ///
    /// Ends at the `[DONE]` marker or when the body ends.
    fn sse(self) -> impl Stream<Item = Result<String, ClientError>> + Send;
}

impl SseResponseExt for reqwest::Response {
    fn sse(self) -> impl Stream<Item = Result<String, ClientError>> + Send {
        decode(self.bytes_stream())
    }
}

/// Decode SSE data payloads from any byte stream.
pub fn decode<S, B, E>(bytes: S) -> impl Stream<Item = Result<String, ClientError>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Into<ClientError> + Send,
{
    try_stream! {
        let mut bytes = Box::pin(bytes);
        let mut buffer = BytesMut::new();

        'outer: loop {
            let chunk = bytes.next().await;
            let ended = chunk.is_none();
            if let Some(chunk) = chunk {
                let chunk = chunk.map_err(Into::<ClientError>::into)?;
                buffer.extend_from_slice(chunk.as_ref());
            }

            // Split on '\n' at the byte level so multi-byte characters cut across
            // chunk boundaries are reassembled before decoding.
            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line = buffer.split_to(pos + 1);
                if let Some(data) = data_of(&String::from_utf8_lossy(&line)) {
                    if is_done_marker(&data) {
                        break 'outer;
                    }
                    yield data;
                }
            }

            if ended {
                if let Some(data) = data_of(&String::from_utf8_lossy(&buffer)) {
                    if !is_done_marker(&data) {
                        yield data;
                    }
                }
                break;
            }
        }
    }
}

fn data_of(line: &str) -> Option<String> {
    parse_sse_line(line.trim_end_matches(['\r', '\n']))
        .filter(|data| !data.is_empty())
        .map(str::to_string)
}

/// Extract the payload of a `data:` line.
///
/// # Example
/// ```
/// use polyai::sse::parse_sse_line;
///
/// assert_eq!(parse_sse_line("data: {\"k\": 1}"), Some("{\"k\": 1}"));
/// assert_eq!(parse_sse_line("data:{}"), Some("{}"));
/// assert_eq!(parse_sse_line("event: ping"), None);
/// ```
pub fn parse_sse_line(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(|s| s.trim())
}

/// Check if an SSE payload is the end-of-stream marker.
pub fn is_done_marker(data: &str) -> bool {
    data == "[DONE]"
}
