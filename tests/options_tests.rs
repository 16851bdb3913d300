use std::time::Duration;

use polyai::options::ProviderSettings;

#[test]
fn test_settings_builder() {
    let settings = ProviderSettings::new()
        .with_api_key("sk-test")
        .with_base_url("https://proxy.example.com/v1")
        .with_timeout(Duration::from_secs(30))
        .with_header("X-Custom-Header", "Value");

    assert_eq!(settings.api_key.as_deref(), Some("sk-test"));
    assert_eq!(settings.base_url.as_deref(), Some("https://proxy.example.com/v1"));
    assert_eq!(settings.timeout, Some(Duration::from_secs(30)));
    assert_eq!(settings.headers.get("X-Custom-Header"), Some(&"Value".to_string()));
}

#[test]
fn test_settings_default_is_empty() {
    let settings = ProviderSettings::default();

    assert_eq!(settings.api_key, None);
    assert_eq!(settings.base_url, None);
    assert!(settings.headers.is_empty());
    assert_eq!(settings.timeout, None);
}

#[test]
fn test_settings_from_stored_json() {
    let settings: ProviderSettings = serde_json::from_str(
        r#"{
            "apiKey": "sk-stored",
            "baseURL": "https://api.deepseek.com/v1",
            "headers": {"X-Title": "console"},
            "timeout": 45000
        }"#,
    )
    .unwrap();

    assert_eq!(settings.api_key.as_deref(), Some("sk-stored"));
    assert_eq!(settings.base_url.as_deref(), Some("https://api.deepseek.com/v1"));
    assert_eq!(settings.headers.get("X-Title"), Some(&"console".to_string()));
    assert_eq!(settings.timeout, Some(Duration::from_millis(45_000)));
}

#[test]
fn test_settings_json_omits_unset_fields() {
    let json = serde_json::to_value(ProviderSettings::new().with_api_key("k")).unwrap();
    assert_eq!(json, serde_json::json!({"apiKey": "k"}));
}

#[test]
fn test_settings_accept_partial_json() {
    let settings: ProviderSettings = serde_json::from_str(r#"{"baseUrl":"http://localhost:11434/v1"}"#).unwrap();
    assert_eq!(settings.base_url.as_deref(), Some("http://localhost:11434/v1"));
    assert_eq!(settings.api_key, None);
}
