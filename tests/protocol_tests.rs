use livescribe::{HandshakeConfig, ServerReply, Task};

#[test]
fn test_handshake_serialization() {
    let config = HandshakeConfig::new(
        "abc-123".to_string(),
        None,
        Task::Transcribe,
        "small".to_string(),
        false,
    );

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["uid"], "abc-123");
    assert_eq!(json["language"], serde_json::Value::Null);
    assert_eq!(json["task"], "transcribe");
    assert_eq!(json["model"], "small");
    assert_eq!(json["use_vad"], false);
}

#[test]
fn test_handshake_with_language_and_translate() {
    let config = HandshakeConfig::new(
        "abc-123".to_string(),
        Some("de".to_string()),
        Task::Translate,
        "large-v3".to_string(),
        true,
    );

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["language"], "de");
    assert_eq!(json["task"], "translate");
    assert_eq!(json["use_vad"], true);
}

#[test]
fn test_server_reply_ready() {
    let json = r#"{"uid": "abc", "status": "ready"}"#;

    let reply: ServerReply = serde_json::from_str(json).unwrap();
    assert_eq!(reply.uid.as_deref(), Some("abc"));
    assert_eq!(reply.status.as_deref(), Some("ready"));
    assert!(reply.segments.is_none());
    assert!(reply.message.is_none());
}

#[test]
fn test_server_reply_segments() {
    let json = r#"{"uid": "abc", "segments": [{"text": "hello"}, {"text": "world"}]}"#;

    let reply: ServerReply = serde_json::from_str(json).unwrap();
    let segments = reply.segments.unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].text, "hello");
    assert_eq!(segments[1].text, "world");
}

#[test]
fn test_server_reply_queue_wait() {
    let json = r#"{"uid": "abc", "status": "WAIT", "message": 3}"#;

    let reply: ServerReply = serde_json::from_str(json).unwrap();
    assert_eq!(reply.status.as_deref(), Some("WAIT"));
    assert_eq!(reply.message.unwrap().as_f64(), Some(3.0));
}

#[test]
fn test_server_reply_disconnect() {
    let json = r#"{"uid": "abc", "message": "DISCONNECT"}"#;

    let reply: ServerReply = serde_json::from_str(json).unwrap();
    assert_eq!(reply.message.unwrap().as_str(), Some("DISCONNECT"));
}

#[test]
fn test_server_reply_tolerates_unknown_fields() {
    // Services add fields over time; parsing must not break.
    let json = r#"{"uid": "abc", "status": "ready", "backend": "faster_whisper"}"#;

    let reply: ServerReply = serde_json::from_str(json).unwrap();
    assert_eq!(reply.status.as_deref(), Some("ready"));
}
