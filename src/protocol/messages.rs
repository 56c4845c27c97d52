use serde::{Deserialize, Serialize};

/// Task requested from the transcription service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Transcribe,
    Translate,
}

/// Configuration message sent to the service on connection open.
///
/// Exactly one per session, as a text frame, before any audio.
/// Immutable once sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeConfig {
    /// Session identifier; every reply is correlated against it
    pub uid: String,
    /// Language hint (`None` asks the service to auto-detect)
    pub language: Option<String>,
    /// Transcribe or translate
    pub task: Task,
    /// Model tier identifier (e.g. "small")
    pub model: String,
    /// Server-side voice activity detection
    pub use_vad: bool,
}

/// Raw shape of every service reply.
///
/// The protocol is field-presence based rather than type-tagged; which
/// fields are set decides what the message means. Classification lives
/// in [`super::interpret`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerReply {
    pub uid: Option<String>,
    pub status: Option<String>,
    pub segments: Option<Vec<Segment>>,
    /// Wait minutes for "WAIT" status, "DISCONNECT" for forced teardown
    pub message: Option<serde_json::Value>,
}

/// A single transcript fragment.
///
/// Segment lists carry the full aggregation so far; they replace, not
/// extend, the previous transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
}

impl HandshakeConfig {
    pub fn new(
        uid: String,
        language: Option<String>,
        task: Task,
        model: String,
        use_vad: bool,
    ) -> Self {
        Self {
            uid,
            language,
            task,
            model,
            use_vad,
        }
    }
}
