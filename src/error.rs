use std::time::Duration;

/// Errors produced by a transcription session or its transport channel.
///
/// Malformed inbound payloads are deliberately absent: the reply
/// interpreter classifies them as foreign and drops them, so a bad
/// message never aborts the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The WebSocket connection could not be established, or failed
    /// mid-session.
    #[error("transport channel failed")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),

    /// The connection did not open within the bounded wait.
    #[error("transport channel did not open within {0:?}")]
    ConnectTimeout(Duration),

    /// A send was attempted while the channel was not open.
    #[error("transport channel is not open")]
    NotOpen,

    /// An outbound message could not be encoded.
    #[error("failed to encode outbound message")]
    Encode(#[from] serde_json::Error),

    /// The audio capture pipeline failed to start or stop.
    #[error("audio capture failed: {0}")]
    Capture(anyhow::Error),

    /// The service never signaled readiness within the bounded wait.
    #[error("service did not signal readiness within {0:?}")]
    ReadyTimeout(Duration),

    /// No transcript arrived within the bounded wait.
    #[error("no transcript arrived within {0:?}")]
    ResultTimeout(Duration),

    /// The service requested that the client terminate the session.
    /// A completion reason rather than a fault; any transcript
    /// accumulated so far remains readable.
    #[error("service requested disconnect")]
    ForcedDisconnect,

    /// The session was already torn down when an operation needed it open.
    #[error("session is closed")]
    Closed,
}
