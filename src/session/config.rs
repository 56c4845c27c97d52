use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::protocol::Task;

/// Configuration for a transcription session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// WebSocket endpoint of the transcription service
    pub endpoint: String,

    /// Language hint; `None` lets the service auto-detect
    pub language: Option<String>,

    /// Transcribe or translate
    pub task: Task,

    /// Model tier identifier
    pub model: String,

    /// Server-side voice activity detection
    pub use_vad: bool,

    /// Sample rate of delivered audio (the service expects 16kHz)
    pub sample_rate: u32,

    /// Bulk replay chunk size in bytes
    pub chunk_size: usize,

    /// Pause between bulk replay chunks
    pub chunk_interval: Duration,

    /// Bound on waiting for the connection to open
    pub connect_timeout: Duration,

    /// Bound on waiting for the readiness signal
    pub ready_timeout: Duration,

    /// Bound on waiting for the first transcript
    pub result_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://localhost:9090".to_string(),
            language: None, // Auto-detect
            task: Task::Transcribe,
            model: "small".to_string(),
            use_vad: false,
            sample_rate: 16000, // Whisper expects 16kHz
            chunk_size: 16384,  // 16KB chunks
            chunk_interval: Duration::from_millis(50),
            connect_timeout: Duration::from_secs(5),
            ready_timeout: Duration::from_secs(5),
            result_timeout: Duration::from_secs(30),
        }
    }
}
