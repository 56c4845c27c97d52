use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

use crate::protocol::Task;
use crate::session::SessionConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioSettings,
    pub timeouts: TimeoutSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    /// WebSocket endpoint of the transcription service
    pub endpoint: String,
    /// Optional HTTP upload-proxy endpoint
    pub upload_endpoint: Option<String>,
    pub model: String,
    pub language: Option<String>,
    pub use_vad: bool,
}

#[derive(Debug, Deserialize)]
pub struct AudioSettings {
    pub sample_rate: u32,
    pub chunk_size: usize,
    pub chunk_interval_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct TimeoutSettings {
    pub connect_ms: u64,
    pub ready_ms: u64,
    pub result_ms: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Session configuration derived from this file.
    pub fn session_config(&self, task: Task) -> SessionConfig {
        SessionConfig {
            endpoint: self.service.endpoint.clone(),
            language: self.service.language.clone(),
            task,
            model: self.service.model.clone(),
            use_vad: self.service.use_vad,
            sample_rate: self.audio.sample_rate,
            chunk_size: self.audio.chunk_size,
            chunk_interval: Duration::from_millis(self.audio.chunk_interval_ms),
            connect_timeout: Duration::from_millis(self.timeouts.connect_ms),
            ready_timeout: Duration::from_millis(self.timeouts.ready_ms),
            result_timeout: Duration::from_millis(self.timeouts.result_ms),
        }
    }
}
