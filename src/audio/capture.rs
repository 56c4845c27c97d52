use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::file::AudioFile;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Configuration for capture sources
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Target sample rate (the service expects 16 kHz)
    pub sample_rate: u32,
    /// Target channel count (1 = mono)
    pub channels: u16,
    /// Frame size in milliseconds (affects latency)
    pub frame_duration_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            frame_duration_ms: 100,
        }
    }
}

/// Live audio capture source
///
/// The capture device itself lives outside this crate; implementations
/// adapt whatever pipeline produces audio (microphone, system mixer,
/// file replay) into a stream of frames.
#[async_trait::async_trait]
pub trait AudioCapture: Send + Sync {
    /// Start producing frames
    ///
    /// Returns a channel receiver that will receive audio frames
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop producing frames and release the underlying device
    async fn stop(&mut self) -> Result<()>;

    /// Check if the source is currently capturing
    fn is_capturing(&self) -> bool;

    /// Source name for logging
    fn name(&self) -> &str;
}

/// Capture source that replays a WAV file at real-time cadence.
///
/// Stands in for a live microphone in demos and tests: frames are
/// emitted at `frame_duration_ms` intervals, so downstream pacing and
/// teardown behave as they would against a real device.
pub struct FileCapture {
    path: PathBuf,
    config: CaptureConfig,
    running: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl FileCapture {
    pub fn new(path: impl Into<PathBuf>, config: CaptureConfig) -> Self {
        Self {
            path: path.into(),
            config,
            running: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioCapture for FileCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        let audio = AudioFile::open(&self.path)
            .with_context(|| format!("Failed to open capture file {}", self.path.display()))?;

        let frame_ms = self.config.frame_duration_ms;
        let samples_per_frame =
            (audio.sample_rate as u64 * frame_ms / 1000) as usize * audio.channels as usize;
        let sample_rate = audio.sample_rate;
        let channels = audio.channels;
        let samples = audio.samples;

        info!(
            "File capture started: {} ({} samples, {}ms frames)",
            self.path.display(),
            samples.len(),
            frame_ms
        );

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        let (tx, rx) = mpsc::channel(32);

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(frame_ms));
            let mut timestamp_ms = 0u64;

            for chunk in samples.chunks(samples_per_frame.max(1)) {
                ticker.tick().await;

                if !running.load(Ordering::SeqCst) {
                    break;
                }

                let frame = AudioFrame {
                    samples: chunk.to_vec(),
                    sample_rate,
                    channels,
                    timestamp_ms,
                };

                if tx.send(frame).await.is_err() {
                    break;
                }

                timestamp_ms += frame_ms;
            }

            running.store(false, Ordering::SeqCst);
            debug!("File capture drained");
        }));

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);

        if let Some(task) = self.task.take() {
            task.await.context("File capture task panicked")?;
        }

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "file"
    }
}
