use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::DeliveryStrategy;
use crate::audio::{pcm, AudioCapture};
use crate::error::SessionError;
use crate::protocol::Channel;

/// Per-frame forwarding from a live capture source.
///
/// Each captured frame is converted to the wire sample format and sent
/// immediately; no batching, frame order preserved. Runs until the
/// capture drains or the shutdown signal fires, and releases the
/// capture device on every exit path.
pub struct LiveStream {
    capture: Box<dyn AudioCapture>,
    shutdown: watch::Receiver<bool>,
}

impl LiveStream {
    pub fn new(capture: Box<dyn AudioCapture>, shutdown: watch::Receiver<bool>) -> Self {
        Self { capture, shutdown }
    }
}

#[async_trait::async_trait]
impl DeliveryStrategy for LiveStream {
    async fn deliver(&mut self, channel: &Channel) -> Result<(), SessionError> {
        let mut frames = self
            .capture
            .start()
            .await
            .map_err(SessionError::Capture)?;

        info!("Live streaming started from {} source", self.capture.name());

        // Frames that piled up before readiness are dropped, not
        // queued; the channel bound caps how many can exist at all.
        let mut stale = 0usize;
        while frames.try_recv().is_ok() {
            stale += 1;
        }
        if stale > 0 {
            debug!("Dropped {} frames produced before readiness", stale);
        }

        let mut sent = 0u64;
        let mut outcome = Ok(());

        loop {
            tokio::select! {
                frame = frames.recv() => match frame {
                    Some(frame) => {
                        if let Err(e) = channel.send_binary(pcm::f32le_bytes(&frame.samples)).await {
                            outcome = Err(e);
                            break;
                        }
                        sent += 1;
                    }
                    None => break,
                },
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Live streaming finished after {} frames", sent);

        // Release the capture device no matter how the loop ended.
        if let Err(e) = self.capture.stop().await {
            warn!("Failed to stop audio capture: {}", e);
        }

        outcome
    }

    fn name(&self) -> &'static str {
        "live-stream"
    }
}
