use std::time::Duration;

use tracing::{debug, info};

use super::DeliveryStrategy;
use crate::error::SessionError;
use crate::protocol::Channel;

/// Paced chunked replay of a complete in-memory audio buffer.
///
/// Chunks go out strictly in order with a fixed pause between them so
/// neither the channel nor the service's ingestion buffer is saturated.
pub struct BulkReplay {
    buffer: Vec<u8>,
    chunk_size: usize,
    pacing: Duration,
}

impl BulkReplay {
    pub fn new(buffer: Vec<u8>, chunk_size: usize, pacing: Duration) -> Self {
        Self {
            buffer,
            chunk_size: chunk_size.max(1),
            pacing,
        }
    }

    /// Number of chunks a delivery will produce: ceil(len / chunk_size).
    pub fn chunk_count(&self) -> usize {
        self.buffer.len().div_ceil(self.chunk_size)
    }
}

#[async_trait::async_trait]
impl DeliveryStrategy for BulkReplay {
    async fn deliver(&mut self, channel: &Channel) -> Result<(), SessionError> {
        let total = self.chunk_count();

        info!(
            "Replaying {} bytes in {} chunks of up to {}",
            self.buffer.len(),
            total,
            self.chunk_size
        );

        for (index, chunk) in self.buffer.chunks(self.chunk_size).enumerate() {
            channel.send_binary(chunk.to_vec()).await?;

            debug!("Sent chunk {}/{} ({} bytes)", index + 1, total, chunk.len());

            if index + 1 < total {
                tokio::time::sleep(self.pacing).await;
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "bulk-replay"
    }
}
