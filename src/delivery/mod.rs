//! Audio delivery strategies
//!
//! Two ways for a session's audio to reach the transport channel with
//! the same downstream contract: audio flows only after the service has
//! signaled readiness, and order is preserved end to end.
//! - `BulkReplay`: paced chunked replay of a complete in-memory buffer
//! - `LiveStream`: per-frame forwarding from a live capture source

mod live;
mod replay;

pub use live::LiveStream;
pub use replay::BulkReplay;

use crate::error::SessionError;
use crate::protocol::Channel;

/// How a session's audio reaches the transport channel.
#[async_trait::async_trait]
pub trait DeliveryStrategy: Send {
    /// Push audio over the channel until the strategy is exhausted
    /// (bulk replay) or externally stopped (live streaming).
    async fn deliver(&mut self, channel: &Channel) -> Result<(), SessionError>;

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}
