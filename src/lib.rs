pub mod audio;
pub mod config;
pub mod delivery;
pub mod error;
pub mod protocol;
pub mod session;
pub mod upload;

pub use audio::{AudioCapture, AudioFile, AudioFrame, CaptureConfig, FileCapture};
pub use config::Config;
pub use delivery::{BulkReplay, DeliveryStrategy, LiveStream};
pub use error::SessionError;
pub use protocol::{Channel, ChannelEvent, HandshakeConfig, InboundEvent, Segment, ServerReply, Task};
pub use session::{
    SessionConfig, SessionState, TranscriptAccumulator, TranscriptSnapshot, TranscriptionSession,
};
