//! Wire protocol for the streaming transcription service
//!
//! This module owns everything that touches the socket:
//! - `channel`: one WebSocket connection, ordered sends, inbound events
//! - `handshake`: session identity and the open-time config message
//! - `messages`: serde types for the JSON frames
//! - `interpret`: classification of raw replies into session events

pub mod channel;
pub mod handshake;
pub mod interpret;
pub mod messages;

pub use channel::{Channel, ChannelEvent};
pub use handshake::new_session_id;
pub use interpret::{interpret, InboundEvent};
pub use messages::{HandshakeConfig, Segment, ServerReply, Task};
