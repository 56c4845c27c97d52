//! Transcription session management
//!
//! This module provides the `TranscriptionSession` abstraction that manages:
//! - Connection lifecycle (connect → handshake → deliver → result → close)
//! - Readiness gating before any audio is delivered
//! - Transcript accumulation from service replies
//! - Bounded waits with explicit timeouts at every suspension point
//! - Unconditional teardown on success, error, and forced disconnect

mod config;
mod session;
mod transcript;

pub use config::SessionConfig;
pub use session::{SessionState, TranscriptionSession};
pub use transcript::{TranscriptAccumulator, TranscriptSnapshot};
