use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

/// Snapshot of the transcript accumulated so far
#[derive(Debug, Clone, Default, Serialize)]
pub struct TranscriptSnapshot {
    /// Latest aggregated transcript text
    pub text: String,

    /// When the last update arrived; `None` until the first one
    pub last_updated: Option<DateTime<Utc>>,
}

/// Latest aggregated transcript text for the active session.
///
/// Single writer (the session's reply pump), any number of readers.
/// Updates replace the previous snapshot outright because segment
/// messages carry the full aggregation, not a delta. Readers can poll
/// synchronously or subscribe for change notification; the snapshot
/// survives session teardown until the next session resets it.
pub struct TranscriptAccumulator {
    tx: watch::Sender<TranscriptSnapshot>,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(TranscriptSnapshot::default());
        Self { tx }
    }

    /// Replace the current snapshot with new aggregated text.
    pub fn update(&self, text: String) {
        self.tx.send_replace(TranscriptSnapshot {
            text,
            last_updated: Some(Utc::now()),
        });
    }

    /// Current transcript text.
    pub fn current(&self) -> String {
        self.tx.borrow().text.clone()
    }

    pub fn snapshot(&self) -> TranscriptSnapshot {
        self.tx.borrow().clone()
    }

    /// Clear the snapshot at the start of a new session.
    pub fn reset(&self) {
        self.tx.send_replace(TranscriptSnapshot::default());
    }

    /// Subscribe to snapshot changes for event-driven result waits.
    pub fn subscribe(&self) -> watch::Receiver<TranscriptSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for TranscriptAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
