use tracing::{debug, warn};

use super::messages::ServerReply;

/// A classified inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// The service is ready to ingest audio.
    Ready,
    /// Full transcript snapshot; replaces any previous snapshot.
    Transcript(String),
    /// The service queue is full; advertised wait time in minutes.
    QueueWait(f64),
    /// The service requires the client to terminate the session.
    ForceDisconnect,
    /// Unparseable payload or another session's message; dropped.
    Foreign,
}

/// Classify one raw text payload against the current session.
///
/// `ready` is the session's readiness at dispatch time: segments that
/// arrive before an explicit ready status double as the readiness
/// signal, so a single payload can yield both `Ready` and a
/// `Transcript`. Parse failures and uid mismatches produce `Foreign`
/// and never an error; the session continues.
pub fn interpret(raw: &str, expected_uid: &str, ready: bool) -> Vec<InboundEvent> {
    let reply: ServerReply = match serde_json::from_str(raw) {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Dropping malformed service reply: {}", e);
            return vec![InboundEvent::Foreign];
        }
    };

    // Correlation is mandatory: the service may multiplex unrelated
    // sessions on the same infrastructure.
    if reply.uid.as_deref() != Some(expected_uid) {
        debug!("Ignoring reply addressed to a different session");
        return vec![InboundEvent::Foreign];
    }

    let mut events = Vec::new();

    if !ready && (reply.status.as_deref() == Some("ready") || reply.segments.is_some()) {
        events.push(InboundEvent::Ready);
    }

    if let Some(segments) = &reply.segments {
        if !segments.is_empty() {
            let text = segments
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            if !text.is_empty() {
                events.push(InboundEvent::Transcript(text));
            }
        }
    }

    if reply.status.as_deref() == Some("WAIT") {
        events.push(InboundEvent::QueueWait(wait_minutes(reply.message.as_ref())));
    }

    if reply.message.as_ref().and_then(|m| m.as_str()) == Some("DISCONNECT") {
        events.push(InboundEvent::ForceDisconnect);
    }

    events
}

/// The advertised wait arrives in `message` with no fixed JSON type;
/// accept a number or a numeric string, defaulting to zero.
fn wait_minutes(message: Option<&serde_json::Value>) -> f64 {
    match message {
        Some(value) => value
            .as_f64()
            .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
            .unwrap_or(0.0),
        None => 0.0,
    }
}
