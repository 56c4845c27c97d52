use tracing::debug;

use super::channel::Channel;
use super::messages::HandshakeConfig;
use crate::error::SessionError;

/// Generate a fresh per-connection session identifier.
///
/// Canonical hyphenated UUID v4. Replies carrying any other uid are
/// classified as foreign and dropped.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Send the configuration message for a new session.
///
/// Exactly one per session, as the first text frame after open and
/// before any audio. Waiting for the readiness reply is the session's
/// responsibility, not the handshake's.
pub async fn send_config(channel: &Channel, config: &HandshakeConfig) -> Result<(), SessionError> {
    debug!("Sending handshake for session {}", config.uid);
    channel.send_text(serde_json::to_string(config)?).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_canonical_uuids() {
        let id = new_session_id();
        assert_eq!(id.len(), 36);
        assert_eq!(id.matches('-').count(), 4);
        assert!(uuid::Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn session_ids_do_not_collide() {
        let a = new_session_id();
        let b = new_session_id();
        assert_ne!(a, b);
    }
}
