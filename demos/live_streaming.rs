// Live Streaming Example: Real-time transcription from a capture source
//
// Streams audio frames to the transcription service as they are
// produced and prints transcript updates as they arrive. A WAV file
// replayed at real-time cadence stands in for a microphone; any
// `AudioCapture` implementation plugs into the same session.
//
// Prerequisites:
// - A WhisperLive-compatible service on ws://localhost:9090
// - A 16kHz mono WAV file
//
// Usage: cargo run --example live_streaming -- <file.wav>

use anyhow::{Context, Result};
use livescribe::{CaptureConfig, FileCapture, SessionConfig, SessionState, TranscriptionSession};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .context("Usage: live_streaming <file.wav>")?;

    let session = TranscriptionSession::new(SessionConfig::default());
    let capture = FileCapture::new(path, CaptureConfig::default());

    session.connect().await?;
    session.start_streaming(Box::new(capture)).await?;

    // Print transcript updates until the session closes or we are
    // interrupted.
    let mut states = session.state_changes();
    let mut last = String::new();

    loop {
        tokio::select! {
            _ = tokio::time::sleep(std::time::Duration::from_millis(250)) => {
                let text = session.current_transcript();
                if text != last {
                    println!("> {}", text);
                    last = text;
                }
            }
            _ = states.changed() => {
                if *states.borrow() == SessionState::Closed {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    session.stop_streaming().await;
    println!("Final transcript: {}", session.current_transcript());
    session.disconnect().await;

    Ok(())
}
