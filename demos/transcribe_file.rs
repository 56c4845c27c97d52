// Bulk Replay Example: One-shot file transcription
//
// Replays a pre-recorded audio file against a running transcription
// service and prints the final text:
// 1. The WAV file is loaded and converted to raw f32le mono PCM
// 2. The session connects, handshakes, and waits for readiness
// 3. The buffer is replayed in paced 16KB chunks
// 4. The first non-empty transcript completes the session
//
// Prerequisites:
// - A WhisperLive-compatible service on ws://localhost:9090
// - A 16kHz mono WAV file
//
// Usage: cargo run --example transcribe_file -- <file.wav>

use anyhow::{Context, Result};
use livescribe::{AudioFile, SessionConfig, TranscriptionSession};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let path = std::env::args()
        .nth(1)
        .context("Usage: transcribe_file <file.wav>")?;

    let audio = AudioFile::open(&path)?;
    println!(
        "Loaded {}: {:.1}s at {}Hz",
        path, audio.duration_seconds, audio.sample_rate
    );

    let session = TranscriptionSession::new(SessionConfig::default());
    let text = session.transcribe_buffer(audio.to_f32le_bytes()?).await?;

    println!("Transcript: {}", text);

    Ok(())
}
