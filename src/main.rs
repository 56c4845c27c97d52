use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use livescribe::audio::{convert_to_raw_audio, ffmpeg_available, AudioFile, CaptureConfig, FileCapture};
use livescribe::protocol::Task;
use livescribe::session::{SessionConfig, TranscriptionSession};
use livescribe::{upload, Config};

#[derive(Parser)]
#[command(name = "livescribe", about = "Streaming client for real-time speech transcription")]
struct Cli {
    /// Config file (TOML); built-in defaults are used when absent
    #[arg(long)]
    config: Option<String>,

    /// WebSocket endpoint of the transcription service
    #[arg(long)]
    endpoint: Option<String>,

    /// Translate to English instead of transcribing
    #[arg(long)]
    translate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe an audio file via bulk replay
    Transcribe {
        file: PathBuf,

        /// Treat the file as already-converted raw f32le mono PCM
        #[arg(long)]
        raw: bool,
    },

    /// Stream a WAV file at real-time cadence (live-capture stand-in)
    Stream {
        file: PathBuf,

        /// Stop streaming after this many seconds
        #[arg(long, default_value_t = 30)]
        duration_secs: u64,
    },

    /// Send an audio file to the HTTP upload proxy instead
    Upload {
        file: PathBuf,

        /// Proxy endpoint URL (overrides the config file)
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let task = if cli.translate {
        Task::Translate
    } else {
        Task::Transcribe
    };

    let file_config = match &cli.config {
        Some(path) => Some(Config::load(path).with_context(|| format!("Failed to load {}", path))?),
        None => None,
    };

    let mut session_config = file_config
        .as_ref()
        .map(|c| c.session_config(task))
        .unwrap_or_else(|| SessionConfig {
            task,
            ..SessionConfig::default()
        });

    if let Some(endpoint) = &cli.endpoint {
        session_config.endpoint = endpoint.clone();
    }

    match cli.command {
        Command::Transcribe { file, raw } => {
            let buffer = load_audio(&file, raw, session_config.sample_rate).await?;

            let session = TranscriptionSession::new(session_config);
            let text = session.transcribe_buffer(buffer).await?;

            println!("{}", text);
        }

        Command::Stream {
            file,
            duration_secs,
        } => {
            let session = TranscriptionSession::new(session_config);
            let capture = FileCapture::new(file, CaptureConfig::default());

            session.connect().await?;
            session.start_streaming(Box::new(capture)).await?;

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(duration_secs)) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, stopping stream");
                }
            }

            session.stop_streaming().await;
            let text = session.current_transcript();
            session.disconnect().await;

            println!("{}", text);
        }

        Command::Upload { file, url } => {
            let endpoint = url
                .or_else(|| {
                    file_config
                        .as_ref()
                        .and_then(|c| c.service.upload_endpoint.clone())
                })
                .context("No upload endpoint configured; pass --url or set service.upload_endpoint")?;

            let text = upload::transcribe_via_proxy(&endpoint, &file).await?;

            println!("{}", text);
        }
    }

    Ok(())
}

/// Load an audio file as raw f32le mono PCM for bulk replay.
///
/// Raw files pass through untouched; WAV files at the target rate are
/// converted in-process; everything else goes through ffmpeg.
async fn load_audio(file: &Path, raw: bool, sample_rate: u32) -> Result<Vec<u8>> {
    if raw {
        return tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()));
    }

    if file.extension().and_then(|e| e.to_str()) == Some("wav") {
        let audio = AudioFile::open(file)?;
        if audio.sample_rate == sample_rate && audio.channels == 1 {
            return audio.to_f32le_bytes();
        }
        warn!(
            "{} is {}Hz/{}ch, converting via ffmpeg",
            file.display(),
            audio.sample_rate,
            audio.channels
        );
    }

    if !ffmpeg_available().await {
        bail!(
            "ffmpeg is required to convert {}; install it or supply raw f32le PCM with --raw",
            file.display()
        );
    }

    convert_to_raw_audio(file, sample_rate).await
}
