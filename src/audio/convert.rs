use anyhow::{bail, Context, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// Convert an audio file to raw little-endian f32 mono PCM via ffmpeg.
///
/// Container and codec handling is delegated entirely to ffmpeg; this
/// is process glue around `-f f32le -acodec pcm_f32le -ar <rate> -ac 1`.
/// The converted bytes feed straight into bulk replay.
pub async fn convert_to_raw_audio(input: &Path, sample_rate: u32) -> Result<Vec<u8>> {
    let scratch = tempfile::Builder::new()
        .prefix("livescribe-")
        .suffix(".f32le")
        .tempfile()
        .context("Failed to create scratch file for conversion")?;
    let output_path = scratch.path().to_path_buf();

    debug!("Converting {} via ffmpeg", input.display());

    let output = Command::new("ffmpeg")
        .arg("-i")
        .arg(input)
        .args(["-f", "f32le", "-acodec", "pcm_f32le"])
        .args(["-ar", &sample_rate.to_string()])
        .args(["-ac", "1"])
        .arg("-y")
        .arg(&output_path)
        .output()
        .await
        .context("Failed to spawn ffmpeg; is it installed?")?;

    if !output.status.success() {
        bail!(
            "ffmpeg failed with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let raw = tokio::fs::read(&output_path)
        .await
        .context("Failed to read converted audio")?;

    info!(
        "Converted {} to {} bytes of raw PCM at {}Hz",
        input.display(),
        raw.len(),
        sample_rate
    );

    Ok(raw)
}

/// Check whether ffmpeg is available on PATH.
pub async fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}
