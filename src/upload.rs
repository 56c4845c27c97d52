//! Upload-proxy fallback
//!
//! Alternative to the streaming protocol: post the whole audio blob to
//! an HTTP proxy that runs transcription server-side and replies with
//! the final text. Useful when a WebSocket path to the service is not
//! available.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct ProxyReply {
    text: Option<String>,
    error: Option<String>,
}

/// Submit an audio file to the upload proxy and return the transcript.
pub async fn transcribe_via_proxy(endpoint: &str, file: &Path) -> Result<String> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("recording")
        .to_string();

    info!("Uploading {} bytes to {}", bytes.len(), endpoint);

    let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
    let form = reqwest::multipart::Form::new().part("audio", part);

    let response = reqwest::Client::new()
        .post(endpoint)
        .multipart(form)
        .send()
        .await
        .context("Upload request failed")?;

    let status = response.status();

    if !status.is_success() {
        let detail = response
            .json::<ProxyReply>()
            .await
            .ok()
            .and_then(|r| r.error)
            .unwrap_or_else(|| format!("status {}", status));
        bail!("Transcription failed: {}", detail);
    }

    let reply: ProxyReply = response
        .json()
        .await
        .context("Proxy reply was not valid JSON")?;

    if let Some(error) = reply.error {
        bail!("Transcription failed: {}", error);
    }

    Ok(reply.text.unwrap_or_default())
}
