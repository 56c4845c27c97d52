// Tests for the audio input path: WAV loading, wire-format conversion,
// and the file-backed capture source.

use livescribe::audio::{convert_to_raw_audio, ffmpeg_available, AudioCapture, AudioFile, CaptureConfig, FileCapture};
use std::path::Path;
use tempfile::TempDir;

fn write_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &sample in samples {
        writer.write_sample(sample).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn test_audio_file_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tone.wav");
    let samples: Vec<i16> = (0..16000).map(|i| (i % 128) as i16).collect();
    write_wav(&path, 16000, 1, &samples);

    let audio = AudioFile::open(&path).unwrap();
    assert_eq!(audio.sample_rate, 16000);
    assert_eq!(audio.channels, 1);
    assert_eq!(audio.samples.len(), 16000);
    assert!((audio.duration_seconds - 1.0).abs() < 0.001);
}

#[test]
fn test_audio_file_wire_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.wav");
    write_wav(&path, 16000, 1, &[0, i16::MAX, i16::MIN]);

    let audio = AudioFile::open(&path).unwrap();
    let bytes = audio.to_f32le_bytes().unwrap();

    // 4 bytes per sample, values scaled into [-1.0, 1.0].
    assert_eq!(bytes.len(), 12);
    let first = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let last = f32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    assert_eq!(first, 0.0);
    assert_eq!(last, -1.0);
}

#[test]
fn test_stereo_rejected_for_wire_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stereo.wav");
    write_wav(&path, 16000, 2, &[1, 2, 3, 4]);

    let audio = AudioFile::open(&path).unwrap();
    assert!(audio.to_f32le_bytes().is_err());
}

#[tokio::test]
async fn test_file_capture_emits_frames_in_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("capture.wav");
    // 200ms at 16kHz, 100ms frames -> exactly 2 frames of 1600 samples
    let samples: Vec<i16> = (0..3200).map(|i| (i % 100) as i16).collect();
    write_wav(&path, 16000, 1, &samples);

    let mut capture = FileCapture::new(&path, CaptureConfig::default());
    let mut rx = capture.start().await.unwrap();
    assert!(capture.is_capturing());

    let first = rx.recv().await.unwrap();
    assert_eq!(first.samples.len(), 1600);
    assert_eq!(first.sample_rate, 16000);
    assert_eq!(first.timestamp_ms, 0);

    let second = rx.recv().await.unwrap();
    assert_eq!(second.samples.len(), 1600);
    assert_eq!(second.timestamp_ms, 100);

    // File drained: the stream ends and the source goes idle.
    assert!(rx.recv().await.is_none());
    capture.stop().await.unwrap();
    assert!(!capture.is_capturing());
}

#[tokio::test]
async fn test_file_capture_stop_ends_stream() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("long.wav");
    // 2s of audio so the stream is still live when we stop it.
    let samples: Vec<i16> = vec![0; 32000];
    write_wav(&path, 16000, 1, &samples);

    let mut capture = FileCapture::new(&path, CaptureConfig::default());
    let mut rx = capture.start().await.unwrap();

    let _ = rx.recv().await.unwrap();
    capture.stop().await.unwrap();
    assert!(!capture.is_capturing());

    // No frames after stop once the channel drains.
    while rx.recv().await.is_some() {}
}

#[tokio::test]
async fn test_ffmpeg_conversion_roundtrip() {
    if !ffmpeg_available().await {
        eprintln!("ffmpeg not available, skipping conversion test");
        return;
    }

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("source.wav");
    let samples: Vec<i16> = (0..16000).map(|i| ((i % 64) * 256) as i16).collect();
    write_wav(&path, 16000, 1, &samples);

    let raw = convert_to_raw_audio(&path, 16000).await.unwrap();

    // Same rate and channel count: one f32 out per sample in.
    assert_eq!(raw.len(), 16000 * 4);
}
