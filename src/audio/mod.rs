pub mod capture;
pub mod convert;
pub mod file;
pub mod pcm;

pub use capture::{AudioCapture, AudioFrame, CaptureConfig, FileCapture};
pub use convert::{convert_to_raw_audio, ffmpeg_available};
pub use file::AudioFile;
