//! External media tooling.

mod ffmpeg;

pub use ffmpeg::FfmpegProbe;
