mod v4l_capture;

pub use v4l_capture::WebcamCapture;

use anyhow::Result;
use image::RgbImage;

/// Trait for camera capture sources.
///
/// Implementations deliver frames already normalized for the pipeline:
/// resized to the configured dimensions and mirrored horizontally so the
/// display moves like a mirror.
pub trait CaptureSource {
    /// Capture a single normalized frame
    fn capture_frame(&mut self) -> Result<RgbImage>;

    /// Get the resolution of delivered frames
    fn resolution(&self) -> (u32, u32);
}
