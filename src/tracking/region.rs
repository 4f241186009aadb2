use super::RoiBounds;
use image::{imageops, GrayImage, RgbImage};

/// Sigma matching a 5x5 Gaussian kernel with auto-derived spread.
const BLUR_SIGMA: f32 = 1.1;

/// Crops the detection rectangle out of each frame and pre-filters it for
/// differencing: grayscale conversion followed by a Gaussian blur so frame
/// noise does not read as foreground edges.
///
/// Stateless; the caller guarantees the rectangle fits inside the frame
/// (validated once at startup).
pub struct RegionExtractor {
    bounds: RoiBounds,
}

impl RegionExtractor {
    pub fn new(bounds: RoiBounds) -> Self {
        Self { bounds }
    }

    pub fn extract(&self, frame: &RgbImage) -> GrayImage {
        let crop = imageops::crop_imm(
            frame,
            self.bounds.left,
            self.bounds.top,
            self.bounds.width(),
            self.bounds.height(),
        )
        .to_image();
        let gray = imageops::grayscale(&crop);
        imageops::blur(&gray, BLUR_SIGMA)
    }
}
