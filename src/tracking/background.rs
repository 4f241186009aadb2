use image::{GrayImage, Luma};
use ndarray::Array2;

/// Running exponential average of the detection region, built during the
/// calibration window and used afterward as the static-background
/// reference for differencing.
///
/// The accumulator is floating point so repeated blending does not lose
/// precision to u8 rounding; it is only quantized on `reference()`.
/// The model is never updated after calibration ends, so lighting drift
/// post-calibration degrades segmentation with no recovery path.
pub struct BackgroundModel {
    weight: f32,
    accumulator: Option<Array2<f32>>,
}

impl BackgroundModel {
    pub fn new(weight: f32) -> Self {
        Self {
            weight,
            accumulator: None,
        }
    }

    /// Folds one calibration-phase ROI into the running average.
    ///
    /// The first call seeds the accumulator with an exact copy of the ROI;
    /// each later call blends `acc = (1 - w) * acc + w * roi`.
    pub fn accumulate(&mut self, roi: &GrayImage) {
        let src = gray_to_array(roi);
        match self.accumulator {
            None => self.accumulator = Some(src),
            Some(ref mut acc) => {
                let weight = self.weight;
                acc.zip_mut_with(&src, |a, &s| *a = (1.0 - weight) * *a + weight * s);
            }
        }
    }

    /// The accumulator quantized back to the ROI's pixel type, or `None`
    /// if no frame has been accumulated yet.
    pub fn reference(&self) -> Option<GrayImage> {
        self.accumulator.as_ref().map(|acc| {
            let (height, width) = acc.dim();
            GrayImage::from_fn(width as u32, height as u32, |x, y| {
                Luma([acc[[y as usize, x as usize]] as u8])
            })
        })
    }

    pub fn is_seeded(&self) -> bool {
        self.accumulator.is_some()
    }
}

fn gray_to_array(roi: &GrayImage) -> Array2<f32> {
    let (width, height) = roi.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        roi.get_pixel(x as u32, y as u32)[0] as f32
    })
}
