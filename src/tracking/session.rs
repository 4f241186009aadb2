use super::label::{status_label, StatusLabel};
use super::{
    landmarks, BackgroundModel, HandState, HandTracker, RegionExtractor, RoiBounds, Segmenter,
    TrackingConfig, TrackingError,
};
use image::{GrayImage, RgbImage};
use imageproc::point::Point;

/// Per-frame result handed to the display glue: the status label plus the
/// buffers needed for annotation, all plain values.
pub struct FrameReport {
    pub status: StatusLabel,
    /// Detection rectangle, frame coordinates.
    pub roi: RoiBounds,
    /// True while the background model is still being built.
    pub calibrating: bool,
    /// Binary foreground mask in ROI space, when segmentation ran and
    /// found a contour.
    pub mask: Option<GrayImage>,
    /// The selected hand contour in ROI space.
    pub contour: Option<Vec<Point<i32>>>,
}

/// One tracking session: owns the background model, the hand state and
/// the frame counter, and runs the whole per-frame staging.
///
/// A session is single-threaded and frame-lockstep by construction; each
/// `process` call consumes exactly one captured frame. During the
/// calibration window only the background model is updated and no
/// detection occurs; afterward the model is frozen and every frame is
/// segmented against it.
pub struct TrackingSession {
    config: TrackingConfig,
    region: RegionExtractor,
    background: BackgroundModel,
    segmenter: Segmenter,
    tracker: HandTracker,
    frames_elapsed: u64,
}

impl TrackingSession {
    pub fn new(config: TrackingConfig) -> Self {
        Self {
            region: RegionExtractor::new(config.roi),
            background: BackgroundModel::new(config.background_weight),
            segmenter: Segmenter::new(config.foreground_threshold),
            tracker: HandTracker::new(config.wave_interval, config.wave_threshold),
            frames_elapsed: 0,
            config,
        }
    }

    pub fn frames_elapsed(&self) -> u64 {
        self.frames_elapsed
    }

    pub fn is_calibrating(&self) -> bool {
        self.frames_elapsed < self.config.calibration_frames
    }

    pub fn hand(&self) -> Option<&HandState> {
        self.tracker.hand()
    }

    /// Runs one frame through the pipeline:
    /// region extraction, then either a calibration update or
    /// segmentation + landmark extraction + state tracking, then labeling.
    pub fn process(&mut self, frame: &RgbImage) -> Result<FrameReport, TrackingError> {
        let roi = self.region.extract(frame);
        let calibrating = self.is_calibrating();

        let mut mask = None;
        let mut contour = None;
        if calibrating {
            self.background.accumulate(&roi);
        } else {
            let reference = self
                .background
                .reference()
                .ok_or(TrackingError::NotCalibrated)?;
            match self.segmenter.segment(&reference, &roi) {
                None => self.tracker.set_in_frame(false),
                Some(segmentation) => {
                    self.tracker.set_in_frame(true);
                    if let Some(lm) = landmarks::extract(&segmentation.contour) {
                        self.tracker.observe(&lm, self.frames_elapsed);
                    }
                    mask = Some(segmentation.mask);
                    contour = Some(segmentation.contour);
                }
            }
        }

        let status = status_label(
            self.frames_elapsed,
            self.config.calibration_frames,
            self.tracker.hand(),
        );
        self.frames_elapsed += 1;

        Ok(FrameReport {
            status,
            roi: self.config.roi,
            calibrating,
            mask,
            contour,
        })
    }
}
