use super::Landmarks;
use imageproc::point::Point;

/// Everything known about the tracked hand, mutated in place for the life
/// of a session once it exists.
#[derive(Debug, Clone)]
pub struct HandState {
    pub top: Point<i32>,
    pub bottom: Point<i32>,
    pub left: Point<i32>,
    pub right: Point<i32>,
    /// Horizontal centroid, current and previously sampled values. Both
    /// advance only on the wave-sampling cadence, not every frame.
    pub center_x: i32,
    pub prev_center_x: i32,
    /// Whether segmentation found a contour this frame.
    pub is_in_frame: bool,
    /// Sustained horizontal oscillation detected over the sampling cadence.
    pub is_waving: bool,
    /// Open/closed classification signal.
    ///
    /// TODO: populate via convexity-defect finger counting. No producer
    /// writes this yet, so the labeler only ever sees `None` here.
    pub fingers: Option<u8>,
}

impl HandState {
    fn new(landmarks: &Landmarks) -> Self {
        Self {
            top: landmarks.top,
            bottom: landmarks.bottom,
            left: landmarks.left,
            right: landmarks.right,
            center_x: landmarks.center_x,
            prev_center_x: 0,
            is_in_frame: false,
            is_waving: false,
            fingers: None,
        }
    }
}

/// Temporal core of the pipeline: turns per-frame landmark observations
/// into a stable hand state.
///
/// The extremal points follow every observation, but wave detection is
/// deliberately under-sampled: the centroid is compared only once per
/// `wave_interval` frames, which damps single-frame segmentation jitter.
/// Waving is a sustained oscillation signal, not a per-frame derivative.
pub struct HandTracker {
    wave_interval: u64,
    wave_threshold: i32,
    hand: Option<HandState>,
}

impl HandTracker {
    pub fn new(wave_interval: u64, wave_threshold: i32) -> Self {
        Self {
            wave_interval,
            wave_threshold,
            hand: None,
        }
    }

    pub fn hand(&self) -> Option<&HandState> {
        self.hand.as_ref()
    }

    /// Records whether segmentation found a contour this frame. No-op
    /// until the first observation has created the hand state.
    pub fn set_in_frame(&mut self, in_frame: bool) {
        if let Some(hand) = self.hand.as_mut() {
            hand.is_in_frame = in_frame;
        }
    }

    /// Feeds one frame's landmarks into the tracked state.
    ///
    /// The first observation constructs the hand (with the previous
    /// centroid at zero); later ones overwrite the extremal points
    /// unconditionally and shift the centroid pair on sampled frames.
    pub fn observe(&mut self, landmarks: &Landmarks, frame_counter: u64) {
        let sampled = frame_counter % self.wave_interval == 0;
        match self.hand {
            None => self.hand = Some(HandState::new(landmarks)),
            Some(ref mut hand) => {
                hand.top = landmarks.top;
                hand.bottom = landmarks.bottom;
                hand.left = landmarks.left;
                hand.right = landmarks.right;
                if sampled {
                    hand.prev_center_x = hand.center_x;
                    hand.center_x = landmarks.center_x;
                }
            }
        }
        if sampled {
            if let Some(hand) = self.hand.as_mut() {
                hand.is_waving = (hand.center_x - hand.prev_center_x).abs() > self.wave_threshold;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landmarks(center_x: i32) -> Landmarks {
        Landmarks {
            top: Point::new(center_x, 0),
            bottom: Point::new(center_x, 20),
            left: Point::new(center_x - 5, 10),
            right: Point::new(center_x + 5, 10),
            center_x,
        }
    }

    #[test]
    fn first_observation_creates_hand_out_of_frame() {
        let mut tracker = HandTracker::new(6, 3);
        assert!(tracker.hand().is_none());

        tracker.observe(&landmarks(100), 1);
        let hand = tracker.hand().unwrap();
        assert!(!hand.is_in_frame);
        assert!(!hand.is_waving);
        assert_eq!(hand.center_x, 100);
        assert_eq!(hand.prev_center_x, 0);
        assert_eq!(hand.fingers, None);
    }

    #[test]
    fn waving_follows_the_sampling_cadence() {
        let mut tracker = HandTracker::new(6, 3);

        // Sampled frames 0, 6, 12 with centroids 100, 103, 90.
        tracker.observe(&landmarks(100), 0);
        assert!(tracker.hand().unwrap().is_waving, "|100 - 0| > 3");

        for frame in 1..6 {
            tracker.observe(&landmarks(500), frame);
            assert!(
                tracker.hand().unwrap().is_waving,
                "unsampled frames must retain the flag"
            );
            assert_eq!(tracker.hand().unwrap().center_x, 100);
        }

        tracker.observe(&landmarks(103), 6);
        assert!(!tracker.hand().unwrap().is_waving, "|103 - 100| == 3 is not waving");

        for frame in 7..12 {
            tracker.observe(&landmarks(0), frame);
            assert!(!tracker.hand().unwrap().is_waving);
        }

        tracker.observe(&landmarks(90), 12);
        assert!(tracker.hand().unwrap().is_waving, "|90 - 103| > 3");
    }

    #[test]
    fn extremes_update_every_frame() {
        let mut tracker = HandTracker::new(6, 3);
        tracker.observe(&landmarks(100), 0);
        tracker.observe(&landmarks(42), 1);

        let hand = tracker.hand().unwrap();
        assert_eq!(hand.left, Point::new(37, 10));
        assert_eq!(hand.right, Point::new(47, 10));
        // Centroid is frozen between samples.
        assert_eq!(hand.center_x, 100);
    }

    #[test]
    fn in_frame_flag_toggles_only_once_hand_exists() {
        let mut tracker = HandTracker::new(6, 3);
        tracker.set_in_frame(true);
        assert!(tracker.hand().is_none());

        tracker.observe(&landmarks(10), 0);
        tracker.set_in_frame(true);
        assert!(tracker.hand().unwrap().is_in_frame);
        tracker.set_in_frame(false);
        assert!(!tracker.hand().unwrap().is_in_frame);
    }
}
