use super::HandState;
use std::fmt;

/// Human-readable gesture status shown on the output frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLabel {
    Calibrating,
    NotDetected,
    Waving,
    Closed,
    Open,
    Searching,
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StatusLabel::Calibrating => "Calibrating...",
            StatusLabel::NotDetected => "Hand not detected",
            StatusLabel::Waving => "Waving",
            StatusLabel::Closed => "Closed",
            StatusLabel::Open => "Open",
            StatusLabel::Searching => "Searching...",
        };
        f.write_str(text)
    }
}

/// Maps the calibration phase and tracked state to a status label.
/// Total over its domain; first matching rule wins.
pub fn status_label(
    frames_elapsed: u64,
    calibration_frames: u64,
    hand: Option<&HandState>,
) -> StatusLabel {
    if frames_elapsed < calibration_frames {
        return StatusLabel::Calibrating;
    }
    match hand {
        None => StatusLabel::NotDetected,
        Some(hand) if !hand.is_in_frame => StatusLabel::NotDetected,
        Some(hand) if hand.is_waving => StatusLabel::Waving,
        Some(hand) => match hand.fingers {
            Some(0) => StatusLabel::Closed,
            Some(1) => StatusLabel::Open,
            _ => StatusLabel::Searching,
        },
    }
}
