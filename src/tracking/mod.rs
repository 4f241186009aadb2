mod background;
mod label;
pub mod landmarks;
mod region;
mod segment;
mod session;
mod tracker;
mod types;

pub use background::BackgroundModel;
pub use label::{status_label, StatusLabel};
pub use landmarks::Landmarks;
pub use region::RegionExtractor;
pub use segment::{Segmentation, Segmenter};
pub use session::{FrameReport, TrackingSession};
pub use tracker::{HandState, HandTracker};
pub use types::{RoiBounds, TrackingConfig, TrackingError};
