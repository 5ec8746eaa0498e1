//! Color-blob masking and ball finding.
//!
//! The pipeline mirrors what runs on the robot's coprocessor, minus the
//! camera and publishing ends: threshold a frame in HSV against the
//! alliance's ball color, clean the mask up, run the Hough detector on it,
//! and keep the biggest circle. [`MagazineClassifier`] reuses the same masks
//! to tell which ball color sits in the magazine.

mod ball;
mod bounds;
mod hsv;
mod magazine;
mod mask;

pub use ball::{
    biggest_circle, draw_overlay, BallFinder, BallFinderParams, BallObservation,
    BALL_CENTER_COLOR, OVERLAY_COLOR, OVERLAY_THICKNESS,
};
pub use bounds::{Alliance, ColorBound};
pub use hsv::{rgb_to_hsv, HsvRange};
pub use magazine::{MagazineClassifier, MagazineParams, MagazineReading};
pub use mask::{build_mask, MaskParams};

/// Errors returned by the blob crate.
#[derive(thiserror::Error, Debug)]
pub enum BlobError {
    #[error(transparent)]
    Hough(#[from] circle_sweep_hough::HoughParamError),
    #[error("rolling median window must be at least 1")]
    EmptySmoothingWindow,
}
