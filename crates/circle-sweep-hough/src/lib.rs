//! Gradient Hough circle detector.
//!
//! The detector works in two steps:
//! - [`HoughCircleDetector::new`] runs Canny once and keeps the edge pixels
//!   together with their Scharr gradient directions;
//! - [`CircleDetector::detect`] votes those edges into an accumulator for one
//!   parameter set and returns the circles that survive, or `None`.
//!
//! Preparing once and detecting many times is what the parameter sweep needs:
//! the edge map only depends on the Canny thresholds, which stay fixed while
//! vote threshold, accumulator resolution and radius window change.

mod accumulator;
mod detector;
mod edges;
mod params;

pub use detector::{detect_circles, CircleDetector, HoughCircleDetector};
pub use edges::{extract_edges, EdgeMap, EdgePoint};
pub use params::{EdgeParams, HoughCircleParams, HoughParamError};
