//! Find a circle of unknown radius in a still image by sweeping Hough
//! detector parameters, then review what the sweep found.
//!
//! This crate provides:
//! - the parameter sweep ([`sweep`]) over any [`CircleDetector`];
//! - post-sweep review ([`review`]): typed verdicts and annotated frames;
//! - JSON config/report helpers ([`io`]) and end-to-end helpers from image
//!   files ([`detect`]);
//! - re-exports of the detector, blob and core crates.
//!
//! ## Quickstart
//!
//! ```no_run
//! use circle_sweep::detect::{load_rgb, sweep_image};
//! use circle_sweep::io::SweepRunConfig;
//! use circle_sweep::review::{review, ReviewVerdict};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = load_rgb("ball.png")?;
//! let outcome = sweep_image(&frame, &SweepRunConfig::default())?;
//! for reviewed in review(&frame, &outcome.log) {
//!     if let ReviewVerdict::Single(circle) = reviewed.verdict {
//!         println!("r={:.1} at votes>={}", circle.radius, reviewed.params.vote_threshold);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `circle_sweep::core`: circles, candidate sets, rolling median, logging.
//! - `circle_sweep::hough`: edge extraction and the gradient Hough detector.
//! - `circle_sweep::blob`: HSV masks, the ball finder, the magazine check.

pub use circle_sweep_blob as blob;
pub use circle_sweep_core as core;
pub use circle_sweep_hough as hough;

pub use circle_sweep_core::{CandidateSet, Circle};
pub use circle_sweep_hough::{CircleDetector, EdgeParams, HoughCircleDetector, HoughCircleParams};

pub mod detect;
pub mod io;
pub mod review;
pub mod sweep;

pub use review::{AmbiguityPolicy, ReviewVerdict};
pub use sweep::{
    run_sweep, CircleLog, LogEntry, SweepConfig, SweepOutcome, SweepParams, SweepPolicy,
};
