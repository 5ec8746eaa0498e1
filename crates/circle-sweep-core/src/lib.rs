//! Core types shared by the circle-sweep crates.
//!
//! This crate carries no image dependency: it only knows about detected
//! circles, the candidate sets a detector returns, and the small amount of
//! per-frame smoothing the ball pipeline needs.

mod circle;
mod logger;
mod rolling;

pub use circle::{CandidateSet, Circle};
pub use rolling::RollingMedian;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_verbosity};
