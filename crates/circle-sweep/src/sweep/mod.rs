//! Brute-force search over Hough parameters for a circle of unknown radius.
//!
//! The detector only finds a circle reliably when its radius window is within
//! a few pixels of the truth. When all that is known is a coarse range, the
//! sweep tries a window around every radius guess, for every accumulator
//! scale, for every vote threshold from strict to lenient, and keeps the
//! candidate sets with the expected number of circles.

mod circle_log;
mod config;
mod grid;
mod run;

pub use circle_log::{CircleLog, LogEntry};
pub use config::{SweepConfig, SweepConfigError, SweepPolicy, MAX_SCALES};
pub use grid::{Blocks, ParamBlock, ParamGrid, SweepParams};
pub use run::{run_sweep, SweepOutcome, SweepStats};
