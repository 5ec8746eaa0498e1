use circle_sweep_hough::{HoughCircleParams, HoughParamError};
use serde::{Deserialize, Serialize};

use super::grid::SweepParams;

/// Errors returned for unusable sweep settings.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SweepConfigError {
    #[error("expected_count must be at least 1")]
    ZeroExpectedCount,
    #[error("{axis} step must be positive")]
    ZeroStep { axis: &'static str },
    #[error("scale step must be finite and > 0 (got {0})")]
    InvalidScaleStep(f32),
    #[error("scale step {step} gives more than {max} scales between {start} and {ceiling}", max = MAX_SCALES)]
    TooManyScales { start: f32, step: f32, ceiling: f32 },
    #[error("scale start must be finite and >= 1 (got {0})")]
    InvalidScaleStart(f32),
    #[error("circle size range is inverted (min={min}, max={max})")]
    InvertedSizeRange { min: u32, max: u32 },
    #[error("blur sigma must be finite and > 0 (got {0})")]
    InvalidBlur(f32),
    #[error(transparent)]
    Hough(#[from] HoughParamError),
}

/// Upper bound on accumulator scales per vote threshold.
pub const MAX_SCALES: usize = 1024;

/// How far the sweep goes once something was accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepPolicy {
    /// Visit every (threshold, scale) block; a match only ends its block.
    #[default]
    Exhaustive,
    /// Stop the whole sweep at the first accepted candidate set.
    FirstMatch,
}

/// Sweep bounds and steps. Defaults reproduce the classic search: 50 vote
/// thresholds, 6 accumulator scales and 23 radius guesses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Smallest plausible radius (pixels). Reported and checked against
    /// `max_circle_size`; the radius walk itself stops at `radius_floor`.
    pub min_circle_size: u32,
    /// Largest plausible radius, where every radius walk starts.
    pub max_circle_size: u32,
    /// Candidate-set size that gets logged.
    pub expected_count: usize,

    pub max_vote_threshold: u32,
    /// Thresholds must stay strictly above this.
    pub vote_threshold_floor: u32,
    pub vote_threshold_step: u32,

    pub scale_start: f32,
    /// Scales must stay strictly below this.
    pub scale_ceiling: f32,
    pub scale_step: f32,

    pub radius_step: u32,
    /// Lowest radius guess still tried.
    pub radius_floor: u32,
    /// Half-width of the radius window handed to the detector.
    pub radius_tolerance: u32,

    /// Minimum distance between reported centers.
    pub min_dist: f32,
    /// Fraction of the circumference that must be backed by edges.
    pub min_coverage: f32,

    pub policy: SweepPolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_circle_size: 100,
            max_circle_size: 150,
            expected_count: 1,
            max_vote_threshold: 100,
            vote_threshold_floor: 1,
            vote_threshold_step: 2,
            scale_start: 1.0,
            scale_ceiling: 9.0,
            scale_step: 1.5,
            radius_step: 5,
            radius_floor: 40,
            radius_tolerance: 3,
            min_dist: 100.0,
            min_coverage: 0.4,
            policy: SweepPolicy::Exhaustive,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), SweepConfigError> {
        if self.expected_count == 0 {
            return Err(SweepConfigError::ZeroExpectedCount);
        }
        if self.vote_threshold_step == 0 {
            return Err(SweepConfigError::ZeroStep {
                axis: "vote threshold",
            });
        }
        if self.radius_step == 0 {
            return Err(SweepConfigError::ZeroStep { axis: "radius" });
        }
        if !self.scale_step.is_finite() || self.scale_step <= 0.0 {
            return Err(SweepConfigError::InvalidScaleStep(self.scale_step));
        }
        if !self.scale_start.is_finite() || self.scale_start < 1.0 {
            return Err(SweepConfigError::InvalidScaleStart(self.scale_start));
        }
        // also catches steps below the float resolution of `scale_start`
        if (self.scale_ceiling - self.scale_start) / self.scale_step > MAX_SCALES as f32 {
            return Err(SweepConfigError::TooManyScales {
                start: self.scale_start,
                step: self.scale_step,
                ceiling: self.scale_ceiling,
            });
        }
        if self.min_circle_size > self.max_circle_size {
            return Err(SweepConfigError::InvertedSizeRange {
                min: self.min_circle_size,
                max: self.max_circle_size,
            });
        }
        let strictest = SweepParams {
            vote_threshold: self.max_vote_threshold,
            scale: self.scale_start,
            radius_guess: self.max_circle_size,
        };
        self.hough_params(&strictest).validate()?;
        Ok(())
    }

    /// Detector parameters for one sweep point: the radius window is
    /// `guess ± radius_tolerance`, clamped at zero below.
    pub fn hough_params(&self, params: &SweepParams) -> HoughCircleParams {
        let min_radius = params.radius_guess.saturating_sub(self.radius_tolerance);
        // a zero max would mean "unbounded" to the detector
        let max_radius = params
            .radius_guess
            .saturating_add(self.radius_tolerance)
            .max(1);
        HoughCircleParams {
            dp: params.scale,
            min_dist: self.min_dist,
            vote_threshold: params.vote_threshold,
            min_radius,
            max_radius,
            min_coverage: self.min_coverage,
        }
    }
}
