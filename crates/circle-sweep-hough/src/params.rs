use serde::{Deserialize, Serialize};

/// Errors returned when detector parameters are unusable.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HoughParamError {
    #[error("accumulator resolution dp must be finite and >= 1 (got {0})")]
    InvalidDp(f32),
    #[error("minimum center distance must be finite and > 0 (got {0})")]
    InvalidMinDist(f32),
    #[error("radius window is empty (min_radius={min}, max_radius={max})")]
    EmptyRadiusWindow { min: u32, max: u32 },
    #[error("min_coverage must be within [0, 1] (got {0})")]
    InvalidCoverage(f32),
    #[error("canny thresholds must satisfy 0 < low <= high (low={low}, high={high})")]
    InvalidCanny { low: f32, high: f32 },
}

/// Canny edge thresholds used when preparing a frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeParams {
    /// Upper hysteresis threshold on the gradient magnitude.
    pub canny_high: f32,
    /// Lower hysteresis threshold; `None` means half of `canny_high`.
    pub canny_low: Option<f32>,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            canny_high: 50.0,
            canny_low: None,
        }
    }
}

impl EdgeParams {
    pub fn low(&self) -> f32 {
        self.canny_low.unwrap_or(self.canny_high * 0.5)
    }

    pub fn validate(&self) -> Result<(), HoughParamError> {
        let low = self.low();
        let high = self.canny_high;
        if !(low.is_finite() && high.is_finite() && low > 0.0 && low <= high) {
            return Err(HoughParamError::InvalidCanny { low, high });
        }
        Ok(())
    }
}

/// Per-invocation Hough parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughCircleParams {
    /// Inverse ratio of image resolution to accumulator resolution.
    pub dp: f32,
    /// Minimum distance between centers of reported circles (pixels).
    pub min_dist: f32,
    /// Minimum accumulator votes for a center, and minimum edge support
    /// for its radius.
    pub vote_threshold: u32,
    /// Smallest radius considered (pixels).
    pub min_radius: u32,
    /// Largest radius considered (pixels); 0 means the larger image side.
    pub max_radius: u32,
    /// Fraction of the circumference that must be backed by edge pixels.
    pub min_coverage: f32,
}

impl Default for HoughCircleParams {
    fn default() -> Self {
        Self {
            dp: 1.0,
            min_dist: 100.0,
            vote_threshold: 100,
            min_radius: 0,
            max_radius: 0,
            min_coverage: 0.4,
        }
    }
}

impl HoughCircleParams {
    pub fn validate(&self) -> Result<(), HoughParamError> {
        if !self.dp.is_finite() || self.dp < 1.0 {
            return Err(HoughParamError::InvalidDp(self.dp));
        }
        if !self.min_dist.is_finite() || self.min_dist <= 0.0 {
            return Err(HoughParamError::InvalidMinDist(self.min_dist));
        }
        if self.max_radius != 0 && self.max_radius < self.min_radius {
            return Err(HoughParamError::EmptyRadiusWindow {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        if !(0.0..=1.0).contains(&self.min_coverage) {
            return Err(HoughParamError::InvalidCoverage(self.min_coverage));
        }
        Ok(())
    }

    /// Radius window in pixels, resolving `max_radius == 0` against the
    /// image extent.
    pub fn radius_window(&self, width: u32, height: u32) -> (f32, f32) {
        let max = if self.max_radius == 0 {
            width.max(height)
        } else {
            self.max_radius
        };
        (self.min_radius as f32, max as f32)
    }
}
