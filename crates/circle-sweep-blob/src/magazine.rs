use circle_sweep_core::RollingMedian;
use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::bounds::{Alliance, ColorBound};
use crate::mask::{build_mask, MaskParams};
use crate::BlobError;

/// Tuning for the magazine color check.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagazineParams {
    /// Frames in each per-color rolling median.
    pub window: usize,
    /// Smoothed fill fraction a color must exceed to count as present.
    pub fullness: f64,
    pub mask: MaskParams,
}

impl Default for MagazineParams {
    fn default() -> Self {
        Self {
            window: 20,
            fullness: 0.4,
            mask: MaskParams::default(),
        }
    }
}

/// One frame's verdict.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MagazineReading {
    /// Smoothed fraction of the frame matching the red gate.
    pub red_fill: f64,
    /// Smoothed fraction of the frame matching the blue gate.
    pub blue_fill: f64,
    /// Ball color in the magazine; red wins when both are full.
    pub color: Option<Alliance>,
}

/// Decides which ball color, if any, fills the magazine camera's view.
///
/// Pixel counts are smoothed per color over the last `window` frames before
/// being compared against `fullness`.
#[derive(Clone, Debug)]
pub struct MagazineClassifier {
    params: MagazineParams,
    red: RollingMedian,
    blue: RollingMedian,
}

impl MagazineClassifier {
    pub fn new(params: MagazineParams) -> Result<Self, BlobError> {
        if params.window == 0 {
            return Err(BlobError::EmptySmoothingWindow);
        }
        Ok(Self {
            params,
            red: RollingMedian::new(params.window),
            blue: RollingMedian::new(params.window),
        })
    }

    pub fn params(&self) -> &MagazineParams {
        &self.params
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn process(&mut self, frame: &RgbImage) -> MagazineReading {
        let total = (frame.width() as f64 * frame.height() as f64).max(1.0);

        let red_mask = build_mask(frame, &ColorBound::intake(Alliance::Red), &self.params.mask);
        let red_fill = self.red.calculate(lit_pixels(&red_mask) as f64) / total;
        let blue_mask = build_mask(frame, &ColorBound::intake(Alliance::Blue), &self.params.mask);
        let blue_fill = self.blue.calculate(lit_pixels(&blue_mask) as f64) / total;

        let color = if red_fill > self.params.fullness {
            Some(Alliance::Red)
        } else if blue_fill > self.params.fullness {
            Some(Alliance::Blue)
        } else {
            None
        };
        log::trace!("magazine fill red={red_fill:.3} blue={blue_fill:.3} -> {color:?}");

        MagazineReading {
            red_fill,
            blue_fill,
            color,
        }
    }

    /// Forget smoothing history, e.g. after the magazine was emptied.
    pub fn reset(&mut self) {
        self.red.clear();
        self.blue.clear();
    }
}

fn lit_pixels(mask: &GrayImage) -> usize {
    mask.as_raw().iter().filter(|&&v| v == 255).count()
}
