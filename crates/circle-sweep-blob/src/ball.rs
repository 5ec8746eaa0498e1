use circle_sweep_core::{CandidateSet, Circle};
use circle_sweep_hough::{CircleDetector, EdgeParams, HoughCircleDetector, HoughCircleParams};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::bounds::{Alliance, ColorBound};
use crate::mask::{build_mask, MaskParams};
use crate::BlobError;

/// Everything the ball finder needs, with intake-camera defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BallFinderParams {
    pub bound: ColorBound,
    #[serde(default)]
    pub mask: MaskParams,
    #[serde(default = "default_ball_edges")]
    pub edges: EdgeParams,
    #[serde(default = "default_ball_hough")]
    pub hough: HoughCircleParams,
}

fn default_ball_edges() -> EdgeParams {
    EdgeParams {
        canny_high: 30.0,
        canny_low: None,
    }
}

fn default_ball_hough() -> HoughCircleParams {
    HoughCircleParams {
        dp: 1.0,
        min_dist: 25.0,
        vote_threshold: 15,
        min_radius: 15,
        max_radius: 0,
        min_coverage: 0.4,
    }
}

impl BallFinderParams {
    pub fn intake(alliance: Alliance) -> Self {
        Self {
            bound: ColorBound::intake(alliance),
            mask: MaskParams::default(),
            edges: default_ball_edges(),
            hough: default_ball_hough(),
        }
    }
}

/// Result of looking for a ball in one frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BallObservation {
    /// Every circle the detector reported on the mask.
    pub circles: CandidateSet,
    /// The biggest of them, if any.
    pub ball: Option<Circle>,
}

impl BallObservation {
    /// Ball x position in pixels, 0 when no ball was seen.
    pub fn position_x(&self) -> f32 {
        self.ball.map(|c| c.center.x).unwrap_or(0.0)
    }

    /// Ball radius in pixels, 0 when no ball was seen.
    pub fn radius(&self) -> f32 {
        self.ball.map(|c| c.radius).unwrap_or(0.0)
    }
}

/// Finds the alliance-colored ball in still frames.
#[derive(Clone, Debug)]
pub struct BallFinder {
    params: BallFinderParams,
}

impl BallFinder {
    pub fn new(params: BallFinderParams) -> Result<Self, BlobError> {
        params.edges.validate()?;
        params.hough.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &BallFinderParams {
        &self.params
    }

    pub fn mask(&self, frame: &RgbImage) -> GrayImage {
        build_mask(frame, &self.params.bound, &self.params.mask)
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn process(&self, frame: &RgbImage) -> BallObservation {
        let mask = self.mask(frame);
        let detector = HoughCircleDetector::new(&mask, &self.params.edges);
        let circles = detector.detect(&self.params.hough).unwrap_or_default();
        let ball = biggest_circle(&circles);
        match &ball {
            Some(c) => log::debug!(
                "ball at ({:.1}, {:.1}) r={:.1} out of {} circles",
                c.center.x,
                c.center.y,
                c.radius,
                circles.len()
            ),
            None => log::debug!("no ball in frame"),
        }
        BallObservation { circles, ball }
    }
}

/// Ring color for every detected circle in the driver view.
pub const OVERLAY_COLOR: Rgb<u8> = Rgb([255, 0, 255]);
/// Dot color on the chosen ball's center.
pub const BALL_CENTER_COLOR: Rgb<u8> = Rgb([100, 100, 0]);
pub const OVERLAY_THICKNESS: i32 = 3;

/// Driver view: `frame` with a ring on every detected circle and a dot on
/// the ball's center.
pub fn draw_overlay(frame: &RgbImage, observation: &BallObservation) -> RgbImage {
    let mut out = frame.clone();
    for circle in &observation.circles {
        let center = circle.pixel_center();
        let r = circle.pixel_radius();
        // rings r-1, r, r+1 make a 3 px line centered on the radius
        for ring in (r - OVERLAY_THICKNESS / 2)..=(r + OVERLAY_THICKNESS / 2) {
            if ring >= 0 {
                draw_hollow_circle_mut(&mut out, center, ring, OVERLAY_COLOR);
            }
        }
    }
    if let Some(ball) = &observation.ball {
        draw_filled_circle_mut(&mut out, ball.pixel_center(), 2, BALL_CENTER_COLOR);
    }
    out
}

/// Largest circle by radius; the first one wins ties.
pub fn biggest_circle(circles: &[Circle]) -> Option<Circle> {
    circles.iter().copied().fold(None, |best, c| match best {
        Some(b) if b.radius >= c.radius => Some(b),
        _ => Some(c),
    })
}
