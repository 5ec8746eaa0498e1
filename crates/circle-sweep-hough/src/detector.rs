use std::f32::consts::{PI, TAU};

use circle_sweep_core::{CandidateSet, Circle};
use image::GrayImage;
use log::{trace, warn};
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::accumulator::Accumulator;
use crate::edges::{extract_edges, EdgeMap};
use crate::params::{EdgeParams, HoughCircleParams};

/// A circle detector bound to one prepared frame.
///
/// `detect` must be a pure function of the frame and `params`: the sweep
/// relies on calling it thousands of times with the same answers.
pub trait CircleDetector {
    fn detect(&self, params: &HoughCircleParams) -> Option<CandidateSet>;
}

/// Gradient Hough transform over a precomputed edge map.
#[derive(Clone, Debug)]
pub struct HoughCircleDetector {
    edges: EdgeMap,
}

impl HoughCircleDetector {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(gray, edge_params), fields(width = gray.width(), height = gray.height()))
    )]
    pub fn new(gray: &GrayImage, edge_params: &EdgeParams) -> Self {
        let edges = extract_edges(gray, edge_params);
        log::debug!(
            "prepared {}x{} frame with {} edge pixels",
            edges.width,
            edges.height,
            edges.len()
        );
        Self { edges }
    }
}

impl CircleDetector for HoughCircleDetector {
    fn detect(&self, params: &HoughCircleParams) -> Option<CandidateSet> {
        if let Err(err) = params.validate() {
            warn!("skipping detection: {err}");
            return None;
        }
        if self.edges.is_empty() {
            return None;
        }

        let (min_r, max_r) = params.radius_window(self.edges.width, self.edges.height);
        let mut acc = Accumulator::new(self.edges.width, self.edges.height, params.dp);
        acc.vote(&self.edges, min_r, max_r);

        let peaks = acc.peaks(params.vote_threshold);
        trace!(
            "dp={} votes>={} r=[{min_r},{max_r}]: {} peaks",
            params.dp,
            params.vote_threshold,
            peaks.len()
        );

        let mut circles: CandidateSet = Vec::new();
        let mut scratch = ShellScratch::default();
        for peak in &peaks {
            let center = acc.refine(peak);
            let too_close = circles
                .iter()
                .any(|c| nalgebra::distance(&c.center, &center) < params.min_dist);
            if too_close {
                continue;
            }
            let Some(shell) = fit_shell(&self.edges, center, min_r, max_r, &mut scratch) else {
                continue;
            };
            if shell.support < params.vote_threshold as usize
                || shell.coverage < params.min_coverage
            {
                trace!(
                    "rejected ({:.1}, {:.1}) r={:.1}: support {} coverage {:.2}",
                    center.x,
                    center.y,
                    shell.radius,
                    shell.support,
                    shell.coverage
                );
                continue;
            }
            circles.push(Circle {
                center,
                radius: shell.radius,
                votes: peak.votes,
            });
        }

        (!circles.is_empty()).then_some(circles)
    }
}

/// One-shot convenience: prepare `gray` and run a single detection.
pub fn detect_circles(
    gray: &GrayImage,
    edge_params: &EdgeParams,
    params: &HoughCircleParams,
) -> Option<CandidateSet> {
    HoughCircleDetector::new(gray, edge_params).detect(params)
}

/// Radial width of the shell of edge pixels credited to one circle.
///
/// Independent of `dp`: a wider shell lets straight edges tangent to a
/// circle pass as arcs.
const SHELL_WIDTH: f32 = 2.0;

/// Edge pixels lying on one circle around a candidate center.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Shell {
    /// Median distance of the shell's pixels from the center.
    radius: f32,
    /// Edge pixels inside the shell.
    support: usize,
    /// Fraction of the circumference's angular bins holding at least one
    /// shell pixel.
    coverage: f32,
}

/// Buffers reused across peaks of one detection.
#[derive(Default)]
struct ShellScratch {
    /// `(distance, angle)` of every edge pixel inside the radius window.
    polar: Vec<(f32, f32)>,
    bins: Vec<bool>,
}

/// Densest `SHELL_WIDTH` window of edge distances around `center`.
fn fit_shell(
    edges: &EdgeMap,
    center: Point2<f32>,
    min_r: f32,
    max_r: f32,
    scratch: &mut ShellScratch,
) -> Option<Shell> {
    let polar = &mut scratch.polar;
    polar.clear();
    let lo = (min_r - 0.5).max(0.0);
    let hi = max_r + 0.5;
    polar.extend(edges.points.iter().filter_map(|p| {
        let dx = p.x as f32 - center.x;
        let dy = p.y as f32 - center.y;
        let d = (dx * dx + dy * dy).sqrt();
        (d >= lo && d <= hi).then(|| (d, dy.atan2(dx)))
    }));
    if polar.is_empty() {
        return None;
    }
    polar.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut best = (0usize, 0usize); // (start, len)
    let mut end = 0usize;
    for start in 0..polar.len() {
        while end < polar.len() && polar[end].0 - polar[start].0 <= SHELL_WIDTH {
            end += 1;
        }
        if end - start > best.1 {
            best = (start, end - start);
        }
    }

    let (start, len) = best;
    let radius = polar[start + len / 2].0;
    if radius <= 0.0 {
        return None;
    }

    // one bin per pixel of circumference
    let n = ((TAU * radius).round() as usize).max(8);
    scratch.bins.clear();
    scratch.bins.resize(n, false);
    for &(_, angle) in &polar[start..start + len] {
        let bin = (((angle + PI) / TAU) * n as f32) as usize;
        scratch.bins[bin.min(n - 1)] = true;
    }
    let hit = scratch.bins.iter().filter(|&&b| b).count();

    Some(Shell {
        radius,
        support: len,
        coverage: hit as f32 / n as f32,
    })
}
