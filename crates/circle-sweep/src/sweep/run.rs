use circle_sweep_hough::CircleDetector;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::config::{SweepConfig, SweepConfigError, SweepPolicy};
use super::grid::ParamGrid;
use super::circle_log::{CircleLog, LogEntry};

/// Counters collected during one sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepStats {
    /// Detector invocations.
    pub combinations_tried: usize,
    /// Invocations that returned at least one circle.
    pub detections: usize,
    /// Detections whose size matched `expected_count`.
    pub accepted: usize,
    /// Detections of the wrong size; they still end their radius walk.
    pub rejected: usize,
    /// Whether `SweepPolicy::FirstMatch` cut the sweep short.
    pub stopped_early: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepOutcome {
    pub log: CircleLog,
    pub stats: SweepStats,
}

/// Search `detector` over the parameter grid described by `config`.
///
/// For every (threshold, scale) block the radius guess walks down from
/// `max_circle_size`. The first invocation that returns anything ends the
/// walk; its candidate set is logged only when it holds exactly
/// `expected_count` circles.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(detector, config), fields(policy = ?config.policy))
)]
pub fn run_sweep<D>(detector: &D, config: &SweepConfig) -> Result<SweepOutcome, SweepConfigError>
where
    D: CircleDetector + ?Sized,
{
    config.validate()?;
    let grid = ParamGrid::new(config);
    debug!(
        "sweeping up to {} combinations, expecting {} circle(s)",
        grid.len(),
        config.expected_count
    );

    let mut log = CircleLog::new();
    let mut stats = SweepStats::default();

    'blocks: for block in grid.blocks() {
        for params in block {
            stats.combinations_tried += 1;
            trace!(
                "votes>={} dp={} r={}±{}",
                params.vote_threshold,
                params.scale,
                params.radius_guess,
                config.radius_tolerance
            );

            let candidates = match detector.detect(&config.hough_params(&params)) {
                Some(found) if !found.is_empty() => found,
                _ => continue,
            };
            stats.detections += 1;

            if candidates.len() != config.expected_count {
                stats.rejected += 1;
                debug!(
                    "{} circles at votes>={} dp={} r={}, expected {}",
                    candidates.len(),
                    params.vote_threshold,
                    params.scale,
                    params.radius_guess,
                    config.expected_count
                );
                break;
            }

            info!(
                "accepted {} circle(s) at votes>={} dp={} r={}",
                candidates.len(),
                params.vote_threshold,
                params.scale,
                params.radius_guess
            );
            stats.accepted += 1;
            log.push(LogEntry { params, candidates });

            if config.policy == SweepPolicy::FirstMatch {
                stats.stopped_early = true;
                break 'blocks;
            }
            break;
        }
    }

    info!(
        "sweep done: {} tried, {} detections, {} logged",
        stats.combinations_tried,
        stats.detections,
        log.len()
    );
    Ok(SweepOutcome { log, stats })
}
