//! Lazy enumeration of sweep parameter combinations.

use std::iter::Flatten;

use serde::{Deserialize, Serialize};

use super::config::SweepConfig;

/// One point of the sweep: what the detector is asked for in one call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepParams {
    /// Accumulator votes a center needs.
    pub vote_threshold: u32,
    /// Accumulator resolution ratio (`dp`), 1 is full resolution.
    pub scale: f32,
    /// Radius the detector window is centered on.
    pub radius_guess: u32,
}

/// Integer counter stepping down from a start value while above (or at) a
/// floor.
#[derive(Clone, Debug)]
struct Countdown {
    next: Option<u32>,
    step: u32,
    floor: u32,
    inclusive: bool,
}

impl Countdown {
    fn new(start: u32, step: u32, floor: u32, inclusive: bool) -> Self {
        Self {
            next: Some(start),
            step,
            floor,
            inclusive,
        }
    }

    fn admits(&self, value: u32) -> bool {
        if self.inclusive {
            value >= self.floor
        } else {
            value > self.floor
        }
    }
}

impl Iterator for Countdown {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let value = self.next.take()?;
        if !self.admits(value) {
            return None;
        }
        if self.step > 0 {
            self.next = value.checked_sub(self.step);
        }
        Some(value)
    }
}

/// The full (threshold, scale, radius) grid of a sweep.
///
/// Nothing is materialised: [`ParamGrid::blocks`] yields one
/// [`ParamBlock`] per (threshold, scale) pair, and each block yields its
/// radius guesses on demand. Iterating the grid again starts over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamGrid {
    max_threshold: u32,
    threshold_step: u32,
    threshold_floor: u32,
    scale_start: f32,
    scale_step: f32,
    scale_ceiling: f32,
    max_radius: u32,
    radius_step: u32,
    radius_floor: u32,
}

impl ParamGrid {
    /// Grid for `config`. Zero steps produce a single value on that axis;
    /// [`SweepConfig::validate`] rejects them before a sweep runs.
    pub fn new(config: &SweepConfig) -> Self {
        Self {
            max_threshold: config.max_vote_threshold,
            threshold_step: config.vote_threshold_step,
            threshold_floor: config.vote_threshold_floor,
            scale_start: config.scale_start,
            scale_step: config.scale_step,
            scale_ceiling: config.scale_ceiling,
            max_radius: config.max_circle_size,
            radius_step: config.radius_step,
            radius_floor: config.radius_floor,
        }
    }

    /// Vote thresholds, highest first, strictly above the floor.
    pub fn thresholds(&self) -> impl Iterator<Item = u32> {
        self.threshold_countdown()
    }

    /// Accumulator scales, lowest first, strictly below the ceiling.
    ///
    /// Values are computed as `start + k * step` so that float error does not
    /// accumulate across steps.
    pub fn scales(&self) -> impl Iterator<Item = f32> {
        let grid = *self;
        (0..).map_while(move |k| grid.scale_at(k))
    }

    /// Radius guesses, largest first, down to and including the floor.
    pub fn radii(&self) -> impl Iterator<Item = u32> {
        self.radius_countdown()
    }

    fn threshold_countdown(&self) -> Countdown {
        Countdown::new(
            self.max_threshold,
            self.threshold_step,
            self.threshold_floor,
            false,
        )
    }

    fn radius_countdown(&self) -> Countdown {
        Countdown::new(self.max_radius, self.radius_step, self.radius_floor, true)
    }

    pub fn blocks(&self) -> Blocks {
        Blocks {
            grid: *self,
            thresholds: self.threshold_countdown(),
            current: None,
            scale_index: 0,
        }
    }

    /// Every combination in sweep order.
    pub fn iter(&self) -> Flatten<Blocks> {
        self.blocks().flatten()
    }

    /// Number of combinations an exhaustive sweep without detections visits.
    pub fn len(&self) -> usize {
        self.thresholds().count() * self.scales().count() * self.radii().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn scale_at(&self, index: u32) -> Option<f32> {
        if index > 0 && self.scale_step <= 0.0 {
            return None;
        }
        let scale = self.scale_start + index as f32 * self.scale_step;
        // a step lost to rounding would repeat the same scale forever
        if index > 0 && scale <= self.scale_start + (index - 1) as f32 * self.scale_step {
            return None;
        }
        (scale < self.scale_ceiling).then_some(scale)
    }
}

impl IntoIterator for &ParamGrid {
    type Item = SweepParams;
    type IntoIter = Flatten<Blocks>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the (threshold, scale) blocks of a [`ParamGrid`].
#[derive(Clone, Debug)]
pub struct Blocks {
    grid: ParamGrid,
    thresholds: Countdown,
    current: Option<u32>,
    scale_index: u32,
}

impl Iterator for Blocks {
    type Item = ParamBlock;

    fn next(&mut self) -> Option<ParamBlock> {
        loop {
            let threshold = match self.current {
                Some(t) => t,
                None => {
                    let t = self.thresholds.next()?;
                    self.current = Some(t);
                    self.scale_index = 0;
                    t
                }
            };
            match self.grid.scale_at(self.scale_index) {
                Some(scale) => {
                    self.scale_index += 1;
                    return Some(ParamBlock {
                        vote_threshold: threshold,
                        scale,
                        radii: self.grid.radius_countdown(),
                    });
                }
                None => self.current = None,
            }
        }
    }
}

/// Radius guesses for one (threshold, scale) pair.
///
/// The sweep abandons a block as soon as the detector returns anything, so
/// blocks are consumed by `for ... { break }` rather than collected.
#[derive(Clone, Debug)]
pub struct ParamBlock {
    pub vote_threshold: u32,
    pub scale: f32,
    radii: Countdown,
}

impl Iterator for ParamBlock {
    type Item = SweepParams;

    fn next(&mut self) -> Option<SweepParams> {
        let radius_guess = self.radii.next()?;
        Some(SweepParams {
            vote_threshold: self.vote_threshold,
            scale: self.scale,
            radius_guess,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_axes_match_the_classic_search() {
        let grid = ParamGrid::new(&SweepConfig::default());
        let thresholds: Vec<u32> = grid.thresholds().collect();
        assert_eq!(thresholds.len(), 50);
        assert_eq!(thresholds.first(), Some(&100));
        assert_eq!(thresholds.last(), Some(&2));

        let scales: Vec<f32> = grid.scales().collect();
        assert_eq!(scales.len(), 6);
        for (got, want) in scales.iter().zip([1.0, 2.5, 4.0, 5.5, 7.0, 8.5]) {
            assert_relative_eq!(*got, want);
        }

        let radii: Vec<u32> = grid.radii().collect();
        assert_eq!(radii.len(), 23);
        assert_eq!(radii.first(), Some(&150));
        assert_eq!(radii.last(), Some(&40));

        assert_eq!(grid.len(), 6900);
        assert_eq!(grid.iter().count(), 6900);
    }

    #[test]
    fn order_is_threshold_then_scale_then_radius() {
        let grid = ParamGrid::new(&SweepConfig::default());
        let first: Vec<SweepParams> = grid.iter().take(25).collect();
        assert_eq!(
            first[0],
            SweepParams {
                vote_threshold: 100,
                scale: 1.0,
                radius_guess: 150
            }
        );
        assert_eq!(first[22].radius_guess, 40);
        assert_eq!(first[23].radius_guess, 150);
        assert_relative_eq!(first[23].scale, 2.5);
        assert_eq!(first[23].vote_threshold, 100);

        let block = grid.blocks().nth(6).expect("seventh block");
        assert_eq!(block.vote_threshold, 98);
        assert_relative_eq!(block.scale, 1.0);
    }

    #[test]
    fn iterating_twice_gives_the_same_sequence() {
        let grid = ParamGrid::new(&SweepConfig::default());
        let a: Vec<SweepParams> = (&grid).into_iter().collect();
        let b: Vec<SweepParams> = grid.iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn radius_floor_is_inclusive_and_threshold_floor_exclusive() {
        let config = SweepConfig {
            max_vote_threshold: 5,
            vote_threshold_step: 2,
            vote_threshold_floor: 1,
            max_circle_size: 50,
            radius_step: 5,
            radius_floor: 40,
            ..SweepConfig::default()
        };
        let grid = ParamGrid::new(&config);
        assert_eq!(grid.thresholds().collect::<Vec<_>>(), vec![5, 3]);
        assert_eq!(grid.radii().collect::<Vec<_>>(), vec![50, 45, 40]);
    }

    #[test]
    fn empty_axis_empties_the_grid() {
        let config = SweepConfig {
            scale_start: 9.0,
            ..SweepConfig::default()
        };
        let grid = ParamGrid::new(&config);
        assert!(grid.is_empty());
        assert_eq!(grid.blocks().count(), 0);
    }

    #[test]
    fn radius_countdown_stops_at_zero() {
        let config = SweepConfig {
            max_circle_size: 7,
            radius_step: 5,
            radius_floor: 0,
            ..SweepConfig::default()
        };
        let grid = ParamGrid::new(&config);
        assert_eq!(grid.radii().collect::<Vec<_>>(), vec![7, 2]);
    }

    #[test]
    fn scale_axis_ends_when_the_step_is_lost_to_rounding() {
        let config = SweepConfig {
            scale_step: 1e-9,
            ..SweepConfig::default()
        };
        let grid = ParamGrid::new(&config);
        assert_eq!(grid.scales().collect::<Vec<_>>(), vec![1.0]);
        assert_eq!(grid.len(), 50 * 23);
    }
}
