//! Center-vote accumulator at `dp` pixels per cell.
//!
//! Cell `(c, r)` covers image pixels whose coordinates round to
//! `(c * dp, r * dp)`; its center maps back to exactly that point.

use nalgebra::Point2;

use crate::edges::EdgeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Peak {
    pub col: usize,
    pub row: usize,
    pub votes: u32,
}

pub(crate) struct Accumulator {
    cols: usize,
    rows: usize,
    dp: f32,
    cells: Vec<u32>,
}

impl Accumulator {
    pub fn new(width: u32, height: u32, dp: f32) -> Self {
        let cols = cell_count(width, dp);
        let rows = cell_count(height, dp);
        Self {
            cols,
            rows,
            dp,
            cells: vec![0; cols * rows],
        }
    }

    #[cfg(test)]
    pub fn from_cells(cols: usize, rows: usize, dp: f32, cells: Vec<u32>) -> Self {
        assert_eq!(cells.len(), cols * rows);
        Self {
            cols,
            rows,
            dp,
            cells,
        }
    }

    #[inline]
    fn get(&self, col: isize, row: isize) -> u32 {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return 0;
        }
        self.cells[row as usize * self.cols + col as usize]
    }

    /// Cast one vote per sampled radius on both sides of every edge pixel.
    ///
    /// Radii are sampled every `dp` pixels and centered inside the window,
    /// so a window narrower than one cell still gets a vote at its middle.
    pub fn vote(&mut self, edges: &EdgeMap, min_r: f32, max_r: f32) {
        let span = (max_r - min_r).max(0.0);
        let steps = (span / self.dp).floor() as usize + 1;
        let offset = 0.5 * (span - (steps - 1) as f32 * self.dp);
        let radii: Vec<f32> = (0..steps)
            .map(|k| min_r + offset + k as f32 * self.dp)
            .filter(|&r| r > 0.0)
            .collect();

        let inv_dp = 1.0 / self.dp;
        for p in &edges.points {
            let x = p.x as f32;
            let y = p.y as f32;
            for &r in &radii {
                for sign in [1.0f32, -1.0] {
                    let cx = ((x + sign * p.dx * r) * inv_dp).round();
                    let cy = ((y + sign * p.dy * r) * inv_dp).round();
                    if cx < 0.0 || cy < 0.0 {
                        continue;
                    }
                    let (col, row) = (cx as usize, cy as usize);
                    if col < self.cols && row < self.rows {
                        self.cells[row * self.cols + col] += 1;
                    }
                }
            }
        }
    }

    /// Local maxima with at least `threshold` votes, strongest first.
    ///
    /// A cell must beat its left and upper neighbours strictly and its right
    /// and lower neighbours non-strictly, so a plateau of two equal cells
    /// yields exactly one peak.
    pub fn peaks(&self, threshold: u32) -> Vec<Peak> {
        let mut peaks = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let v = self.cells[row * self.cols + col];
                if v == 0 || v < threshold {
                    continue;
                }
                let (c, r) = (col as isize, row as isize);
                if v > self.get(c - 1, r)
                    && v >= self.get(c + 1, r)
                    && v > self.get(c, r - 1)
                    && v >= self.get(c, r + 1)
                {
                    peaks.push(Peak {
                        col,
                        row,
                        votes: v,
                    });
                }
            }
        }
        peaks.sort_by(|a, b| {
            b.votes
                .cmp(&a.votes)
                .then(a.row.cmp(&b.row))
                .then(a.col.cmp(&b.col))
        });
        peaks
    }

    /// Vote-weighted centroid of the 3x3 block around `peak`, in pixels.
    pub fn refine(&self, peak: &Peak) -> Point2<f32> {
        let mut sum = 0.0f32;
        let mut sx = 0.0f32;
        let mut sy = 0.0f32;
        for dr in -1isize..=1 {
            for dc in -1isize..=1 {
                let c = peak.col as isize + dc;
                let r = peak.row as isize + dr;
                let w = self.get(c, r) as f32;
                sum += w;
                sx += w * c as f32;
                sy += w * r as f32;
            }
        }
        if sum <= 0.0 {
            return Point2::new(peak.col as f32 * self.dp, peak.row as f32 * self.dp);
        }
        Point2::new(sx / sum * self.dp, sy / sum * self.dp)
    }
}

fn cell_count(extent: u32, dp: f32) -> usize {
    if extent == 0 {
        return 0;
    }
    ((extent - 1) as f32 / dp).round() as usize + 1
}
