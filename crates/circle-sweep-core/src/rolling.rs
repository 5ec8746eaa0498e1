use std::collections::VecDeque;

/// Median over the last `window` samples.
///
/// The magazine classifier runs each color's lit-pixel count through one
/// so a single noisy frame cannot flip the reading.
#[derive(Clone, Debug)]
pub struct RollingMedian {
    window: usize,
    values: VecDeque<f64>,
}

impl RollingMedian {
    /// A window of zero is treated as one.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            values: VecDeque::with_capacity(window),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Push `value`, evicting the oldest sample when full, and return the
    /// median of the current window. Even-sized windows average the two
    /// middle samples.
    pub fn calculate(&mut self, value: f64) -> f64 {
        if self.values.len() >= self.window {
            self.values.pop_front();
        }
        self.values.push_back(value);

        let mut sorted: Vec<f64> = self.values.iter().copied().collect();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
