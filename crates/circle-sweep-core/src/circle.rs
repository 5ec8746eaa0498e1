use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// One circle reported by a detector, in image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2<f32>,
    pub radius: f32,
    /// Accumulator votes at the center peak. Zero when the source has no score.
    #[serde(default)]
    pub votes: u32,
}

/// All circles returned by a single detector invocation.
pub type CandidateSet = Vec<Circle>;

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            center: Point2::new(x, y),
            radius,
            votes: 0,
        }
    }

    pub fn with_votes(mut self, votes: u32) -> Self {
        self.votes = votes;
        self
    }

    /// Center rounded to the nearest pixel (half away from zero).
    pub fn pixel_center(&self) -> (i32, i32) {
        (self.center.x.round() as i32, self.center.y.round() as i32)
    }

    pub fn pixel_radius(&self) -> i32 {
        self.radius.round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_center_rounds_half_away_from_zero() {
        let c = Circle::new(10.5, 19.49, 40.5);
        assert_eq!(c.pixel_center(), (11, 19));
        assert_eq!(c.pixel_radius(), 41);
    }

    #[test]
    fn votes_default_when_missing_from_json() {
        let c: Circle =
            serde_json::from_str(r#"{"center":[1.0,2.0],"radius":3.0}"#).expect("parse");
        assert_eq!(c.votes, 0);
        assert_eq!(c, Circle::new(1.0, 2.0, 3.0));
    }
}
