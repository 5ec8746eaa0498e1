use serde::{Deserialize, Serialize};

use crate::hsv::HsvRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alliance {
    Red,
    Blue,
}

/// Color gate for one ball color.
///
/// Red balls straddle the hue wrap-around, so the red gate inverts the frame
/// first: inverted red lands around cyan, where one contiguous hue range
/// covers it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBound {
    pub alliance: Alliance,
    pub range: HsvRange,
    #[serde(default)]
    pub invert: bool,
}

impl ColorBound {
    /// Bounds tuned on the intake camera; the magazine camera reuses them.
    pub fn intake(alliance: Alliance) -> Self {
        match alliance {
            Alliance::Red => Self {
                alliance,
                range: HsvRange::new([43, 18, 234], [110, 172, 255]),
                invert: true,
            },
            Alliance::Blue => Self {
                alliance,
                range: HsvRange::new([90, 50, 70], [128, 255, 255]),
                invert: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hsv::rgb_to_hsv;
    use image::Rgb;

    #[test]
    fn blue_intake_accepts_saturated_blue() {
        let bound = ColorBound::intake(Alliance::Blue);
        assert!(!bound.invert);
        assert!(bound.range.contains(rgb_to_hsv(Rgb([20, 60, 200]))));
        assert!(!bound.range.contains(rgb_to_hsv(Rgb([200, 40, 30]))));
    }

    #[test]
    fn red_intake_matches_inverted_red() {
        let bound = ColorBound::intake(Alliance::Red);
        assert!(bound.invert);
        // a ball in shade: the gate wants a bright, moderately saturated inverse
        let red = Rgb([160u8, 10, 10]);
        let inverted = Rgb(red.0.map(|c| 255 - c));
        assert!(bound.range.contains(rgb_to_hsv(inverted)));
    }

    #[test]
    fn alliance_serializes_lowercase() {
        let json = serde_json::to_string(&Alliance::Blue).expect("serialize");
        assert_eq!(json, "\"blue\"");
    }
}
