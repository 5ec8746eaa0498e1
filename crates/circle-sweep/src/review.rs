//! Post-sweep review: one verdict and, when unambiguous, one annotated frame
//! per log entry.

use circle_sweep_core::Circle;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_circle_mut};
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

use crate::sweep::{CircleLog, LogEntry, SweepParams};

pub const MARKER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const CENTER_COLOR: Rgb<u8> = Rgb([255, 128, 0]);
pub const MARKER_THICKNESS: i32 = 2;
/// Half the side of the filled box drawn on the center.
pub const CENTER_HALF_SIZE: i32 = 5;

/// What a log entry amounts to once reviewed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReviewVerdict {
    Single(Circle),
    /// The entry holds `count` candidates where one was wanted.
    Ambiguous { count: usize },
}

/// What to do with an ambiguous entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Stop reviewing at the first ambiguous entry.
    #[default]
    Abort,
    /// Leave it out and keep going.
    Skip,
}

pub fn review_entry(entry: &LogEntry) -> ReviewVerdict {
    match entry.candidates.as_slice() {
        [only] => ReviewVerdict::Single(*only),
        many => ReviewVerdict::Ambiguous { count: many.len() },
    }
}

/// Copy of `original` with `circle` marked: a red ring at its rounded radius
/// and a filled orange box on its rounded center.
pub fn annotate(original: &RgbImage, circle: &Circle) -> RgbImage {
    let mut out = original.clone();
    let (x, y) = circle.pixel_center();
    let r = circle.pixel_radius();
    for t in 0..MARKER_THICKNESS {
        let ring = r - t;
        if ring >= 0 {
            draw_hollow_circle_mut(&mut out, (x, y), ring, MARKER_COLOR);
        }
    }
    let side = (2 * CENTER_HALF_SIZE + 1) as u32;
    draw_filled_rect_mut(
        &mut out,
        Rect::at(x - CENTER_HALF_SIZE, y - CENTER_HALF_SIZE).of_size(side, side),
        CENTER_COLOR,
    );
    out
}

/// `left` and `right` next to each other; a shorter image is padded with
/// black below.
pub fn side_by_side(left: &RgbImage, right: &RgbImage) -> RgbImage {
    let width = left.width() + right.width();
    let height = left.height().max(right.height());
    let mut out = RgbImage::new(width, height);
    image::imageops::replace(&mut out, left, 0, 0);
    image::imageops::replace(&mut out, right, i64::from(left.width()), 0);
    out
}

/// One reviewed log entry.
#[derive(Clone, Debug)]
pub struct ReviewFrame {
    /// Position of the entry in the log.
    pub index: usize,
    pub params: SweepParams,
    pub verdict: ReviewVerdict,
    /// Original and annotated copy side by side; `None` when ambiguous.
    pub image: Option<RgbImage>,
}

/// Review every entry of `log` against the untouched `original`, lazily.
pub fn review<'a>(
    original: &'a RgbImage,
    log: &'a CircleLog,
) -> impl Iterator<Item = ReviewFrame> + 'a {
    log.iter().enumerate().map(move |(index, entry)| {
        let verdict = review_entry(entry);
        let image = match verdict {
            ReviewVerdict::Single(circle) => {
                Some(side_by_side(original, &annotate(original, &circle)))
            }
            ReviewVerdict::Ambiguous { count } => {
                log::warn!("log entry {index} holds {count} candidates");
                None
            }
        };
        ReviewFrame {
            index,
            params: entry.params,
            verdict,
            image,
        }
    })
}
