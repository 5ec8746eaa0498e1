use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::bounds::ColorBound;
use crate::hsv::rgb_to_hsv;

/// Mask cleanup applied after color thresholding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskParams {
    /// Median filter radius; 0 disables it.
    pub median_radius: u32,
    /// Erosion radius (chessboard distance), removes speckle.
    pub erode: u8,
    /// Dilation radius (chessboard distance), regrows the blob. Keep it equal
    /// to `erode`: a larger square dilation turns round blobs into rounded
    /// squares whose corner arcs vote for four separate centers.
    pub dilate: u8,
}

impl Default for MaskParams {
    fn default() -> Self {
        Self {
            median_radius: 8,
            erode: 3,
            dilate: 3,
        }
    }
}

/// Binary mask (0 / 255) of the pixels inside `bound`, cleaned up.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(frame, bound, params), fields(width = frame.width(), height = frame.height()))
)]
pub fn build_mask(frame: &RgbImage, bound: &ColorBound, params: &MaskParams) -> GrayImage {
    let (w, h) = frame.dimensions();
    let mut mask = GrayImage::new(w, h);
    for (x, y, px) in frame.enumerate_pixels() {
        let px = if bound.invert {
            image::Rgb(px.0.map(|c| 255 - c))
        } else {
            *px
        };
        if bound.range.contains(rgb_to_hsv(px)) {
            mask.put_pixel(x, y, Luma([255]));
        }
    }

    if params.median_radius > 0 {
        mask = imageproc::filter::median_filter(&mask, params.median_radius, params.median_radius);
    }
    if params.erode > 0 {
        mask = imageproc::morphology::erode(&mask, Norm::LInf, params.erode);
    }
    if params.dilate > 0 {
        mask = imageproc::morphology::dilate(&mask, Norm::LInf, params.dilate);
    }
    mask
}
