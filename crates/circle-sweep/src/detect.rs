//! End-to-end helpers from image files or RGB buffers.

use std::path::Path;

use circle_sweep_hough::{EdgeParams, HoughCircleDetector};
use image::{GrayImage, ImageReader, RgbImage};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::io::{SweepIoError, SweepRunConfig};
use crate::sweep::{run_sweep, SweepConfigError, SweepOutcome};

/// Decode any format `image` understands into 8-bit RGB.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage, SweepIoError> {
    Ok(ImageReader::open(path)?.decode()?.to_rgb8())
}

/// Luma conversion, optionally followed by a Gaussian blur.
///
/// `blur_sigma` must be positive when set; [`SweepRunConfig::validate`]
/// checks that.
pub fn to_gray(rgb: &RgbImage, blur_sigma: Option<f32>) -> GrayImage {
    let gray = image::imageops::grayscale(rgb);
    match blur_sigma {
        Some(sigma) if sigma > 0.0 => imageproc::filter::gaussian_blur_f32(&gray, sigma),
        _ => gray,
    }
}

/// Prepare a detector for `rgb` (edge extraction happens here, once).
pub fn prepare_detector(
    rgb: &RgbImage,
    edges: &EdgeParams,
    blur_sigma: Option<f32>,
) -> HoughCircleDetector {
    HoughCircleDetector::new(&to_gray(rgb, blur_sigma), edges)
}

/// Validate `run`, prepare the frame and sweep it.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(rgb, run), fields(width = rgb.width(), height = rgb.height()))
)]
pub fn sweep_image(rgb: &RgbImage, run: &SweepRunConfig) -> Result<SweepOutcome, SweepConfigError> {
    run.validate()?;
    let detector = prepare_detector(rgb, &run.edges, run.blur_sigma);
    run_sweep(&detector, &run.sweep)
}
