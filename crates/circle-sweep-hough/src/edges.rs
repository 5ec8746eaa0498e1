//! Canny edge pixels annotated with gradient direction.

use image::GrayImage;

use crate::params::EdgeParams;

const DIRECTION_SIGMA: f32 = 1.0;

/// An edge pixel and the unit direction of the intensity gradient there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgePoint {
    pub x: u32,
    pub y: u32,
    pub dx: f32,
    pub dy: f32,
}

/// Edge pixels of one frame, in raster order.
#[derive(Clone, Debug, Default)]
pub struct EdgeMap {
    pub width: u32,
    pub height: u32,
    pub points: Vec<EdgePoint>,
}

impl EdgeMap {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Run Canny on `gray` and keep edge pixels with a non-zero Scharr gradient.
///
/// Directions come from Scharr on a lightly smoothed copy rather than the
/// Sobel inside Canny: a one-degree error already moves a vote two pixels at
/// radius 100, and binary masks have staircase borders.
pub fn extract_edges(gray: &GrayImage, params: &EdgeParams) -> EdgeMap {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return EdgeMap {
            width,
            height,
            points: Vec::new(),
        };
    }

    let canny = imageproc::edges::canny(gray, params.low(), params.canny_high);
    let smooth = imageproc::filter::gaussian_blur_f32(gray, DIRECTION_SIGMA);
    let gx = imageproc::gradients::horizontal_scharr(&smooth);
    let gy = imageproc::gradients::vertical_scharr(&smooth);
    let gx_raw = gx.as_raw();
    let gy_raw = gy.as_raw();

    let mut points = Vec::new();
    for (idx, &edge) in canny.as_raw().iter().enumerate() {
        if edge == 0 {
            continue;
        }
        let gxv = gx_raw[idx] as f32;
        let gyv = gy_raw[idx] as f32;
        let mag = (gxv * gxv + gyv * gyv).sqrt();
        if mag < 1e-3 {
            continue;
        }
        points.push(EdgePoint {
            x: idx as u32 % width,
            y: idx as u32 / width,
            dx: gxv / mag,
            dy: gyv / mag,
        });
    }

    EdgeMap {
        width,
        height,
        points,
    }
}
