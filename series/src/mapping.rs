//! Pixel/data coordinate conversion for a calibrated image.
//!
//! Pixel space has its origin at the top-left corner with y growing downward,
//! data space has y growing upward, so the y axis is inverted in both
//! directions.

use crate::{AxisCalibration, ImageExtent, Point};

pub fn pixel_to_data(
    px: f64,
    py: f64,
    calibration: &AxisCalibration,
    extent: ImageExtent,
) -> Point {
    let width = f64::from(extent.width());
    let height = f64::from(extent.height());
    Point::new(
        calibration.x_min() + (px / width) * calibration.x_span(),
        calibration.y_max() - (py / height) * calibration.y_span(),
    )
}

pub fn data_to_pixel(
    point: Point,
    calibration: &AxisCalibration,
    extent: ImageExtent,
) -> (f64, f64) {
    let width = f64::from(extent.width());
    let height = f64::from(extent.height());
    (
        (point.x - calibration.x_min()) / calibration.x_span() * width,
        (calibration.y_max() - point.y) / calibration.y_span() * height,
    )
}

/// Inclusive on both edges; NaN coordinates are never contained.
pub fn contains(extent: ImageExtent, px: f64, py: f64) -> bool {
    (0.0..=f64::from(extent.width())).contains(&px)
        && (0.0..=f64::from(extent.height())).contains(&py)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_rejects_nan_and_negative() {
        let extent = ImageExtent::new(10, 10).unwrap();
        assert!(contains(extent, 0.0, 10.0));
        assert!(!contains(extent, -0.1, 5.0));
        assert!(!contains(extent, 5.0, 10.5));
        assert!(!contains(extent, f64::NAN, 5.0));
    }
}
