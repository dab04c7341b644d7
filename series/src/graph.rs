use crate::mapping::{contains, data_to_pixel, pixel_to_data};
use crate::style::{FontSpec, MarkerStyle, Rgb};
use crate::{AxisCalibration, DigitizerError, ImageExtent, Point, SourceImage};

pub const DEFAULT_SERIES_NAME: &str = "Manual Data";
pub const DEFAULT_X_LABEL: &str = "Error in meters";
pub const DEFAULT_Y_LABEL: &str = "CDF";

/// One named, styled set of digitized points tied to one calibration.
///
/// Points are stored in data space in click order. Changing the calibration
/// or any style attribute never rewrites points that were already added.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSeries {
    pub name: String,
    pub x_label: String,
    pub y_label: String,
    pub calibration: AxisCalibration,
    pub color: Rgb,
    pub marker: MarkerStyle,
    pub axis_font: FontSpec,
    pub title_font: FontSpec,
    points: Vec<Point>,
    image: Option<SourceImage>,
}

impl Default for GraphSeries {
    fn default() -> Self {
        Self::new(DEFAULT_SERIES_NAME)
    }
}

impl GraphSeries {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            x_label: DEFAULT_X_LABEL.to_string(),
            y_label: DEFAULT_Y_LABEL.to_string(),
            calibration: AxisCalibration::default(),
            color: Rgb::default(),
            marker: MarkerStyle::default(),
            axis_font: FontSpec::axis_default(),
            title_font: FontSpec::title_default(),
            points: Vec::new(),
            image: None,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    /// Replaces the reference image. Points digitized from the previous image
    /// are dropped.
    pub fn load_image(&mut self, image: SourceImage) {
        log::debug!(
            "series '{}' loaded image {} ({}x{})",
            self.name,
            image.path,
            image.extent.width(),
            image.extent.height()
        );
        self.image = Some(image);
        self.points.clear();
    }

    /// Restores the image reference of a saved series without touching its
    /// points.
    pub fn attach_image(&mut self, image: SourceImage) {
        self.image = Some(image);
    }

    pub fn add_point(&mut self, px: f64, py: f64) -> Result<Point, DigitizerError> {
        let extent = self
            .image
            .as_ref()
            .map(|image| image.extent)
            .ok_or(DigitizerError::NoImageLoaded)?;
        if !contains(extent, px, py) {
            return Err(DigitizerError::PointOutOfBounds { x: px, y: py });
        }
        let point = pixel_to_data(px, py, &self.calibration, extent);
        self.points.push(point);
        log::debug!(
            "series '{}' pixel ({px}, {py}) -> ({}, {})",
            self.name,
            point.x,
            point.y
        );
        Ok(point)
    }

    /// Appends points that are already in data space (loaded or combined).
    pub fn extend_points<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = Point>,
    {
        self.points.extend(points);
    }

    pub fn remove_last(&mut self) -> Option<Point> {
        self.points.pop()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn set_calibration(&mut self, calibration: AxisCalibration) {
        self.calibration = calibration;
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn set_marker(&mut self, marker: MarkerStyle) {
        self.marker = marker;
    }

    pub fn set_fonts(&mut self, axis_font: Option<FontSpec>, title_font: Option<FontSpec>) {
        if let Some(font) = axis_font {
            self.axis_font = font;
        }
        if let Some(font) = title_font {
            self.title_font = font;
        }
    }

    pub fn set_labels(&mut self, x_label: &str, y_label: &str) {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
    }

    pub fn rename(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Pixel positions of the stored points under the current calibration,
    /// for drawing markers back over the image.
    pub fn marker_pixels(&self) -> Vec<(f64, f64)> {
        let Some(image) = &self.image else {
            return Vec::new();
        };
        self.points
            .iter()
            .map(|point| data_to_pixel(*point, &self.calibration, image.extent))
            .collect()
    }

    pub fn point_labels(&self) -> Vec<String> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| format!("Point {}: ({:.2}, {:.2})", i + 1, p.x, p.y))
            .collect()
    }

    pub fn extent(&self) -> Option<ImageExtent> {
        self.image.as_ref().map(|image| image.extent)
    }
}
