use crate::style::{FontSpec, MarkerStyle, Rgb};
use crate::{AxisCalibration, DigitizerError, GraphSeries, ImageExtent, Point, SourceImage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const UNNAMED_SERIES: &str = "Unnamed Graph";

/// On-disk shape of a saved series.
///
/// `points`, both labels and all four bounds are required; everything else
/// falls back to the documented defaults. `color` and `marker` are accepted
/// as older spellings of `line_color` and `marker_style`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    #[serde(default = "default_record_name")]
    pub name: String,
    pub points: Vec<Point>,
    pub x_label: String,
    pub y_label: String,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    #[serde(default, alias = "color")]
    pub line_color: Rgb,
    #[serde(default, alias = "marker")]
    pub marker_style: MarkerStyle,
    #[serde(default = "FontSpec::axis_default")]
    pub axis_font: FontSpec,
    #[serde(default = "FontSpec::title_default")]
    pub title_font: FontSpec,
    #[serde(default)]
    pub image_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,
}

fn default_record_name() -> String {
    UNNAMED_SERIES.to_string()
}

impl SeriesRecord {
    pub fn from_json_slice(data: &[u8]) -> Result<Self, DigitizerError> {
        serde_json::from_slice(data).map_err(|e| DigitizerError::MalformedSeriesData(e.to_string()))
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, DigitizerError> {
        serde_json::from_value(value)
            .map_err(|e| DigitizerError::MalformedSeriesData(e.to_string()))
    }

    pub fn from_series(series: &GraphSeries) -> Self {
        let image = series.image();
        Self {
            name: series.name.clone(),
            points: series.points().to_vec(),
            x_label: series.x_label.clone(),
            y_label: series.y_label.clone(),
            x_min: series.calibration.x_min(),
            x_max: series.calibration.x_max(),
            y_min: series.calibration.y_min(),
            y_max: series.calibration.y_max(),
            line_color: series.color,
            marker_style: series.marker,
            axis_font: series.axis_font.clone(),
            title_font: series.title_font.clone(),
            image_path: image.map(|i| i.path.clone()).unwrap_or_default(),
            image_width: image.map(|i| i.extent.width()),
            image_height: image.map(|i| i.extent.height()),
        }
    }

    pub fn into_series(self) -> Result<GraphSeries, DigitizerError> {
        let calibration = AxisCalibration::new(self.x_min, self.x_max, self.y_min, self.y_max)?;
        let mut series = GraphSeries::new(&self.name);
        series.x_label = self.x_label;
        series.y_label = self.y_label;
        series.calibration = calibration;
        series.color = self.line_color;
        series.marker = self.marker_style;
        series.axis_font = self.axis_font;
        series.title_font = self.title_font;
        if let (Some(width), Some(height)) = (self.image_width, self.image_height) {
            if !self.image_path.is_empty() {
                series.attach_image(SourceImage {
                    path: self.image_path,
                    extent: ImageExtent::new(width, height)?,
                });
            }
        }
        series.extend_points(self.points);
        Ok(series)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DigitizerError> {
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, DigitizerError> {
        let data = fs::read(path)?;
        Self::from_json_slice(&data)
    }
}

/// Writes `series` as JSON. An empty series is refused and nothing is written.
pub fn save_series_file<P: AsRef<Path>>(series: &GraphSeries, path: P) -> Result<(), DigitizerError> {
    if series.is_empty() {
        return Err(DigitizerError::NoPointsToExport);
    }
    SeriesRecord::from_series(series).save_to_file(&path)?;
    log::info!(
        "saved series '{}' ({} points) to {}",
        series.name,
        series.len(),
        path.as_ref().display()
    );
    Ok(())
}

pub fn load_series_file<P: AsRef<Path>>(path: P) -> Result<GraphSeries, DigitizerError> {
    SeriesRecord::load_from_file(path)?.into_series()
}
