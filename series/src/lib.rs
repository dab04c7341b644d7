use serde::{Deserialize, Serialize};

pub mod graph;
pub mod mapping;
pub mod record;
pub mod style;

pub use graph::GraphSeries;
pub use mapping::{contains, data_to_pixel, pixel_to_data};
pub use record::{load_series_file, save_series_file, SeriesRecord};
pub use style::{FontSpec, FontWeight, MarkerStyle, Rgb};

#[derive(thiserror::Error, Debug)]
pub enum DigitizerError {
    #[error("no image loaded")]
    NoImageLoaded,
    #[error("point ({x}, {y}) lies outside the image")]
    PointOutOfBounds { x: f64, y: f64 },
    #[error("invalid calibration: {0}")]
    InvalidCalibration(String),
    #[error("invalid image extent {width}x{height}")]
    InvalidExtent { width: u32, height: u32 },
    #[error("malformed series data: {0}")]
    MalformedSeriesData(String),
    #[error("no points to export")]
    NoPointsToExport,
    #[error("index {index} out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid color '{0}'")]
    InvalidColor(String),
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),
    #[error("render error: {0}")]
    Render(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Axis bounds defining the affine pixel/data map of one series.
///
/// Only constructible through [`AxisCalibration::new`], so every value in
/// circulation has finite bounds with `max > min` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisCalibration {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl AxisCalibration {
    /// Bounds used by a combined series when there is nothing to adopt.
    pub const PREVIEW_DEFAULT: AxisCalibration = AxisCalibration {
        x_min: 0.0,
        x_max: 10.0,
        y_min: 0.0,
        y_max: 10.0,
    };

    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self, DigitizerError> {
        check_axis("x", x_min, x_max)?;
        check_axis("y", y_min, y_max)?;
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    pub fn x_span(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn y_span(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn with_x(self, x_min: f64, x_max: f64) -> Result<Self, DigitizerError> {
        Self::new(x_min, x_max, self.y_min, self.y_max)
    }

    pub fn with_y(self, y_min: f64, y_max: f64) -> Result<Self, DigitizerError> {
        Self::new(self.x_min, self.x_max, y_min, y_max)
    }
}

impl Default for AxisCalibration {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 12.5,
            y_min: 0.0,
            y_max: 1.0,
        }
    }
}

fn check_axis(axis: &str, min: f64, max: f64) -> Result<(), DigitizerError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(DigitizerError::InvalidCalibration(format!(
            "{axis} bounds must be finite (got {min}..{max})"
        )));
    }
    if max <= min {
        return Err(DigitizerError::InvalidCalibration(format!(
            "{axis}_max must be greater than {axis}_min (got {min}..{max})"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExtentFields")]
pub struct ImageExtent {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct ExtentFields {
    width: u32,
    height: u32,
}

impl TryFrom<ExtentFields> for ImageExtent {
    type Error = DigitizerError;

    fn try_from(fields: ExtentFields) -> Result<Self, Self::Error> {
        Self::new(fields.width, fields.height)
    }
}

impl ImageExtent {
    pub fn new(width: u32, height: u32) -> Result<Self, DigitizerError> {
        if width == 0 || height == 0 {
            return Err(DigitizerError::InvalidExtent { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceImage {
    pub path: String,
    pub extent: ImageExtent,
}

/// A digitized value in data space. Serialized as an `[x, y]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(point: Point) -> Self {
        (point.x, point.y)
    }
}
