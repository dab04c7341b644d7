use serde::{Deserialize, Serialize};
use series::{DigitizerError, FontSpec, GraphSeries, MarkerStyle, Rgb};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Svg,
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "png" => Ok(ExportFormat::Png),
            other => Err(format!("format must be 'svg' or 'png' (got '{other}')")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    UpperLeft,
    UpperRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotLine {
    pub name: String,
    pub color: Rgb,
    pub marker: MarkerStyle,
    pub points: Vec<(f64, f64)>,
}

impl PlotLine {
    fn from_series(series: &GraphSeries) -> Self {
        Self {
            name: series.name.clone(),
            color: series.color,
            marker: series.marker,
            points: series.points().iter().map(|p| (p.x, p.y)).collect(),
        }
    }
}

/// Everything a renderer needs to draw one plot: ordered lines with their
/// style, axis labels and bounds. Grid and legend are always on for exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub axis_font: FontSpec,
    pub title_font: FontSpec,
    pub show_grid: bool,
    pub show_legend: bool,
    pub legend_position: LegendPosition,
    pub lines: Vec<PlotLine>,
}

impl PlotDocument {
    fn with_axes_of(first: &GraphSeries, legend_position: LegendPosition) -> Self {
        let calibration = first.calibration;
        Self {
            title: None,
            x_label: first.x_label.clone(),
            y_label: first.y_label.clone(),
            x_range: (calibration.x_min(), calibration.x_max()),
            y_range: (calibration.y_min(), calibration.y_max()),
            axis_font: first.axis_font.clone(),
            title_font: first.title_font.clone(),
            show_grid: true,
            show_legend: true,
            legend_position,
            lines: Vec::new(),
        }
    }

    pub fn from_series(series: &GraphSeries) -> Result<Self, DigitizerError> {
        if series.is_empty() {
            return Err(DigitizerError::NoPointsToExport);
        }
        let mut document = Self::with_axes_of(series, LegendPosition::UpperLeft);
        document.lines.push(PlotLine::from_series(series));
        Ok(document)
    }

    /// One line per series on a shared canvas. Axes come from the first
    /// series in the list; series without points are left out.
    pub fn overlay(series_list: &[GraphSeries]) -> Result<Self, DigitizerError> {
        let first = series_list.first().ok_or(DigitizerError::NoPointsToExport)?;
        let mut document = Self::with_axes_of(first, LegendPosition::UpperRight);
        document.lines = series_list
            .iter()
            .filter(|series| !series.is_empty())
            .map(PlotLine::from_series)
            .collect();
        if document.lines.is_empty() {
            return Err(DigitizerError::NoPointsToExport);
        }
        Ok(document)
    }

    pub fn with_title(mut self, title: &str) -> Self {
        let title = title.trim();
        self.title = (!title.is_empty()).then(|| title.to_string());
        self
    }

    pub fn point_count(&self) -> usize {
        self.lines.iter().map(|line| line.points.len()).sum()
    }
}

/// Drawing backend for plot exports.
pub trait PlotRenderer {
    fn format(&self) -> ExportFormat;
    fn render(&self, document: &PlotDocument, path: &Path) -> Result<(), DigitizerError>;
}
