use crate::plot_view::PlotDocument;
use series::{AxisCalibration, DigitizerError, GraphSeries, SeriesRecord};
use std::path::{Path, PathBuf};

pub const COMBINED_SERIES_NAME: &str = "Combined";

/// Outcome of loading one file in a batch.
#[derive(Debug)]
pub struct LoadReport {
    pub path: PathBuf,
    pub result: Result<String, DigitizerError>,
}

/// Saved series gathered for a combined preview or export.
#[derive(Debug, Clone, Default)]
pub struct SeriesCollection {
    series: Vec<GraphSeries>,
}

impl SeriesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one serialized series record.
    pub fn load(data: &[u8]) -> Result<GraphSeries, DigitizerError> {
        SeriesRecord::from_json_slice(data)?.into_series()
    }

    pub fn load_file(path: &Path) -> Result<GraphSeries, DigitizerError> {
        let data = std::fs::read(path)?;
        Self::load(&data)
    }

    /// Loads every path independently. A failing file is reported and
    /// skipped; entries loaded before it stay as they are.
    pub fn load_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Vec<LoadReport> {
        paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                let result = Self::load_file(path).map(|series| {
                    let name = series.name.clone();
                    self.series.push(series);
                    name
                });
                if let Err(err) = &result {
                    log::warn!("failed to load {}: {err}", path.display());
                }
                LoadReport {
                    path: path.to_path_buf(),
                    result,
                }
            })
            .collect()
    }

    pub fn push(&mut self, series: GraphSeries) {
        self.series.push(series);
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GraphSeries> {
        self.series.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GraphSeries> {
        self.series.iter()
    }

    pub fn as_slice(&self) -> &[GraphSeries] {
        &self.series
    }

    fn check_index(&self, index: usize) -> Result<(), DigitizerError> {
        if index >= self.series.len() {
            return Err(DigitizerError::IndexOutOfRange {
                index,
                len: self.series.len(),
            });
        }
        Ok(())
    }

    pub fn rename(&mut self, index: usize, new_name: &str) -> Result<(), DigitizerError> {
        self.check_index(index)?;
        self.series[index].rename(new_name);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<GraphSeries, DigitizerError> {
        self.check_index(index)?;
        Ok(self.series.remove(index))
    }

    pub fn clear(&mut self) {
        self.series.clear();
    }

    pub fn combine(&self) -> GraphSeries {
        combine(&self.series)
    }

    pub fn render_overlay(&self) -> Result<PlotDocument, DigitizerError> {
        render_overlay(&self.series)
    }
}

/// Merges all points into one series. Labels, bounds and style are taken from
/// the first series, not derived from the data.
pub fn combine(series_list: &[GraphSeries]) -> GraphSeries {
    let mut combined = match series_list.first() {
        Some(first) => {
            let mut template = GraphSeries::new(COMBINED_SERIES_NAME);
            template.x_label = first.x_label.clone();
            template.y_label = first.y_label.clone();
            template.calibration = first.calibration;
            template.color = first.color;
            template.marker = first.marker;
            template.axis_font = first.axis_font.clone();
            template.title_font = first.title_font.clone();
            template
        }
        None => {
            let mut empty = GraphSeries::new(COMBINED_SERIES_NAME);
            empty.x_label.clear();
            empty.y_label.clear();
            empty.calibration = AxisCalibration::PREVIEW_DEFAULT;
            empty
        }
    };
    for series in series_list {
        combined.extend_points(series.points().iter().copied());
    }
    combined
}

pub fn render_overlay(series_list: &[GraphSeries]) -> Result<PlotDocument, DigitizerError> {
    PlotDocument::overlay(series_list)
}
