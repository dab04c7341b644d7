//! Collection operations on saved series files that need no daemon.

use crate::protocol::{LoadFailure, PlotOptions};
use digitizer_core::session::render_document;
use digitizer_core::{ensure_extension, DigitizerSettings, SeriesCollection};
use series::save_series_file;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct OfflineOutcome {
    pub output: PathBuf,
    pub loaded: Vec<String>,
    pub failed: Vec<LoadFailure>,
    pub points: usize,
}

fn load_collection(inputs: &[PathBuf]) -> (SeriesCollection, Vec<String>, Vec<LoadFailure>) {
    let mut collection = SeriesCollection::new();
    let mut loaded = Vec::new();
    let mut failed = Vec::new();
    for report in collection.load_files(inputs) {
        match report.result {
            Ok(name) => loaded.push(name),
            Err(err) => failed.push(LoadFailure {
                path: report.path.to_string_lossy().to_string(),
                message: err.to_string(),
            }),
        }
    }
    (collection, loaded, failed)
}

/// Merges the points of every readable input into one series file.
pub fn combine_files(
    inputs: &[PathBuf],
    output: &Path,
    name: Option<&str>,
) -> Result<OfflineOutcome, String> {
    let (collection, loaded, failed) = load_collection(inputs);
    if collection.is_empty() {
        return Err("No series could be loaded".to_string());
    }
    let mut combined = collection.combine();
    if let Some(name) = name {
        combined.rename(name);
    }
    let output = ensure_extension(output, "json");
    save_series_file(&combined, &output).map_err(|e| e.to_string())?;
    Ok(OfflineOutcome {
        output,
        loaded,
        failed,
        points: combined.len(),
    })
}

/// Draws every readable input as its own line on one plot.
pub fn render_files(
    inputs: &[PathBuf],
    output: &Path,
    options: &PlotOptions,
    defaults: &DigitizerSettings,
) -> Result<OfflineOutcome, String> {
    let (collection, loaded, failed) = load_collection(inputs);
    let mut document = collection.render_overlay().map_err(|e| e.to_string())?;
    if let Some(title) = &options.title {
        document = document.with_title(title);
    }
    let renderer = options.renderer(defaults);
    let output = render_document(&renderer, &document, output).map_err(|e| e.to_string())?;
    Ok(OfflineOutcome {
        output,
        loaded,
        failed,
        points: document.point_count(),
    })
}
