use serde::{Deserialize, Serialize};
use series::SeriesRecord;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub name: String,
    pub points: usize,
    pub x_label: String,
    pub y_label: String,
    pub path: PathBuf,
}

/// Lists the saved series in `series_dir`, sorted by name. Files that do not
/// parse as series records are skipped.
pub fn scan_series_entries(series_dir: &Path) -> Vec<SeriesEntry> {
    let mut entries = Vec::new();
    if let Ok(dir_entries) = std::fs::read_dir(series_dir) {
        for entry in dir_entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match SeriesRecord::load_from_file(&path) {
                Ok(record) => entries.push(SeriesEntry {
                    name: record.name,
                    points: record.points.len(),
                    x_label: record.x_label,
                    y_label: record.y_label,
                    path,
                }),
                Err(err) => log::debug!("skipping {}: {err}", path.display()),
            }
        }
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// File name for a library entry. Separators, spaces and leading dots become
/// `_` so the result always stays directly inside `series_dir`.
pub fn series_file_path_for(series_dir: &Path, name: &str) -> PathBuf {
    let mut safe: String = name
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    let dots = safe.len() - safe.trim_start_matches('.').len();
    safe.replace_range(..dots, &"_".repeat(dots));
    if safe.is_empty() {
        safe.push_str("unnamed");
    }
    series_dir.join(format!("{safe}.json"))
}

/// Appends `.{extension}` unless the path already ends with it.
pub fn ensure_extension(path: &Path, extension: &str) -> PathBuf {
    let matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false);
    if matches {
        path.to_path_buf()
    } else {
        let mut raw = path.as_os_str().to_os_string();
        raw.push(".");
        raw.push(extension);
        PathBuf::from(raw)
    }
}
