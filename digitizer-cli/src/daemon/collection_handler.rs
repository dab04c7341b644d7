use crate::protocol::{CollectionEntry, DaemonResponse, LoadFailure, PlotOptions};
use digitizer_core::{DigitizerSession, DigitizerSettings};
use std::path::Path;

pub fn collection_load(session: &mut DigitizerSession, paths: &[String]) -> DaemonResponse {
    let reports = session.collection_mut().load_files(paths);
    let mut loaded = Vec::new();
    let mut failed = Vec::new();
    for report in reports {
        match report.result {
            Ok(name) => loaded.push(name),
            Err(err) => failed.push(LoadFailure {
                path: report.path.to_string_lossy().to_string(),
                message: err.to_string(),
            }),
        }
    }
    DaemonResponse::CollectionLoaded { loaded, failed }
}

pub fn collection_list(session: &mut DigitizerSession) -> DaemonResponse {
    let entries = session
        .collection()
        .iter()
        .enumerate()
        .map(|(index, series)| CollectionEntry {
            index,
            name: series.name.clone(),
            points: series.len(),
            x_label: series.x_label.clone(),
            y_label: series.y_label.clone(),
        })
        .collect();
    DaemonResponse::CollectionList { entries }
}

pub fn collection_rename(session: &mut DigitizerSession, index: usize, name: &str) -> DaemonResponse {
    match session.collection_mut().rename(index, name) {
        Ok(()) => DaemonResponse::Ok {
            message: format!("Series {index} renamed to '{name}'"),
        },
        Err(err) => DaemonResponse::Error {
            message: err.to_string(),
        },
    }
}

pub fn collection_remove(session: &mut DigitizerSession, index: usize) -> DaemonResponse {
    match session.collection_mut().remove(index) {
        Ok(series) => DaemonResponse::Ok {
            message: format!("Removed '{}' from the collection", series.name),
        },
        Err(err) => DaemonResponse::Error {
            message: err.to_string(),
        },
    }
}

pub fn collection_clear(session: &mut DigitizerSession) -> DaemonResponse {
    session.collection_mut().clear();
    DaemonResponse::Ok {
        message: "Collection cleared".to_string(),
    }
}

/// Opens the merged points of the collection as a new active tab.
pub fn collection_combine(session: &mut DigitizerSession) -> DaemonResponse {
    if session.collection().is_empty() {
        return DaemonResponse::Error {
            message: "Collection is empty".to_string(),
        };
    }
    let combined = session.collection().combine();
    let points = combined.len();
    session.new_tab(Some(&combined.name));
    *session.active_mut() = combined;
    DaemonResponse::Ok {
        message: format!(
            "Combined {} series into tab {} ({points} points)",
            session.collection().len(),
            session.active_index()
        ),
    }
}

pub fn collection_export(
    session: &mut DigitizerSession,
    path: &str,
    options: &PlotOptions,
    defaults: &DigitizerSettings,
) -> DaemonResponse {
    let renderer = options.renderer(defaults);
    match session.export_overlay(&renderer, Path::new(path), options.title.as_deref()) {
        Ok(path) => DaemonResponse::Exported {
            path: path.to_string_lossy().to_string(),
        },
        Err(err) => DaemonResponse::Error {
            message: err.to_string(),
        },
    }
}
