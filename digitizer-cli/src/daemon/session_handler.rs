use crate::protocol::{DaemonResponse, PlotOptions, PointSummary, SeriesState, TabSummary};
use digitizer_core::{series_file_path_for, DigitizerSession, DigitizerSettings, GraphSeries};
use series::{MarkerStyle, Rgb};
use std::path::{Path, PathBuf};

fn error(err: impl std::fmt::Display) -> DaemonResponse {
    DaemonResponse::Error {
        message: err.to_string(),
    }
}

fn ok(message: impl Into<String>) -> DaemonResponse {
    DaemonResponse::Ok {
        message: message.into(),
    }
}

fn point_summaries(series: &GraphSeries) -> Vec<PointSummary> {
    let pixels = series.marker_pixels();
    series
        .points()
        .iter()
        .zip(series.point_labels())
        .enumerate()
        .map(|(index, (point, label))| PointSummary {
            index,
            x: point.x,
            y: point.y,
            label,
            pixel: pixels.get(index).copied(),
        })
        .collect()
}

fn series_state(series: &GraphSeries) -> SeriesState {
    let calibration = series.calibration;
    SeriesState {
        name: series.name.clone(),
        x_label: series.x_label.clone(),
        y_label: series.y_label.clone(),
        x_min: calibration.x_min(),
        x_max: calibration.x_max(),
        y_min: calibration.y_min(),
        y_max: calibration.y_max(),
        color: series.color.to_string(),
        marker: series.marker.token().to_string(),
        image: series.image().map(|image| image.path.clone()),
        image_size: series
            .extent()
            .map(|extent| (extent.width(), extent.height())),
        points: series.len(),
    }
}

pub fn image_load(session: &mut DigitizerSession, path: &str) -> DaemonResponse {
    match session.load_image(Path::new(path)) {
        Ok((width, height)) => DaemonResponse::ImageLoaded { width, height },
        Err(err) => error(err),
    }
}

pub fn point_add(session: &mut DigitizerSession, x: f64, y: f64) -> DaemonResponse {
    match session.click(x, y) {
        Ok(Some(_)) => {
            let series = session.active();
            let point = point_summaries(series).pop();
            DaemonResponse::PointAdded { point }
        }
        Ok(None) => DaemonResponse::PointAdded { point: None },
        Err(err) => error(err),
    }
}

pub fn point_undo(session: &mut DigitizerSession) -> DaemonResponse {
    match session.undo() {
        Some(point) => ok(format!("Removed point ({:.2}, {:.2})", point.x, point.y)),
        None => error("No points to undo"),
    }
}

pub fn points_clear(session: &mut DigitizerSession) -> DaemonResponse {
    session.clear_points();
    ok("Points cleared")
}

pub fn points_list(session: &mut DigitizerSession) -> DaemonResponse {
    let series = session.active();
    DaemonResponse::Points {
        series: series.name.clone(),
        points: point_summaries(series),
    }
}

pub fn series_show(session: &mut DigitizerSession) -> DaemonResponse {
    DaemonResponse::Series {
        state: series_state(session.active()),
    }
}

pub fn series_settings(session: &mut DigitizerSession, json: &str) -> DaemonResponse {
    match session.apply_series_settings_json(json) {
        Ok(()) => series_show(session),
        Err(err) => error(err),
    }
}

pub fn series_style(
    session: &mut DigitizerSession,
    color: Option<&str>,
    marker: Option<&str>,
) -> DaemonResponse {
    let color = match color.map(str::parse::<Rgb>).transpose() {
        Ok(color) => color,
        Err(err) => return error(err),
    };
    let marker = match marker.map(str::parse::<MarkerStyle>).transpose() {
        Ok(marker) => marker,
        Err(err) => return error(err),
    };
    let series = session.active_mut();
    if let Some(color) = color {
        series.set_color(color);
    }
    if let Some(marker) = marker {
        series.set_marker(marker);
    }
    series_show(session)
}

pub fn series_rename(session: &mut DigitizerSession, name: &str) -> DaemonResponse {
    let name = name.trim();
    if name.is_empty() {
        return error("Series name cannot be empty");
    }
    session.active_mut().rename(name);
    ok(format!("Series renamed to '{name}'"))
}

pub fn tab_new(session: &mut DigitizerSession, name: Option<&str>) -> DaemonResponse {
    let index = session.new_tab(name);
    ok(format!("Opened tab {index} '{}'", session.active().name))
}

pub fn tab_select(session: &mut DigitizerSession, index: usize) -> DaemonResponse {
    match session.select_tab(index) {
        Ok(()) => ok(format!("Selected tab {index} '{}'", session.active().name)),
        Err(err) => error(err),
    }
}

pub fn tab_close(session: &mut DigitizerSession, index: usize) -> DaemonResponse {
    match session.close_tab(index) {
        Ok(closed) => ok(format!("Closed tab '{}'", closed.name)),
        Err(err) => error(err),
    }
}

pub fn tab_list(session: &mut DigitizerSession) -> DaemonResponse {
    let active = session.active_index();
    let tabs = session
        .tabs()
        .iter()
        .enumerate()
        .map(|(index, series)| TabSummary {
            index,
            name: series.name.clone(),
            points: series.len(),
            active: index == active,
        })
        .collect();
    DaemonResponse::TabList { tabs }
}

pub fn export_json(
    session: &mut DigitizerSession,
    path: Option<&str>,
    series_dir: &Path,
) -> DaemonResponse {
    let path = match path {
        Some(path) => PathBuf::from(path),
        None => {
            if let Err(err) = std::fs::create_dir_all(series_dir) {
                return error(format!("Failed to create '{}': {err}", series_dir.display()));
            }
            series_file_path_for(series_dir, &session.active().name)
        }
    };
    match session.export_json(&path) {
        Ok(path) => DaemonResponse::Exported {
            path: path.to_string_lossy().to_string(),
        },
        Err(err) => error(err),
    }
}

pub fn export_plot(
    session: &mut DigitizerSession,
    path: &str,
    options: &PlotOptions,
    defaults: &DigitizerSettings,
) -> DaemonResponse {
    let renderer = options.renderer(defaults);
    match session.export_plot(&renderer, Path::new(path), options.title.as_deref()) {
        Ok(path) => DaemonResponse::Exported {
            path: path.to_string_lossy().to_string(),
        },
        Err(err) => error(err),
    }
}
