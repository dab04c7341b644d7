use digitizer_core::validation::Validator;
use digitizer_core::{DigitizerSettings, ExportFormat, SeriesEntry};
use digitizer_plot::PlottersRenderer;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOCKET_PATH: &str = "/tmp/digitizer-daemon.sock";
pub const DEFAULT_DATA_DIR: &str = ".digitizer";
pub const DEFAULT_SESSION: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointSummary {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub pixel: Option<(f64, f64)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesState {
    pub name: String,
    pub x_label: String,
    pub y_label: String,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub color: String,
    pub marker: String,
    pub image: Option<String>,
    pub image_size: Option<(u32, u32)>,
    pub points: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabSummary {
    pub index: usize,
    pub name: String,
    pub points: usize,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub index: usize,
    pub name: String,
    pub points: usize,
    pub x_label: String,
    pub y_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadFailure {
    pub path: String,
    pub message: String,
}

/// Options for a rendered export. Missing sizes fall back to the settings
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlotOptions {
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
}

impl PlotOptions {
    /// Sizes not given here come from `defaults`; both are clamped to the
    /// supported range.
    pub fn renderer(&self, defaults: &DigitizerSettings) -> PlottersRenderer {
        let mut width = self.width.unwrap_or(defaults.export_width);
        let mut height = self.height.unwrap_or(defaults.export_height);
        Validator::normalize_export_size(&mut width, &mut height);
        PlottersRenderer::new(self.format, width, height)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DaemonRequest {
    ImageLoad {
        session: String,
        path: String,
    },
    PointAdd {
        session: String,
        x: f64,
        y: f64,
    },
    PointUndo {
        session: String,
    },
    PointsClear {
        session: String,
    },
    PointsList {
        session: String,
    },
    SeriesShow {
        session: String,
    },
    SeriesSettings {
        session: String,
        json: String,
    },
    SeriesStyle {
        session: String,
        color: Option<String>,
        marker: Option<String>,
    },
    SeriesRename {
        session: String,
        name: String,
    },
    TabNew {
        session: String,
        name: Option<String>,
    },
    TabSelect {
        session: String,
        index: usize,
    },
    TabClose {
        session: String,
        index: usize,
    },
    TabList {
        session: String,
    },
    /// Without a path the series is saved to the library under its name.
    ExportJson {
        session: String,
        #[serde(default)]
        path: Option<String>,
    },
    ExportPlot {
        session: String,
        path: String,
        options: PlotOptions,
    },
    CollectionLoad {
        session: String,
        paths: Vec<String>,
    },
    CollectionList {
        session: String,
    },
    CollectionRename {
        session: String,
        index: usize,
        name: String,
    },
    CollectionRemove {
        session: String,
        index: usize,
    },
    CollectionClear {
        session: String,
    },
    CollectionCombine {
        session: String,
    },
    CollectionExport {
        session: String,
        path: String,
        options: PlotOptions,
    },
    LibraryList,
    SessionList,
    SessionClose {
        session: String,
    },
    SettingsShow,
    SettingsSet {
        json: String,
    },
    SettingsReset,
    DaemonStop,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DaemonResponse {
    Ok {
        message: String,
    },
    Error {
        message: String,
    },
    ImageLoaded {
        width: u32,
        height: u32,
    },
    PointAdded {
        point: Option<PointSummary>,
    },
    Points {
        series: String,
        points: Vec<PointSummary>,
    },
    Series {
        state: SeriesState,
    },
    TabList {
        tabs: Vec<TabSummary>,
    },
    CollectionList {
        entries: Vec<CollectionEntry>,
    },
    CollectionLoaded {
        loaded: Vec<String>,
        failed: Vec<LoadFailure>,
    },
    Exported {
        path: String,
    },
    Library {
        entries: Vec<SeriesEntry>,
    },
    SessionList {
        sessions: Vec<String>,
    },
    Settings {
        settings: DigitizerSettings,
    },
}
