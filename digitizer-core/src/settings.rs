use crate::validation::Validator;
use serde::{Deserialize, Serialize};
use series::graph::{DEFAULT_X_LABEL, DEFAULT_Y_LABEL};
use series::{AxisCalibration, DigitizerError, FontSpec, GraphSeries, MarkerStyle, Rgb};
use std::path::{Path, PathBuf};

pub const DEFAULT_EXPORT_WIDTH: u32 = 800;
pub const DEFAULT_EXPORT_HEIGHT: u32 = 600;

/// User defaults applied to every new series tab and to exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitizerSettings {
    pub x_label: String,
    pub y_label: String,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub line_color: Rgb,
    pub marker_style: MarkerStyle,
    pub axis_font: FontSpec,
    pub title_font: FontSpec,
    pub export_width: u32,
    pub export_height: u32,
}

impl Default for DigitizerSettings {
    fn default() -> Self {
        let calibration = AxisCalibration::default();
        Self {
            x_label: DEFAULT_X_LABEL.to_string(),
            y_label: DEFAULT_Y_LABEL.to_string(),
            x_min: calibration.x_min(),
            x_max: calibration.x_max(),
            y_min: calibration.y_min(),
            y_max: calibration.y_max(),
            line_color: Rgb::default(),
            marker_style: MarkerStyle::default(),
            axis_font: FontSpec::axis_default(),
            title_font: FontSpec::title_default(),
            export_width: DEFAULT_EXPORT_WIDTH,
            export_height: DEFAULT_EXPORT_HEIGHT,
        }
    }
}

impl DigitizerSettings {
    pub fn calibration(&self) -> Result<AxisCalibration, DigitizerError> {
        AxisCalibration::new(self.x_min, self.x_max, self.y_min, self.y_max)
    }

    pub fn new_series(&self, name: &str) -> GraphSeries {
        let mut series = GraphSeries::new(name);
        series.set_labels(&self.x_label, &self.y_label);
        series.set_calibration(self.calibration().unwrap_or_default());
        series.set_color(self.line_color);
        series.set_marker(self.marker_style);
        series.set_fonts(Some(self.axis_font.clone()), Some(self.title_font.clone()));
        series
    }
}

/// Partial update of labels, bounds and style. Absent fields are left alone;
/// unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsPatch {
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    #[serde(alias = "color")]
    pub line_color: Option<Rgb>,
    #[serde(alias = "marker")]
    pub marker_style: Option<MarkerStyle>,
    pub axis_font: Option<FontSpec>,
    pub title_font: Option<FontSpec>,
    pub export_width: Option<u32>,
    pub export_height: Option<u32>,
}

impl SettingsPatch {
    pub fn from_json(json: &str) -> Result<Self, DigitizerError> {
        Ok(serde_json::from_str(json)?)
    }

    fn calibration_over(&self, base: AxisCalibration) -> Result<AxisCalibration, DigitizerError> {
        AxisCalibration::new(
            self.x_min.unwrap_or(base.x_min()),
            self.x_max.unwrap_or(base.x_max()),
            self.y_min.unwrap_or(base.y_min()),
            self.y_max.unwrap_or(base.y_max()),
        )
    }

    /// Export sizes are settings-only and ignored here. Points already in the
    /// series keep the values computed under the old calibration.
    pub fn apply_to_series(&self, series: &mut GraphSeries) -> Result<(), DigitizerError> {
        let calibration = self.calibration_over(series.calibration)?;
        series.set_calibration(calibration);
        if let Some(label) = &self.x_label {
            series.x_label = label.clone();
        }
        if let Some(label) = &self.y_label {
            series.y_label = label.clone();
        }
        if let Some(color) = self.line_color {
            series.set_color(color);
        }
        if let Some(marker) = self.marker_style {
            series.set_marker(marker);
        }
        series.set_fonts(self.axis_font.clone(), self.title_font.clone());
        Ok(())
    }

    pub fn apply_to_settings(&self, settings: &mut DigitizerSettings) -> Result<(), DigitizerError> {
        let base = settings.calibration().unwrap_or_default();
        let calibration = self.calibration_over(base)?;
        settings.x_min = calibration.x_min();
        settings.x_max = calibration.x_max();
        settings.y_min = calibration.y_min();
        settings.y_max = calibration.y_max();
        if let Some(label) = &self.x_label {
            settings.x_label = label.clone();
        }
        if let Some(label) = &self.y_label {
            settings.y_label = label.clone();
        }
        if let Some(color) = self.line_color {
            settings.line_color = color;
        }
        if let Some(marker) = self.marker_style {
            settings.marker_style = marker;
        }
        if let Some(font) = &self.axis_font {
            settings.axis_font = font.clone();
        }
        if let Some(font) = &self.title_font {
            settings.title_font = font.clone();
        }
        if let Some(width) = self.export_width {
            settings.export_width = width;
        }
        if let Some(height) = self.export_height {
            settings.export_height = height;
        }
        Ok(())
    }
}

pub fn normalize_settings(mut settings: DigitizerSettings) -> DigitizerSettings {
    if let Err(err) = settings.calibration() {
        log::warn!("resetting axis bounds in settings: {err}");
        let builtin = DigitizerSettings::default();
        settings.x_min = builtin.x_min;
        settings.x_max = builtin.x_max;
        settings.y_min = builtin.y_min;
        settings.y_max = builtin.y_max;
    }
    Validator::normalize_export_size(&mut settings.export_width, &mut settings.export_height);
    settings
}

pub fn load_settings_file(path: &Path) -> Result<DigitizerSettings, String> {
    let data = std::fs::read(path)
        .map_err(|e| format!("Failed to read settings file '{}': {e}", path.display()))?;
    let settings: DigitizerSettings = serde_json::from_slice(&data)
        .map_err(|e| format!("Failed to parse settings file '{}': {e}", path.display()))?;
    Ok(normalize_settings(settings))
}

pub fn save_settings_file(path: &Path, settings: &DigitizerSettings) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let data = serde_json::to_vec_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {e}"))?;
    std::fs::write(path, data)
        .map_err(|e| format!("Failed to write settings file '{}': {e}", path.display()))
}

/// Persistent defaults kept in the data directory: a user-editable defaults
/// file and a factory file that a reset copies back.
pub struct SettingsManager {
    data_dir: PathBuf,
    defaults: DigitizerSettings,
    factory: DigitizerSettings,
    defaults_path: PathBuf,
}

impl SettingsManager {
    const DEFAULTS_FILE: &'static str = "digitizer_settings.defaults.json";
    const FACTORY_FILE: &'static str = "digitizer_settings.factory.json";
    const SERIES_DIR: &'static str = "series";

    fn load_or_create(data_dir: &Path) -> (DigitizerSettings, DigitizerSettings, PathBuf) {
        let defaults_path = data_dir.join(Self::DEFAULTS_FILE);
        let factory_path = data_dir.join(Self::FACTORY_FILE);
        let builtin = DigitizerSettings::default();

        let factory = match load_settings_file(&factory_path) {
            Ok(settings) => settings,
            Err(err) => {
                if factory_path.exists() {
                    log::warn!("{err}; rewriting with built-in settings");
                }
                if let Err(err) = save_settings_file(&factory_path, &builtin) {
                    log::warn!("{err}");
                }
                builtin
            }
        };

        let defaults = match load_settings_file(&defaults_path) {
            Ok(settings) => settings,
            Err(err) => {
                if defaults_path.exists() {
                    log::warn!("{err}; rewriting with factory settings");
                }
                if let Err(err) = save_settings_file(&defaults_path, &factory) {
                    log::warn!("{err}");
                }
                factory.clone()
            }
        };

        (defaults, factory, defaults_path)
    }

    pub fn new(data_dir: PathBuf) -> Self {
        let (defaults, factory, defaults_path) = Self::load_or_create(&data_dir);
        Self {
            data_dir,
            defaults,
            factory,
            defaults_path,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn series_dir(&self) -> PathBuf {
        self.data_dir.join(Self::SERIES_DIR)
    }

    pub fn defaults(&self) -> &DigitizerSettings {
        &self.defaults
    }

    pub fn factory(&self) -> &DigitizerSettings {
        &self.factory
    }

    pub fn apply_settings_json(&mut self, json: &str) -> Result<(), String> {
        let patch = SettingsPatch::from_json(json).map_err(|e| format!("Invalid settings: {e}"))?;
        let mut settings = self.defaults.clone();
        patch
            .apply_to_settings(&mut settings)
            .map_err(|e| e.to_string())?;
        self.update_defaults(settings)
    }

    pub fn update_defaults(&mut self, settings: DigitizerSettings) -> Result<(), String> {
        let settings = normalize_settings(settings);
        save_settings_file(&self.defaults_path, &settings)?;
        self.defaults = settings;
        Ok(())
    }

    pub fn reset_to_factory(&mut self) -> Result<(), String> {
        let factory = self.factory.clone();
        self.update_defaults(factory)
    }

    pub fn new_series(&self, name: &str) -> GraphSeries {
        self.defaults.new_series(name)
    }
}
