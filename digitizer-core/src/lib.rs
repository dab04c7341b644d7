pub mod collection;
pub mod image_source;
pub mod io;
pub mod plot_view;
pub mod session;
pub mod settings;
pub mod validation;

pub use collection::{combine, render_overlay, LoadReport, SeriesCollection};
pub use image_source::{is_allowed_image, probe_image, ALLOWED_IMAGE_EXTENSIONS};
pub use io::{ensure_extension, scan_series_entries, series_file_path_for, SeriesEntry};
pub use plot_view::{ExportFormat, LegendPosition, PlotDocument, PlotLine, PlotRenderer};
pub use session::{DigitizerSession, SessionStore};
pub use settings::{DigitizerSettings, SettingsManager, SettingsPatch};
pub use series::{DigitizerError, GraphSeries, Point};
