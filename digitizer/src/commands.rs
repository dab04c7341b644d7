use clap::{Args, Parser, Subcommand};
use digitizer_cli::protocol::{DEFAULT_DATA_DIR, DEFAULT_SESSION, DEFAULT_SOCKET_PATH};
use digitizer_core::ExportFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "digitizer", version, about = "Graph digitizer CLI")]
pub struct Cli {
    /// Daemon socket path
    #[arg(long, global = true, default_value = DEFAULT_SOCKET_PATH)]
    pub socket: String,
    /// Directory holding settings files
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,
    /// Session id used for session commands
    #[arg(long, global = true, default_value = DEFAULT_SESSION)]
    pub session: String,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Daemon {
        #[command(subcommand)]
        command: DaemonCommands,
    },
    /// Reference image of the active tab
    Image {
        #[command(subcommand)]
        command: ImageCommands,
    },
    Point {
        #[command(subcommand)]
        command: PointCommands,
    },
    /// Labels and axis bounds of the active tab
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Line color and marker of the active tab
    Style {
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        marker: Option<String>,
    },
    Tab {
        #[command(subcommand)]
        command: TabCommands,
    },
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    Collection {
        #[command(subcommand)]
        command: CollectionCommands,
    },
    /// Persisted defaults for new tabs and exports
    Defaults {
        #[command(subcommand)]
        command: DefaultsCommands,
    },
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Series saved under the data directory
    Library {
        #[command(subcommand)]
        command: LibraryCommands,
    },
    /// Merge saved series files into one (no daemon needed)
    Combine {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(long, short)]
        output: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
    /// Plot saved series files on one canvas (no daemon needed)
    Render {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(long, short)]
        output: PathBuf,
        #[command(flatten)]
        plot: PlotArgs,
    },
}

#[derive(Subcommand)]
pub enum DaemonCommands {
    Run,
    Stop,
}

#[derive(Subcommand)]
pub enum ImageCommands {
    Load { path: PathBuf },
}

#[derive(Subcommand)]
pub enum PointCommands {
    /// Add a point at pixel coordinates
    Add {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    Undo,
    Clear,
    List {
        #[arg(long, alias = "jq")]
        json_query: bool,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    Show,
    /// Apply a JSON patch, e.g. '{"x_min":0,"x_max":10}'
    Set { json: String },
}

#[derive(Subcommand)]
pub enum TabCommands {
    New {
        #[arg(long)]
        name: Option<String>,
    },
    Select { index: usize },
    Close { index: usize },
    Rename { name: String },
    List,
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Save as JSON; without a path the series goes to the library
    Json { path: Option<PathBuf> },
    Plot {
        path: PathBuf,
        #[command(flatten)]
        plot: PlotArgs,
    },
}

#[derive(Subcommand)]
pub enum CollectionCommands {
    Load {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    List,
    Rename { index: usize, name: String },
    Remove { index: usize },
    Clear,
    /// Open the merged points as a new tab
    Combine,
    /// Plot every collected series on one canvas
    Export {
        path: PathBuf,
        #[command(flatten)]
        plot: PlotArgs,
    },
}

#[derive(Subcommand)]
pub enum DefaultsCommands {
    Show,
    Set { json: String },
    Reset,
}

#[derive(Subcommand)]
pub enum LibraryCommands {
    List,
}

#[derive(Subcommand)]
pub enum SessionCommands {
    List,
    Close,
}

#[derive(Args, Clone)]
pub struct PlotArgs {
    /// svg or png; taken from the output extension when omitted
    #[arg(long)]
    pub format: Option<ExportFormat>,
    #[arg(long)]
    pub width: Option<u32>,
    #[arg(long)]
    pub height: Option<u32>,
    #[arg(long)]
    pub title: Option<String>,
}
