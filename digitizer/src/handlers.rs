use crate::commands::*;
use crate::output::*;
use digitizer_cli::protocol::{DaemonRequest, DaemonResponse, PlotOptions};
use digitizer_cli::{client, daemon, offline};
use digitizer_core::{ExportFormat, SettingsManager};
use std::path::{Path, PathBuf};

struct Target {
    socket: String,
    session: String,
}

impl Target {
    fn send(&self, request: DaemonRequest) {
        log::debug!("Sending {request:?} to {}", self.socket);
        match client::send_request_to(&self.socket, &request) {
            Ok(response) => handle_daemon_response(response),
            Err(err) => print_error(&err),
        }
    }

    fn send_with(&self, request: DaemonRequest, json_query: bool) {
        match client::send_request_to(&self.socket, &request) {
            Ok(DaemonResponse::Points { series, points }) => {
                print_points(&series, &points, json_query)
            }
            Ok(response) => handle_daemon_response(response),
            Err(err) => print_error(&err),
        }
    }
}

pub fn handle_command(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let target = Target {
        socket: cli.socket,
        session: cli.session,
    };
    match cli.command {
        Commands::Daemon { command } => handle_daemon_command(command, &target, &cli.data_dir),
        Commands::Image { command } => handle_image_command(command, &target),
        Commands::Point { command } => handle_point_command(command, &target),
        Commands::Settings { command } => handle_settings_command(command, &target),
        Commands::Style { color, marker } => {
            if color.is_none() && marker.is_none() {
                print_error("Pass --color and/or --marker");
            } else {
                target.send(DaemonRequest::SeriesStyle {
                    session: target.session.clone(),
                    color,
                    marker,
                });
            }
        }
        Commands::Tab { command } => handle_tab_command(command, &target),
        Commands::Export { command } => handle_export_command(command, &target),
        Commands::Collection { command } => handle_collection_command(command, &target),
        Commands::Defaults { command } => handle_defaults_command(command, &target),
        Commands::Session { command } => handle_session_command(command, &target),
        Commands::Library {
            command: LibraryCommands::List,
        } => target.send(DaemonRequest::LibraryList),
        Commands::Combine {
            inputs,
            output,
            name,
        } => match offline::combine_files(&inputs, &output, name.as_deref()) {
            Ok(outcome) => print_offline_outcome(&outcome),
            Err(err) => print_error(&err),
        },
        Commands::Render {
            inputs,
            output,
            plot,
        } => {
            let settings = SettingsManager::new(cli.data_dir);
            let options = plot_options(plot, &output);
            match offline::render_files(&inputs, &output, &options, settings.defaults()) {
                Ok(outcome) => print_offline_outcome(&outcome),
                Err(err) => print_error(&err),
            }
        }
    }
    Ok(())
}

fn handle_daemon_command(command: DaemonCommands, target: &Target, data_dir: &Path) {
    match command {
        DaemonCommands::Run => {
            print_info(&format!("Daemon listening on {}", target.socket));
            if let Err(err) = daemon::run_daemon_at(&target.socket, data_dir) {
                print_error(&err);
            }
        }
        DaemonCommands::Stop => target.send(DaemonRequest::DaemonStop),
    }
}

fn handle_image_command(command: ImageCommands, target: &Target) {
    match command {
        ImageCommands::Load { path } => {
            let path = match absolute_path(&path) {
                Ok(path) => path,
                Err(err) => {
                    print_error(&err);
                    return;
                }
            };
            target.send(DaemonRequest::ImageLoad {
                session: target.session.clone(),
                path,
            });
        }
    }
}

fn handle_point_command(command: PointCommands, target: &Target) {
    let session = target.session.clone();
    match command {
        PointCommands::Add { x, y } => target.send(DaemonRequest::PointAdd { session, x, y }),
        PointCommands::Undo => target.send(DaemonRequest::PointUndo { session }),
        PointCommands::Clear => target.send(DaemonRequest::PointsClear { session }),
        PointCommands::List { json_query } => {
            target.send_with(DaemonRequest::PointsList { session }, json_query)
        }
    }
}

fn handle_settings_command(command: SettingsCommands, target: &Target) {
    let session = target.session.clone();
    match command {
        SettingsCommands::Show => target.send(DaemonRequest::SeriesShow { session }),
        SettingsCommands::Set { json } => {
            target.send(DaemonRequest::SeriesSettings { session, json })
        }
    }
}

fn handle_tab_command(command: TabCommands, target: &Target) {
    let session = target.session.clone();
    let request = match command {
        TabCommands::New { name } => DaemonRequest::TabNew { session, name },
        TabCommands::Select { index } => DaemonRequest::TabSelect { session, index },
        TabCommands::Close { index } => DaemonRequest::TabClose { session, index },
        TabCommands::Rename { name } => DaemonRequest::SeriesRename { session, name },
        TabCommands::List => DaemonRequest::TabList { session },
    };
    target.send(request);
}

fn handle_export_command(command: ExportCommands, target: &Target) {
    let session = target.session.clone();
    let request = match command {
        ExportCommands::Json { path: None } => DaemonRequest::ExportJson {
            session,
            path: None,
        },
        ExportCommands::Json { path: Some(path) } => match absolute_path(&path) {
            Ok(path) => DaemonRequest::ExportJson {
                session,
                path: Some(path),
            },
            Err(err) => return print_error(&err),
        },
        ExportCommands::Plot { path, plot } => {
            let options = plot_options(plot, &path);
            match absolute_path(&path) {
                Ok(path) => DaemonRequest::ExportPlot {
                    session,
                    path,
                    options,
                },
                Err(err) => return print_error(&err),
            }
        }
    };
    target.send(request);
}

fn handle_collection_command(command: CollectionCommands, target: &Target) {
    let session = target.session.clone();
    let request = match command {
        CollectionCommands::Load { paths } => {
            let resolved: Result<Vec<String>, String> =
                paths.iter().map(PathBuf::as_path).map(absolute_path).collect();
            match resolved {
                Ok(paths) => DaemonRequest::CollectionLoad { session, paths },
                Err(err) => return print_error(&err),
            }
        }
        CollectionCommands::List => DaemonRequest::CollectionList { session },
        CollectionCommands::Rename { index, name } => DaemonRequest::CollectionRename {
            session,
            index,
            name,
        },
        CollectionCommands::Remove { index } => DaemonRequest::CollectionRemove { session, index },
        CollectionCommands::Clear => DaemonRequest::CollectionClear { session },
        CollectionCommands::Combine => DaemonRequest::CollectionCombine { session },
        CollectionCommands::Export { path, plot } => {
            let options = plot_options(plot, &path);
            match absolute_path(&path) {
                Ok(path) => DaemonRequest::CollectionExport {
                    session,
                    path,
                    options,
                },
                Err(err) => return print_error(&err),
            }
        }
    };
    target.send(request);
}

fn handle_defaults_command(command: DefaultsCommands, target: &Target) {
    let request = match command {
        DefaultsCommands::Show => DaemonRequest::SettingsShow,
        DefaultsCommands::Set { json } => DaemonRequest::SettingsSet { json },
        DefaultsCommands::Reset => DaemonRequest::SettingsReset,
    };
    target.send(request);
}

fn handle_session_command(command: SessionCommands, target: &Target) {
    let request = match command {
        SessionCommands::List => DaemonRequest::SessionList,
        SessionCommands::Close => DaemonRequest::SessionClose {
            session: target.session.clone(),
        },
    };
    target.send(request);
}

fn handle_daemon_response(response: DaemonResponse) {
    match response {
        DaemonResponse::Ok { message } => print_info(&message),
        DaemonResponse::Error { message } => print_error(&message),
        DaemonResponse::ImageLoaded { width, height } => {
            print_info(&format!("Image loaded ({width}x{height})"))
        }
        DaemonResponse::PointAdded { point: Some(point) } => print_info(&point.label),
        DaemonResponse::PointAdded { point: None } => {
            print_info("Click outside the image ignored")
        }
        DaemonResponse::Points { series, points } => print_points(&series, &points, false),
        DaemonResponse::Series { state } => print_series_state(&state),
        DaemonResponse::TabList { tabs } => print_tabs(&tabs),
        DaemonResponse::CollectionList { entries } => print_collection(&entries),
        DaemonResponse::CollectionLoaded { loaded, failed } => print_load_report(&loaded, &failed),
        DaemonResponse::Exported { path } => print_info(&format!("Exported to {path}")),
        DaemonResponse::Library { entries } => print_library(&entries),
        DaemonResponse::SessionList { sessions } => {
            if sessions.is_empty() {
                print_info("No open sessions");
            } else {
                print_info("Open sessions:");
                for session in sessions {
                    println!("{session}");
                }
            }
        }
        DaemonResponse::Settings { settings } => print_settings(&settings),
    }
}

fn plot_options(plot: PlotArgs, output: &Path) -> PlotOptions {
    let format = plot.format.unwrap_or_else(|| format_from_extension(output));
    PlotOptions {
        format,
        width: plot.width,
        height: plot.height,
        title: plot.title,
    }
}

fn format_from_extension(path: &Path) -> ExportFormat {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
        .unwrap_or_default()
}

/// The daemon may run in another working directory, so paths are resolved
/// before they are sent.
fn absolute_path(path: &Path) -> Result<String, String> {
    let resolved: PathBuf = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| format!("Failed to resolve '{}': {e}", path.display()))?
            .join(path)
    };
    Ok(resolved.to_string_lossy().to_string())
}
