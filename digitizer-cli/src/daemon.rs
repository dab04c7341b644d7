mod collection_handler;
mod session_handler;
mod settings_handler;

use crate::protocol::{DaemonRequest, DaemonResponse, DEFAULT_DATA_DIR, DEFAULT_SOCKET_PATH};
use digitizer_core::{scan_series_entries, SessionStore, SettingsManager};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;

pub(crate) struct DaemonState {
    pub(crate) settings: SettingsManager,
    pub(crate) sessions: SessionStore,
}

impl DaemonState {
    fn new(data_dir: &Path) -> Self {
        let settings = SettingsManager::new(data_dir.to_path_buf());
        let sessions = SessionStore::new(settings.defaults().clone());
        Self { settings, sessions }
    }
}

pub fn run_daemon() -> Result<(), String> {
    run_daemon_at(DEFAULT_SOCKET_PATH, Path::new(DEFAULT_DATA_DIR))
}

/// Serves requests on `socket_path` until a `DaemonStop` request arrives.
pub fn run_daemon_at(socket_path: &str, data_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| format!("Failed to create data dir '{}': {e}", data_dir.display()))?;
    let mut state = DaemonState::new(data_dir);

    if Path::new(socket_path).exists() {
        let _ = std::fs::remove_file(socket_path);
    }
    let listener = UnixListener::bind(socket_path)
        .map_err(|e| format!("Failed to bind daemon socket: {e}"))?;
    log::info!("daemon listening on {socket_path}");

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => match handle_client(stream, &mut state) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => log::warn!("daemon client error: {err}"),
            },
            Err(err) => log::warn!("daemon accept error: {err}"),
        }
    }

    let _ = std::fs::remove_file(socket_path);
    log::info!("daemon stopped");
    Ok(())
}

/// Answers one request. Returns `Ok(false)` once the daemon should stop.
fn handle_client(stream: UnixStream, state: &mut DaemonState) -> Result<bool, String> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).map_err(|e| e.to_string())?;
    let mut stream = reader.into_inner();

    let request: DaemonRequest = match serde_json::from_str(line.trim()) {
        Ok(request) => request,
        Err(err) => {
            let response = DaemonResponse::Error {
                message: format!("Invalid request: {err}"),
            };
            send_response(&mut stream, &response)?;
            return Ok(true);
        }
    };
    log::debug!("request: {request:?}");

    if matches!(request, DaemonRequest::DaemonStop) {
        let response = DaemonResponse::Ok {
            message: "Daemon stopping".to_string(),
        };
        send_response(&mut stream, &response)?;
        return Ok(false);
    }

    let response = dispatch(request, state);
    send_response(&mut stream, &response)?;
    Ok(true)
}

fn dispatch(request: DaemonRequest, state: &mut DaemonState) -> DaemonResponse {
    match request {
        DaemonRequest::ImageLoad { session, path } => {
            session_handler::image_load(state.sessions.session_mut(&session), &path)
        }
        DaemonRequest::PointAdd { session, x, y } => {
            session_handler::point_add(state.sessions.session_mut(&session), x, y)
        }
        DaemonRequest::PointUndo { session } => {
            session_handler::point_undo(state.sessions.session_mut(&session))
        }
        DaemonRequest::PointsClear { session } => {
            session_handler::points_clear(state.sessions.session_mut(&session))
        }
        DaemonRequest::PointsList { session } => {
            session_handler::points_list(state.sessions.session_mut(&session))
        }
        DaemonRequest::SeriesShow { session } => {
            session_handler::series_show(state.sessions.session_mut(&session))
        }
        DaemonRequest::SeriesSettings { session, json } => {
            session_handler::series_settings(state.sessions.session_mut(&session), &json)
        }
        DaemonRequest::SeriesStyle {
            session,
            color,
            marker,
        } => session_handler::series_style(
            state.sessions.session_mut(&session),
            color.as_deref(),
            marker.as_deref(),
        ),
        DaemonRequest::SeriesRename { session, name } => {
            session_handler::series_rename(state.sessions.session_mut(&session), &name)
        }
        DaemonRequest::TabNew { session, name } => {
            session_handler::tab_new(state.sessions.session_mut(&session), name.as_deref())
        }
        DaemonRequest::TabSelect { session, index } => {
            session_handler::tab_select(state.sessions.session_mut(&session), index)
        }
        DaemonRequest::TabClose { session, index } => {
            session_handler::tab_close(state.sessions.session_mut(&session), index)
        }
        DaemonRequest::TabList { session } => {
            session_handler::tab_list(state.sessions.session_mut(&session))
        }
        DaemonRequest::ExportJson { session, path } => {
            let series_dir = state.settings.series_dir();
            session_handler::export_json(
                state.sessions.session_mut(&session),
                path.as_deref(),
                &series_dir,
            )
        }
        DaemonRequest::ExportPlot {
            session,
            path,
            options,
        } => {
            let defaults = state.settings.defaults().clone();
            session_handler::export_plot(
                state.sessions.session_mut(&session),
                &path,
                &options,
                &defaults,
            )
        }
        DaemonRequest::CollectionLoad { session, paths } => {
            collection_handler::collection_load(state.sessions.session_mut(&session), &paths)
        }
        DaemonRequest::CollectionList { session } => {
            collection_handler::collection_list(state.sessions.session_mut(&session))
        }
        DaemonRequest::CollectionRename {
            session,
            index,
            name,
        } => collection_handler::collection_rename(
            state.sessions.session_mut(&session),
            index,
            &name,
        ),
        DaemonRequest::CollectionRemove { session, index } => {
            collection_handler::collection_remove(state.sessions.session_mut(&session), index)
        }
        DaemonRequest::CollectionClear { session } => {
            collection_handler::collection_clear(state.sessions.session_mut(&session))
        }
        DaemonRequest::CollectionCombine { session } => {
            collection_handler::collection_combine(state.sessions.session_mut(&session))
        }
        DaemonRequest::CollectionExport {
            session,
            path,
            options,
        } => {
            let defaults = state.settings.defaults().clone();
            collection_handler::collection_export(
                state.sessions.session_mut(&session),
                &path,
                &options,
                &defaults,
            )
        }
        DaemonRequest::LibraryList => DaemonResponse::Library {
            entries: scan_series_entries(&state.settings.series_dir()),
        },
        DaemonRequest::SessionList => DaemonResponse::SessionList {
            sessions: state.sessions.ids(),
        },
        DaemonRequest::SessionClose { session } => {
            if state.sessions.close(&session) {
                DaemonResponse::Ok {
                    message: format!("Session '{session}' closed"),
                }
            } else {
                DaemonResponse::Error {
                    message: format!("Session '{session}' not found"),
                }
            }
        }
        DaemonRequest::SettingsShow => settings_handler::settings_show(&state.settings),
        DaemonRequest::SettingsSet { json } => settings_handler::settings_set(state, &json),
        DaemonRequest::SettingsReset => settings_handler::settings_reset(state),
        DaemonRequest::DaemonStop => DaemonResponse::Ok {
            message: "Daemon stopping".to_string(),
        },
    }
}

fn send_response(stream: &mut impl Write, response: &DaemonResponse) -> Result<(), String> {
    let payload = serde_json::to_string(response).map_err(|e| e.to_string())?;
    stream
        .write_all(format!("{payload}\n").as_bytes())
        .map_err(|e| e.to_string())?;
    Ok(())
}
