use digitizer_cli::client::send_request_to;
use digitizer_cli::daemon::run_daemon_at;
use digitizer_cli::protocol::{DaemonRequest, DaemonResponse};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use std::time::Duration;

struct TestDaemon {
    socket: String,
    handle: Option<JoinHandle<Result<(), String>>>,
}

impl TestDaemon {
    fn start(dir: &Path) -> Self {
        let socket = dir.join("daemon.sock").to_string_lossy().to_string();
        let data_dir = dir.join("data");
        let thread_socket = socket.clone();
        let handle = std::thread::spawn(move || run_daemon_at(&thread_socket, &data_dir));
        for _ in 0..100 {
            if Path::new(&socket).exists() {
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(Path::new(&socket).exists(), "daemon socket never appeared");
        Self {
            socket,
            handle: Some(handle),
        }
    }

    fn request(&self, request: DaemonRequest) -> DaemonResponse {
        send_request_to(&self.socket, &request).expect("daemon response")
    }

    fn stop(mut self) {
        let response = self.request(DaemonRequest::DaemonStop);
        assert!(matches!(response, DaemonResponse::Ok { .. }));
        if let Some(handle) = self.handle.take() {
            handle.join().expect("join daemon").expect("daemon result");
        }
        assert!(!Path::new(&self.socket).exists());
    }
}

fn write_png(dir: &Path, width: u32, height: u32) -> PathBuf {
    let path = dir.join("graph.png");
    image::RgbImage::new(width, height)
        .save(&path)
        .expect("write png");
    path
}

fn session(id: &str) -> String {
    id.to_string()
}

#[test]
fn digitizes_clicks_and_exports_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image = write_png(dir.path(), 200, 100);
    let daemon = TestDaemon::start(dir.path());

    let response = daemon.request(DaemonRequest::SeriesSettings {
        session: session("s1"),
        json: r#"{"x_min":0,"x_max":10,"y_min":0,"y_max":1}"#.to_string(),
    });
    assert!(matches!(response, DaemonResponse::Series { .. }));

    match daemon.request(DaemonRequest::ImageLoad {
        session: session("s1"),
        path: image.to_string_lossy().to_string(),
    }) {
        DaemonResponse::ImageLoaded { width, height } => assert_eq!((width, height), (200, 100)),
        other => panic!("unexpected response: {other:?}"),
    }

    match daemon.request(DaemonRequest::PointAdd {
        session: session("s1"),
        x: 100.0,
        y: 50.0,
    }) {
        DaemonResponse::PointAdded { point: Some(point) } => {
            assert_eq!((point.x, point.y), (5.0, 0.5));
            assert_eq!(point.label, "Point 1: (5.00, 0.50)");
            assert_eq!(point.pixel, Some((100.0, 50.0)));
        }
        other => panic!("unexpected response: {other:?}"),
    }

    let outside = daemon.request(DaemonRequest::PointAdd {
        session: session("s1"),
        x: 500.0,
        y: 50.0,
    });
    assert!(matches!(
        outside,
        DaemonResponse::PointAdded { point: None }
    ));

    let target = dir.path().join("trace");
    match daemon.request(DaemonRequest::ExportJson {
        session: session("s1"),
        path: Some(target.to_string_lossy().to_string()),
    }) {
        DaemonResponse::Exported { path } => {
            assert!(path.ends_with("trace.json"));
            let saved = series::load_series_file(&path).expect("saved series");
            assert_eq!(saved.len(), 1);
        }
        other => panic!("unexpected response: {other:?}"),
    }

    daemon.stop();
}

#[test]
fn sessions_do_not_share_points() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image = write_png(dir.path(), 100, 100);
    let daemon = TestDaemon::start(dir.path());

    for id in ["alice", "bob"] {
        daemon.request(DaemonRequest::ImageLoad {
            session: session(id),
            path: image.to_string_lossy().to_string(),
        });
    }
    daemon.request(DaemonRequest::PointAdd {
        session: session("alice"),
        x: 10.0,
        y: 10.0,
    });

    match daemon.request(DaemonRequest::PointsList {
        session: session("bob"),
    }) {
        DaemonResponse::Points { points, .. } => assert!(points.is_empty()),
        other => panic!("unexpected response: {other:?}"),
    }
    match daemon.request(DaemonRequest::PointsList {
        session: session("alice"),
    }) {
        DaemonResponse::Points { series, points } => {
            assert_eq!(series, "Graph 1");
            assert_eq!(points.len(), 1);
        }
        other => panic!("unexpected response: {other:?}"),
    }
    match daemon.request(DaemonRequest::SessionList) {
        DaemonResponse::SessionList { sessions } => assert_eq!(sessions, vec!["alice", "bob"]),
        other => panic!("unexpected response: {other:?}"),
    }

    daemon.stop();
}

#[test]
fn empty_export_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let daemon = TestDaemon::start(dir.path());

    let target = dir.path().join("nothing.json");
    let response = daemon.request(DaemonRequest::ExportJson {
        session: session("s1"),
        path: Some(target.to_string_lossy().to_string()),
    });
    match response {
        DaemonResponse::Error { message } => assert!(message.contains("no points")),
        other => panic!("unexpected response: {other:?}"),
    }
    assert!(!target.exists());

    daemon.stop();
}

#[test]
fn settings_survive_a_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let daemon = TestDaemon::start(dir.path());
    let response = daemon.request(DaemonRequest::SettingsSet {
        json: r#"{"x_label":"Latency (ms)","marker":"^"}"#.to_string(),
    });
    assert!(matches!(response, DaemonResponse::Settings { .. }));
    let rejected = daemon.request(DaemonRequest::SettingsSet {
        json: r#"{"x_min":3,"x_max":1}"#.to_string(),
    });
    assert!(matches!(rejected, DaemonResponse::Error { .. }));
    daemon.stop();

    let daemon = TestDaemon::start(dir.path());
    match daemon.request(DaemonRequest::SeriesShow {
        session: session("fresh"),
    }) {
        DaemonResponse::Series { state } => {
            assert_eq!(state.x_label, "Latency (ms)");
            assert_eq!(state.marker, "^");
            assert_eq!((state.x_min, state.x_max), (0.0, 12.5));
        }
        other => panic!("unexpected response: {other:?}"),
    }

    let reset = daemon.request(DaemonRequest::SettingsReset);
    assert!(matches!(reset, DaemonResponse::Ok { .. }));
    match daemon.request(DaemonRequest::SettingsShow) {
        DaemonResponse::Settings { settings } => assert_eq!(settings.x_label, "Error in meters"),
        other => panic!("unexpected response: {other:?}"),
    }
    daemon.stop();
}

#[test]
fn collection_loads_and_combines_into_a_tab() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image = write_png(dir.path(), 100, 100);
    let daemon = TestDaemon::start(dir.path());

    daemon.request(DaemonRequest::ImageLoad {
        session: session("s1"),
        path: image.to_string_lossy().to_string(),
    });
    for x in [10.0, 20.0] {
        daemon.request(DaemonRequest::PointAdd {
            session: session("s1"),
            x,
            y: 50.0,
        });
    }
    let saved = match daemon.request(DaemonRequest::ExportJson {
        session: session("s1"),
        path: Some(dir.path().join("first").to_string_lossy().to_string()),
    }) {
        DaemonResponse::Exported { path } => path,
        other => panic!("unexpected response: {other:?}"),
    };

    match daemon.request(DaemonRequest::CollectionLoad {
        session: session("s1"),
        paths: vec![
            saved.clone(),
            dir.path().join("missing.json").to_string_lossy().to_string(),
            saved,
        ],
    }) {
        DaemonResponse::CollectionLoaded { loaded, failed } => {
            assert_eq!(loaded, vec!["Graph 1", "Graph 1"]);
            assert_eq!(failed.len(), 1);
            assert!(failed[0].path.ends_with("missing.json"));
        }
        other => panic!("unexpected response: {other:?}"),
    }

    let renamed = daemon.request(DaemonRequest::CollectionRename {
        session: session("s1"),
        index: 5,
        name: "nope".to_string(),
    });
    assert!(matches!(renamed, DaemonResponse::Error { .. }));

    let combined = daemon.request(DaemonRequest::CollectionCombine {
        session: session("s1"),
    });
    assert!(matches!(combined, DaemonResponse::Ok { .. }));
    match daemon.request(DaemonRequest::TabList {
        session: session("s1"),
    }) {
        DaemonResponse::TabList { tabs } => {
            assert_eq!(tabs.len(), 2);
            assert_eq!(tabs[1].name, "Combined");
            assert_eq!(tabs[1].points, 4);
            assert!(tabs[1].active);
        }
        other => panic!("unexpected response: {other:?}"),
    }

    daemon.stop();
}

#[test]
fn malformed_request_gets_an_error_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let daemon = TestDaemon::start(dir.path());

    let mut stream = UnixStream::connect(&daemon.socket).expect("connect");
    stream.write_all(b"{\"type\":\"no_such_request\"}\n").expect("write");
    let mut line = String::new();
    BufReader::new(stream).read_line(&mut line).expect("read");
    let response: DaemonResponse = serde_json::from_str(line.trim()).expect("response json");
    assert!(matches!(response, DaemonResponse::Error { .. }));

    daemon.stop();
}

#[test]
fn export_without_path_saves_to_library() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image = write_png(dir.path(), 100, 100);
    let daemon = TestDaemon::start(dir.path());

    daemon.request(DaemonRequest::ImageLoad {
        session: session("s1"),
        path: image.to_string_lossy().to_string(),
    });
    daemon.request(DaemonRequest::SeriesRename {
        session: session("s1"),
        name: "Run A".to_string(),
    });
    daemon.request(DaemonRequest::PointAdd {
        session: session("s1"),
        x: 50.0,
        y: 50.0,
    });

    match daemon.request(DaemonRequest::ExportJson {
        session: session("s1"),
        path: None,
    }) {
        DaemonResponse::Exported { path } => {
            assert_eq!(Path::new(&path), dir.path().join("data/series/Run_A.json"))
        }
        other => panic!("unexpected response: {other:?}"),
    }

    match daemon.request(DaemonRequest::LibraryList) {
        DaemonResponse::Library { entries } => {
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].name, "Run A");
            assert_eq!(entries[0].points, 1);
        }
        other => panic!("unexpected response: {other:?}"),
    }

    daemon.stop();
}

#[test]
fn library_export_keeps_unsafe_names_inside_series_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image = write_png(dir.path(), 100, 100);
    let daemon = TestDaemon::start(dir.path());

    daemon.request(DaemonRequest::ImageLoad {
        session: session("s1"),
        path: image.to_string_lossy().to_string(),
    });
    daemon.request(DaemonRequest::SeriesRename {
        session: session("s1"),
        name: "../outside".to_string(),
    });
    daemon.request(DaemonRequest::PointAdd {
        session: session("s1"),
        x: 50.0,
        y: 50.0,
    });

    match daemon.request(DaemonRequest::ExportJson {
        session: session("s1"),
        path: None,
    }) {
        DaemonResponse::Exported { path } => {
            assert_eq!(
                Path::new(&path),
                dir.path().join("data/series/___outside.json")
            );
        }
        other => panic!("unexpected response: {other:?}"),
    }
    assert!(!dir.path().join("data/outside.json").exists());

    daemon.stop();
}
