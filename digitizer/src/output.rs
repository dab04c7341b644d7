use digitizer_cli::offline::OfflineOutcome;
use digitizer_cli::protocol::{
    CollectionEntry, LoadFailure, PointSummary, SeriesState, TabSummary,
};
use digitizer_core::{DigitizerSettings, SeriesEntry};

pub fn print_info(message: &str) {
    println!("[Digitizer][INFO] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[Digitizer][ERROR]: {message}");
}

pub fn print_points(series: &str, points: &[PointSummary], json_query: bool) {
    if json_query {
        match serde_json::to_string_pretty(points) {
            Ok(json) => println!("{json}"),
            Err(err) => print_error(&err.to_string()),
        }
        return;
    }
    if points.is_empty() {
        print_info(&format!("No points in '{series}'"));
        return;
    }
    print_info(&format!("Points in '{series}':"));
    for point in points {
        match point.pixel {
            Some((px, py)) => println!("{}\t[pixel {:.1}, {:.1}]", point.label, px, py),
            None => println!("{}", point.label),
        }
    }
}

pub fn print_series_state(state: &SeriesState) {
    print_info(&format!("Series '{}'", state.name));
    println!("\tx: {} [{} .. {}]", state.x_label, state.x_min, state.x_max);
    println!("\ty: {} [{} .. {}]", state.y_label, state.y_min, state.y_max);
    println!("\tcolor: {}  marker: {}", state.color, state.marker);
    match (&state.image, state.image_size) {
        (Some(path), Some((width, height))) => println!("\timage: {path} ({width}x{height})"),
        _ => println!("\timage: (none)"),
    }
    println!("\tpoints: {}", state.points);
}

pub fn print_tabs(tabs: &[TabSummary]) {
    print_info("Tabs:");
    for tab in tabs {
        let marker = if tab.active { "*" } else { " " };
        println!("{marker} {} {} ({} points)", tab.index, tab.name, tab.points);
    }
}

pub fn print_collection(entries: &[CollectionEntry]) {
    if entries.is_empty() {
        print_info("Collection is empty");
        return;
    }
    print_info("Collected series:");
    for entry in entries {
        println!(
            "{} {} ({} points) [{} / {}]",
            entry.index, entry.name, entry.points, entry.x_label, entry.y_label
        );
    }
}

pub fn print_library(entries: &[SeriesEntry]) {
    if entries.is_empty() {
        print_info("No saved series");
        return;
    }
    print_info("Saved series:");
    for entry in entries {
        println!(
            "{} ({} points)\t{}",
            entry.name,
            entry.points,
            entry.path.display()
        );
    }
}

pub fn print_load_report(loaded: &[String], failed: &[LoadFailure]) {
    for name in loaded {
        print_info(&format!("Loaded '{name}'"));
    }
    for failure in failed {
        print_error(&format!("{}: {}", failure.path, failure.message));
    }
}

pub fn print_settings(settings: &DigitizerSettings) {
    match serde_json::to_string_pretty(settings) {
        Ok(json) => println!("{json}"),
        Err(err) => print_error(&err.to_string()),
    }
}

pub fn print_offline_outcome(outcome: &OfflineOutcome) {
    print_load_report(&outcome.loaded, &outcome.failed);
    print_info(&format!(
        "Wrote {} points to {}",
        outcome.points,
        outcome.output.display()
    ));
}
