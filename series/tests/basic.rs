use series::{
    data_to_pixel, load_series_file, pixel_to_data, save_series_file, AxisCalibration,
    DigitizerError, GraphSeries, ImageExtent, MarkerStyle, Point, Rgb, SeriesRecord, SourceImage,
};

const EPS: f64 = 1e-9;

fn calibration(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> AxisCalibration {
    AxisCalibration::new(x_min, x_max, y_min, y_max).expect("valid calibration")
}

fn series_with_image(width: u32, height: u32) -> GraphSeries {
    let mut series = GraphSeries::new("test");
    series.load_image(SourceImage {
        path: "graph.png".to_string(),
        extent: ImageExtent::new(width, height).expect("extent"),
    });
    series
}

#[test]
fn click_at_center_of_sample_image() {
    let calib = calibration(0.0, 10.0, 0.0, 1.0);
    let extent = ImageExtent::new(200, 100).unwrap();
    let point = pixel_to_data(100.0, 50.0, &calib, extent);
    assert!((point.x - 5.0).abs() < EPS);
    assert!((point.y - 0.5).abs() < EPS);
}

#[test]
fn corners_map_with_inverted_y() {
    let calib = calibration(-3.0, 7.0, 2.0, 12.0);
    let extent = ImageExtent::new(640, 480).unwrap();

    let top_left = pixel_to_data(0.0, 0.0, &calib, extent);
    assert_eq!(top_left, Point::new(-3.0, 12.0));

    let bottom_right = pixel_to_data(640.0, 480.0, &calib, extent);
    assert!((bottom_right.x - 7.0).abs() < EPS);
    assert!((bottom_right.y - 2.0).abs() < EPS);
}

#[test]
fn center_pixel_maps_to_center_of_range() {
    let calib = calibration(1.0, 4.0, -2.0, 6.0);
    let extent = ImageExtent::new(300, 90).unwrap();
    let point = pixel_to_data(150.0, 45.0, &calib, extent);
    assert!((point.x - 2.5).abs() < EPS);
    assert!((point.y - 2.0).abs() < EPS);
}

#[test]
fn pixel_and_data_round_trip() {
    let calib = calibration(-1e3, 2.5e3, 1e-4, 3e-4);
    let extent = ImageExtent::new(1021, 777).unwrap();
    for &(px, py) in &[(0.0, 0.0), (13.5, 700.25), (1021.0, 777.0), (500.0, 1.0)] {
        let point = pixel_to_data(px, py, &calib, extent);
        let (bx, by) = data_to_pixel(point, &calib, extent);
        assert!((bx - px).abs() < 1e-6, "x {px} -> {bx}");
        assert!((by - py).abs() < 1e-6, "y {py} -> {by}");
    }

    let original = Point::new(123.0, 2.2e-4);
    let (px, py) = data_to_pixel(original, &calib, extent);
    let back = pixel_to_data(px, py, &calib, extent);
    assert!((back.x - original.x).abs() < 1e-9);
    assert!((back.y - original.y).abs() < 1e-12);
}

#[test]
fn degenerate_calibration_is_rejected() {
    let err = AxisCalibration::new(1.0, 1.0, 0.0, 1.0).unwrap_err();
    assert!(matches!(err, DigitizerError::InvalidCalibration(_)));
    let err = AxisCalibration::new(0.0, 1.0, 5.0, 5.0).unwrap_err();
    assert!(matches!(err, DigitizerError::InvalidCalibration(_)));
    assert!(AxisCalibration::new(0.0, f64::INFINITY, 0.0, 1.0).is_err());
    assert!(ImageExtent::new(0, 10).is_err());
}

#[test]
fn add_point_requires_image() {
    let mut series = GraphSeries::default();
    let err = series.add_point(1.0, 1.0).unwrap_err();
    assert!(matches!(err, DigitizerError::NoImageLoaded));
    assert!(series.is_empty());
}

#[test]
fn out_of_bounds_point_is_not_stored() {
    let mut series = series_with_image(200, 100);
    let err = series.add_point(201.0, 10.0).unwrap_err();
    assert!(matches!(err, DigitizerError::PointOutOfBounds { .. }));
    assert!(series.add_point(200.0, 100.0).is_ok());
    assert_eq!(series.len(), 1);
}

#[test]
fn clear_then_add_leaves_one_point() {
    let mut series = series_with_image(200, 100);
    for i in 0..5 {
        series.add_point(f64::from(i) * 10.0, 20.0).unwrap();
    }
    series.clear();
    series.clear();
    series.add_point(50.0, 50.0).unwrap();
    assert_eq!(series.len(), 1);
}

#[test]
fn recalibration_keeps_existing_points() {
    let mut series = series_with_image(200, 100);
    series.set_calibration(calibration(0.0, 10.0, 0.0, 1.0));
    let first = series.add_point(100.0, 50.0).unwrap();

    series.set_calibration(calibration(0.0, 20.0, 0.0, 2.0));
    let second = series.add_point(100.0, 50.0).unwrap();

    assert_eq!(series.points()[0], first);
    assert!((second.x - 10.0).abs() < EPS);
    assert!((second.y - 1.0).abs() < EPS);
}

#[test]
fn styling_does_not_touch_points() {
    let mut series = series_with_image(200, 100);
    series.add_point(20.0, 30.0).unwrap();
    let before = series.points().to_vec();
    series.set_color("#ff0000".parse().unwrap());
    series.set_marker(MarkerStyle::Square);
    series.set_labels("time", "value");
    assert_eq!(series.points(), before.as_slice());
}

#[test]
fn remove_last_and_new_image_reset() {
    let mut series = series_with_image(200, 100);
    series.add_point(0.0, 0.0).unwrap();
    series.add_point(10.0, 10.0).unwrap();
    let popped = series.remove_last().unwrap();
    assert_eq!(series.len(), 1);
    assert!(popped.x > 0.0);

    series.load_image(SourceImage {
        path: "other.png".to_string(),
        extent: ImageExtent::new(50, 50).unwrap(),
    });
    assert!(series.is_empty());
    assert_eq!(series.remove_last(), None);
}

#[test]
fn marker_pixels_follow_current_calibration() {
    let mut series = series_with_image(200, 100);
    series.set_calibration(calibration(0.0, 10.0, 0.0, 1.0));
    series.add_point(100.0, 50.0).unwrap();
    let pixels = series.marker_pixels();
    assert!((pixels[0].0 - 100.0).abs() < 1e-9);
    assert!((pixels[0].1 - 50.0).abs() < 1e-9);
    assert_eq!(series.point_labels(), vec!["Point 1: (5.00, 0.50)".to_string()]);
}

#[test]
fn save_and_load_series_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("series.json");

    let mut series = series_with_image(200, 100);
    series.rename("trace");
    series.set_calibration(calibration(0.0, 10.0, 0.0, 1.0));
    series.set_marker(MarkerStyle::Diamond);
    series.set_color(Rgb::new(255, 0, 0));
    series.add_point(100.0, 50.0).unwrap();
    series.add_point(0.0, 100.0).unwrap();

    save_series_file(&series, &path).expect("save series");
    let loaded = load_series_file(&path).expect("load series");
    assert_eq!(loaded, series);

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["marker_style"], "D");
    assert_eq!(raw["line_color"], "#ff0000");
    assert_eq!(raw["points"][0], serde_json::json!([5.0, 0.5]));
}

#[test]
fn empty_series_is_not_written() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.json");
    let err = save_series_file(&GraphSeries::default(), &path).unwrap_err();
    assert!(matches!(err, DigitizerError::NoPointsToExport));
    assert!(!path.exists());
}

#[test]
fn record_defaults_and_aliases() {
    let record = SeriesRecord::from_json_value(serde_json::json!({
        "points": [[1, 2], [3.5, 4]],
        "x_label": "x",
        "y_label": "y",
        "x_min": 0, "x_max": 10, "y_min": 0, "y_max": 10,
        "color": "#00ff00",
        "marker": "s",
        "axis_font": {"family": "serif", "size": 12}
    }))
    .expect("record");
    assert_eq!(record.name, "Unnamed Graph");
    assert_eq!(record.line_color, Rgb::new(0, 255, 0));
    assert_eq!(record.marker_style, MarkerStyle::Square);
    assert_eq!(record.axis_font.family, "serif");

    let series = record.into_series().expect("series");
    assert_eq!(series.points()[1], Point::new(3.5, 4.0));
    assert!(series.image().is_none());
}

#[test]
fn record_marker_names_ignore_case() {
    let record = SeriesRecord::from_json_value(serde_json::json!({
        "points": [[1, 2]],
        "x_label": "x",
        "y_label": "y",
        "x_min": 0, "x_max": 10, "y_min": 0, "y_max": 10,
        "marker_style": "Circle"
    }))
    .expect("record");
    assert_eq!(record.marker_style, MarkerStyle::Circle);

    let err = SeriesRecord::from_json_value(serde_json::json!({
        "points": [[1, 2]],
        "x_label": "x",
        "y_label": "y",
        "x_min": 0, "x_max": 10, "y_min": 0, "y_max": 10,
        "marker_style": "star"
    }))
    .unwrap_err();
    assert!(matches!(err, DigitizerError::MalformedSeriesData(_)));
}

#[test]
fn record_missing_points_is_malformed() {
    let err = SeriesRecord::from_json_value(serde_json::json!({
        "name": "broken",
        "x_label": "x",
        "y_label": "y",
        "x_min": 0, "x_max": 1, "y_min": 0, "y_max": 1
    }))
    .unwrap_err();
    assert!(matches!(err, DigitizerError::MalformedSeriesData(_)));

    let err = SeriesRecord::from_json_value(serde_json::json!({
        "points": [[1, 2, 3]],
        "x_label": "x",
        "y_label": "y",
        "x_min": 0, "x_max": 1, "y_min": 0, "y_max": 1
    }))
    .unwrap_err();
    assert!(matches!(err, DigitizerError::MalformedSeriesData(_)));
}

#[test]
fn record_with_degenerate_bounds_fails_calibration() {
    let record = SeriesRecord::from_json_value(serde_json::json!({
        "points": [],
        "x_label": "x",
        "y_label": "y",
        "x_min": 2, "x_max": 2, "y_min": 0, "y_max": 1
    }))
    .expect("record parses");
    let err = record.into_series().unwrap_err();
    assert!(matches!(err, DigitizerError::InvalidCalibration(_)));
}
