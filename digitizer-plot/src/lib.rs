//! Plot export backend drawing [`PlotDocument`]s with `plotters`.

use digitizer_core::{ExportFormat, LegendPosition, PlotDocument, PlotLine, PlotRenderer};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use series::{DigitizerError, FontSpec, FontWeight, MarkerStyle, Rgb};
use std::path::Path;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

const MARKER_SIZE: i32 = 4;
const LINE_WIDTH: u32 = 2;
const TEXT_COLOR: RGBColor = RGBColor(40, 40, 40);
const GRID_COLOR: RGBColor = RGBColor(210, 210, 210);

type DataChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Writes SVG or PNG plots of a fixed pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlottersRenderer {
    format: ExportFormat,
    width: u32,
    height: u32,
}

impl PlottersRenderer {
    pub fn new(format: ExportFormat, width: u32, height: u32) -> Self {
        Self {
            format,
            width,
            height,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self::new(ExportFormat::default(), DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl PlotRenderer for PlottersRenderer {
    fn format(&self) -> ExportFormat {
        self.format
    }

    fn render(&self, document: &PlotDocument, path: &Path) -> Result<(), DigitizerError> {
        check_document(document)?;
        let size = self.size();
        let result = match self.format {
            ExportFormat::Svg => draw_document(SVGBackend::new(path, size).into_drawing_area(), document),
            ExportFormat::Png => {
                draw_document(BitMapBackend::new(path, size).into_drawing_area(), document)
            }
        };
        result.map_err(DigitizerError::Render)?;
        log::debug!(
            "rendered {} lines to {} ({}x{})",
            document.lines.len(),
            path.display(),
            size.0,
            size.1
        );
        Ok(())
    }
}

/// Rejects documents that would produce an empty or degenerate chart before
/// any file is created.
pub fn check_document(document: &PlotDocument) -> Result<(), DigitizerError> {
    if document.point_count() == 0 {
        return Err(DigitizerError::NoPointsToExport);
    }
    for (axis, (min, max)) in [("x", document.x_range), ("y", document.y_range)] {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(DigitizerError::InvalidCalibration(format!(
                "{axis} range {min}..{max} cannot be plotted"
            )));
        }
    }
    Ok(())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn font_desc(font: &FontSpec) -> FontDesc<'_> {
    let style = match font.weight {
        FontWeight::Normal => FontStyle::Normal,
        FontWeight::Bold => FontStyle::Bold,
    };
    FontDesc::new(FontFamily::from(font.family.as_str()), font.size, style)
}

fn legend_position(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
    }
}

fn draw_document<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    document: &PlotDocument,
) -> Result<(), String> {
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let (x_min, x_max) = document.x_range;
    let (y_min, y_max) = document.y_range;
    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 50);
    if let Some(title) = &document.title {
        builder.caption(title, font_desc(&document.title_font).color(&TEXT_COLOR));
    }
    let mut chart = builder
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| e.to_string())?;

    let axis_font = font_desc(&document.axis_font);
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(document.x_label.as_str())
        .y_desc(document.y_label.as_str())
        .axis_desc_style(axis_font.clone().color(&TEXT_COLOR))
        .label_style(axis_font.clone().color(&TEXT_COLOR))
        .axis_style(&TEXT_COLOR);
    if document.show_grid {
        mesh.light_line_style(&GRID_COLOR).bold_line_style(&GRID_COLOR);
    } else {
        mesh.disable_mesh();
    }
    mesh.draw().map_err(|e| e.to_string())?;

    for line in &document.lines {
        let color = rgb(line.color);
        let series_plot = chart
            .draw_series(LineSeries::new(
                line.points.iter().copied(),
                color.stroke_width(LINE_WIDTH),
            ))
            .map_err(|e| e.to_string())?;
        if document.show_legend {
            series_plot.label(line.name.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH))
            });
        }
        draw_markers(&mut chart, line, color)?;
    }

    if document.show_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE)
            .border_style(&BLACK)
            .label_font(axis_font.color(&TEXT_COLOR))
            .position(legend_position(document.legend_position))
            .margin(12)
            .draw()
            .map_err(|e| e.to_string())?;
    }

    root.present().map_err(|e| e.to_string())?;
    Ok(())
}

fn draw_markers<DB: DrawingBackend>(
    chart: &mut DataChart<'_, DB>,
    line: &PlotLine,
    color: RGBColor,
) -> Result<(), String> {
    let s = MARKER_SIZE;
    let points = line.points.iter().copied();
    let drawn = match line.marker {
        MarkerStyle::None => return Ok(()),
        MarkerStyle::Circle => chart
            .draw_series(points.map(|p| Circle::new(p, s, color.filled())))
            .map(|_| ()),
        MarkerStyle::Square => chart
            .draw_series(points.map(|p| {
                EmptyElement::at(p) + Rectangle::new([(-s, -s), (s, s)], color.filled())
            }))
            .map(|_| ()),
        MarkerStyle::Triangle => chart
            .draw_series(points.map(|p| TriangleMarker::new(p, s + 1, color.filled())))
            .map(|_| ()),
        MarkerStyle::Diamond => chart
            .draw_series(points.map(|p| {
                EmptyElement::at(p)
                    + Polygon::new(
                        vec![(0, -s - 1), (s + 1, 0), (0, s + 1), (-s - 1, 0)],
                        color.filled(),
                    )
            }))
            .map(|_| ()),
        MarkerStyle::Plus => chart
            .draw_series(points.map(|p| {
                EmptyElement::at(p)
                    + PathElement::new(vec![(-s, 0), (s, 0)], color.stroke_width(LINE_WIDTH))
                    + PathElement::new(vec![(0, -s), (0, s)], color.stroke_width(LINE_WIDTH))
            }))
            .map(|_| ()),
        MarkerStyle::Cross => chart
            .draw_series(points.map(|p| Cross::new(p, s, color.stroke_width(LINE_WIDTH))))
            .map(|_| ()),
    };
    drawn.map_err(|e| e.to_string())
}
