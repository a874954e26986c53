//! Line chart of rate against race number, drawn to SVG with plotters.

use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;

use crate::errors::{RenderError, RenderResult};
use crate::series::RatingSeries;

pub const TITLE: &str = "Rate Progression Over Time";
pub const X_LABEL: &str = "Race Number (Date)";
pub const Y_LABEL: &str = "Rate";
pub const LEGEND: &str = "Rate Progression";
pub const NO_DATA_NOTICE: &str = "No data yet.";

const WIDTH: u32 = 800;
const HEIGHT: u32 = 500;
const NO_DATA_SIZE: (u32, u32) = (400, 40);
/// Share of the data span added on each side of an axis.
const AXIS_PADDING: f64 = 0.05;
/// Smallest padding, so one point or identical values still get an interval.
const MIN_PADDING: f64 = 1.0;
/// Padding relative to the magnitude of the data. Keeps the interval wide
/// enough to hold distinct ticks where f64 spacing exceeds 1.
const RELATIVE_PADDING: f64 = 1e-6;
const Y_TICK_TARGET: f64 = 5.0;
const MAX_Y_TICKS: usize = 20;

/// One plotted observation in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub race_number: i64,
    pub rate: i64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XTick {
    pub value: f64,
    /// `"{race_number}\n({date})"`
    pub label: String,
}

/// Laid-out chart, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub points: Vec<Point>,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    /// One tick per row, in row order.
    pub x_ticks: Vec<XTick>,
    pub y_ticks: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    NoData,
    Figure(Figure),
}

fn padded_range(min: f64, max: f64) -> Range<f64> {
    let magnitude = min.abs().max(max.abs());
    let pad = ((max - min) * AXIS_PADDING)
        .max(MIN_PADDING)
        .max(magnitude * RELATIVE_PADDING);
    (min - pad)..(max + pad)
}

/// Step of 1, 2 or 5 times a power of ten giving roughly `target` ticks.
fn nice_step(span: f64, target: f64) -> f64 {
    let raw = span / target;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    (factor * magnitude).max(1.0)
}

fn y_ticks(range: &Range<f64>) -> Vec<f64> {
    let step = nice_step(range.end - range.start, Y_TICK_TARGET);
    let first = (range.start / step).ceil();
    (0..MAX_Y_TICKS)
        .map(|i| (first + i as f64) * step)
        .skip_while(|value| *value < range.start)
        .take_while(|value| *value <= range.end)
        .collect()
}

pub fn tick_label(race_number: i64, date: &str) -> String {
    format!("{}\n({})", race_number, date)
}

impl Chart {
    /// Lay out `series` as a line chart, one point and one x tick per row in
    /// row order. Duplicate or unordered race numbers are plotted as found.
    pub fn build(series: &RatingSeries) -> Self {
        let Some(first) = series.observations().first() else {
            return Chart::NoData;
        };

        let (mut x_min, mut x_max) = (first.race_number, first.race_number);
        let (mut y_min, mut y_max) = (first.rate, first.rate);
        for observation in series {
            x_min = x_min.min(observation.race_number);
            x_max = x_max.max(observation.race_number);
            y_min = y_min.min(observation.rate);
            y_max = y_max.max(observation.rate);
        }

        let x_range = padded_range(x_min as f64, x_max as f64);
        let y_range = padded_range(y_min as f64, y_max as f64);

        let mut points = Vec::with_capacity(series.len());
        let mut x_ticks = Vec::with_capacity(series.len());
        for observation in series {
            let date = observation.date.format("%Y-%m-%d").to_string();
            let x = observation.race_number as f64;
            x_ticks.push(XTick {
                value: x,
                label: tick_label(observation.race_number, &date),
            });
            points.push(Point {
                x,
                y: observation.rate as f64,
                race_number: observation.race_number,
                rate: observation.rate,
                date,
            });
        }

        let y_ticks = y_ticks(&y_range);
        Chart::Figure(Figure {
            points,
            x_range,
            y_range,
            x_ticks,
            y_ticks,
        })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Chart::NoData)
    }

    pub fn point_count(&self) -> usize {
        match self {
            Chart::NoData => 0,
            Chart::Figure(figure) => figure.points.len(),
        }
    }

    pub fn tick_labels(&self) -> Vec<String> {
        match self {
            Chart::NoData => Vec::new(),
            Chart::Figure(figure) => figure.x_ticks.iter().map(|t| t.label.clone()).collect(),
        }
    }
}

impl Figure {
    /// Distinct x tick positions with the label of the first row at each.
    fn distinct_x_ticks(&self) -> Vec<&XTick> {
        let mut ticks: Vec<&XTick> = Vec::with_capacity(self.x_ticks.len());
        for tick in &self.x_ticks {
            if !ticks.iter().any(|seen| seen.value == tick.value) {
                ticks.push(tick);
            }
        }
        ticks
    }
}

fn chart_error(err: impl std::fmt::Display) -> RenderError {
    RenderError::Chart(err.to_string())
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let x_ticks = figure.distinct_x_ticks();
    let x_keys: Vec<f64> = x_ticks.iter().map(|tick| tick.value).collect();
    let x_label = |value: &f64| {
        x_ticks
            .iter()
            .find(|tick| tick.value == *value)
            .map(|tick| tick.label.clone())
            .unwrap_or_else(|| format!("{:.0}", value))
    };
    let y_label = |value: &f64| format!("{:.0}", value);

    let mut chart = ChartBuilder::on(root)
        .caption(TITLE, ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(80)
        .build_cartesian_2d(
            figure.x_range.clone().with_key_points(x_keys),
            figure.y_range.clone().with_key_points(figure.y_ticks.clone()),
        )?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            figure.points.iter().map(|p| (p.x, p.y)),
            &BLUE,
        ))?
        .label(LEGEND)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart.draw_series(
        figure
            .points
            .iter()
            .map(|p| Circle::new((p.x, p.y), 4, BLUE.filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn draw_no_data<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    root.draw(&Text::new(
        NO_DATA_NOTICE,
        (8, 12),
        ("sans-serif", 16).into_font(),
    ))?;
    Ok(())
}

/// Render the chart as a standalone SVG document. An empty chart renders the
/// no-data notice as text.
pub fn render_chart(chart: &Chart) -> RenderResult<String> {
    let mut svg = String::new();
    {
        let size = match chart {
            Chart::NoData => NO_DATA_SIZE,
            Chart::Figure(_) => (WIDTH, HEIGHT),
        };
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        match chart {
            Chart::NoData => draw_no_data(&root).map_err(chart_error)?,
            Chart::Figure(figure) => draw_figure(&root, figure).map_err(chart_error)?,
        }
        root.present().map_err(chart_error)?;
    }
    Ok(svg)
}

pub fn render(series: &RatingSeries) -> RenderResult<String> {
    render_chart(&Chart::build(series))
}
