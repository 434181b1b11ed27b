//! SVG rendering of a single chart panel.
//!
//! Geometry is computed here; markup lives in `templates/panel.svg`, where
//! askama escapes every label and title.

use crate::domain::chart::ChartPanel;
use crate::domain::error::ChartsError;
use askama::Template;
use chrono::NaiveDate;

const PADDING_LEFT: f64 = 70.0;
const PADDING_RIGHT: f64 = 20.0;
const PADDING_TOP: f64 = 40.0;
const PADDING_BOTTOM: f64 = 40.0;
const GRID_LINES: usize = 5;

/// Maps dates and values into pixel space.
struct Frame {
    x0: f64,
    y0: f64,
    plot_width: f64,
    plot_height: f64,
    first_date: NaiveDate,
    day_span: f64,
    min_value: f64,
    value_span: f64,
}

impl Frame {
    fn new(panel: &ChartPanel, dates: (NaiveDate, NaiveDate), values: (f64, f64)) -> Self {
        let (first_date, last_date) = dates;
        let (mut min_value, mut max_value) = values;
        if max_value - min_value <= f64::EPSILON {
            min_value -= 1.0;
            max_value += 1.0;
        }

        Self {
            x0: PADDING_LEFT,
            y0: PADDING_TOP,
            plot_width: (panel.width as f64 - PADDING_LEFT - PADDING_RIGHT).max(1.0),
            plot_height: (panel.height as f64 - PADDING_TOP - PADDING_BOTTOM).max(1.0),
            first_date,
            day_span: (last_date - first_date).num_days().max(1) as f64,
            min_value,
            value_span: max_value - min_value,
        }
    }

    fn x(&self, date: NaiveDate) -> f64 {
        self.x0 + (date - self.first_date).num_days() as f64 / self.day_span * self.plot_width
    }

    fn y(&self, value: f64) -> f64 {
        self.y0 + self.plot_height - (value - self.min_value) / self.value_span * self.plot_height
    }

    fn points(&self, points: &[(NaiveDate, f64)]) -> String {
        points
            .iter()
            .map(|(d, v)| format!("{:.1},{:.1}", self.x(*d), self.y(*v)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

struct GridLine {
    y: String,
    label_y: String,
    value: String,
}

struct DateLabel {
    x: String,
    anchor: &'static str,
    text: String,
}

struct Polygon {
    color: String,
    alpha: f64,
    points: String,
    label: String,
}

struct Polyline {
    color: String,
    width: f64,
    points: String,
}

struct LegendEntry {
    x: String,
    rect_y: String,
    text_x: String,
    text_y: String,
    color: String,
    opacity: f64,
    label: String,
}

/// Everything drawn inside the axes of a panel that has data.
struct PlotArea {
    left: String,
    right: String,
    top: String,
    bottom: String,
    tick_x: String,
    date_label_y: String,
    axis_label_y: String,
    grid_alpha: f64,
    grid: Vec<GridLine>,
    date_labels: Vec<DateLabel>,
    fills: Vec<Polygon>,
    guides: Vec<String>,
    lines: Vec<Polyline>,
    legend: Vec<LegendEntry>,
}

#[derive(Template)]
#[template(path = "panel.svg", escape = "html")]
struct PanelTemplate<'a> {
    width: u32,
    height: u32,
    center_x: String,
    center_y: String,
    title: &'a str,
    y_label: &'a str,
    plot: Option<PlotArea>,
}

pub fn render_panel(panel: &ChartPanel) -> Result<String, ChartsError> {
    let plot = match (panel.date_bounds(), panel.value_bounds()) {
        (Some(dates), Some(values)) => Some(plot_area(panel, &Frame::new(panel, dates, values))),
        _ => None,
    };

    PanelTemplate {
        width: panel.width,
        height: panel.height,
        center_x: format!("{:.1}", panel.width as f64 / 2.0),
        center_y: format!("{:.1}", panel.height as f64 / 2.0),
        title: &panel.title,
        y_label: &panel.y_label,
        plot,
    }
    .render()
    .map_err(|e| ChartsError::Render {
        reason: format!("panel '{}': {}", panel.title, e),
    })
}

fn plot_area(panel: &ChartPanel, frame: &Frame) -> PlotArea {
    let left = frame.x0;
    let bottom = frame.y0 + frame.plot_height;

    let grid = (0..=GRID_LINES)
        .map(|i| {
            let value = frame.min_value + frame.value_span * i as f64 / GRID_LINES as f64;
            let y = frame.y(value);
            GridLine {
                y: format!("{y:.1}"),
                label_y: format!("{:.1}", y + 4.0),
                value: format!("{value:.2}"),
            }
        })
        .collect();

    let first = frame.first_date;
    let last = first + chrono::Duration::days(frame.day_span as i64);
    let date_labels = [(first, "start"), (last, "end")]
        .into_iter()
        .map(|(date, anchor)| DateLabel {
            x: format!("{:.1}", frame.x(date)),
            anchor,
            text: date.format("%Y-%m-%d").to_string(),
        })
        .collect();

    let fills = panel
        .fills
        .iter()
        .filter_map(|fill| {
            let vertices = fill.vertices();
            (vertices.len() >= 3).then(|| Polygon {
                color: fill.style.color.clone(),
                alpha: fill.style.alpha,
                points: frame.points(&vertices),
                label: fill.label.clone(),
            })
        })
        .collect();

    let lines = panel
        .lines
        .iter()
        .flat_map(|line| {
            line.segments().into_iter().map(|segment| Polyline {
                color: line.style.color.clone(),
                width: line.style.width,
                points: frame.points(&segment),
            })
        })
        .collect();

    PlotArea {
        left: format!("{left:.1}"),
        right: format!("{:.1}", left + frame.plot_width),
        top: format!("{:.1}", frame.y0),
        bottom: format!("{bottom:.1}"),
        tick_x: format!("{:.1}", left - 6.0),
        date_label_y: format!("{:.1}", bottom + 16.0),
        axis_label_y: format!("{:.1}", frame.y0 + frame.plot_height / 2.0),
        grid_alpha: panel.grid_alpha,
        grid,
        date_labels,
        fills,
        guides: panel.guides.iter().map(|g| format!("{:.1}", frame.y(*g))).collect(),
        lines,
        legend: legend(panel, frame),
    }
}

fn legend(panel: &ChartPanel, frame: &Frame) -> Vec<LegendEntry> {
    let entries = panel
        .lines
        .iter()
        .map(|l| (&l.label, &l.style.color, 1.0))
        .chain(panel.fills.iter().map(|f| (&f.label, &f.style.color, f.style.alpha)));

    let x = frame.x0 + 8.0;
    entries
        .enumerate()
        .map(|(i, (label, color, opacity))| {
            let y = frame.y0 + 8.0 + i as f64 * 14.0;
            LegendEntry {
                x: format!("{x:.1}"),
                rect_y: format!("{:.1}", y - 8.0),
                text_x: format!("{:.1}", x + 14.0),
                text_y: format!("{y:.1}"),
                color: color.clone(),
                opacity,
                label: label.clone(),
            }
        })
        .collect()
}
