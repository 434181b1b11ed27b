//! HTML chart adapter implementing ChartPort.
//!
//! Renders `templates/chart.html` with askama: a standalone page with one
//! inline SVG per panel, stacked vertically in document order.

pub mod chart_svg;

use std::fs;
use std::path::Path;

use crate::domain::chart::ChartDocument;
use crate::domain::error::ChartsError;
use crate::ports::chart_port::ChartPort;

use askama::Template;
use chart_svg::render_panel;

#[derive(Template)]
#[template(path = "chart.html")]
struct ChartTemplate<'a> {
    title: &'a str,
    panels: Vec<String>,
}

pub struct HtmlChartAdapter;

impl HtmlChartAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render_html(&self, document: &ChartDocument) -> Result<String, ChartsError> {
        let panels = document
            .panels
            .iter()
            .map(render_panel)
            .collect::<Result<Vec<_>, _>>()?;

        ChartTemplate {
            title: &document.title,
            panels,
        }
        .render()
        .map_err(|e| ChartsError::Render {
            reason: e.to_string(),
        })
    }
}

impl Default for HtmlChartAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartPort for HtmlChartAdapter {
    fn render(&self, document: &ChartDocument, output_path: &Path) -> Result<(), ChartsError> {
        if output_path.as_os_str().is_empty() {
            return Err(ChartsError::Render {
                reason: "output path is empty".into(),
            });
        }

        let html = self.render_html(document)?;

        if let Some(parent) = output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, html)?;

        tracing::info!(
            path = %output_path.display(),
            panels = document.panels.len(),
            "chart written"
        );
        Ok(())
    }
}
