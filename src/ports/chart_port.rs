//! Chart rendering port trait.

use crate::domain::chart::ChartDocument;
use crate::domain::error::ChartsError;
use std::path::Path;

/// Port for turning a chart document into a visual artifact.
pub trait ChartPort {
    fn render(&self, document: &ChartDocument, output_path: &Path) -> Result<(), ChartsError>;
}
