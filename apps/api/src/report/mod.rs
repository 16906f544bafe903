// Report assembly: one ordered block layout, rendered to a paginated PDF and
// a block-structured DOCX. Rendering is synchronous and in-memory; async
// callers run it on a blocking thread.

pub mod docx;
pub mod model;
pub mod pdf;

use thiserror::Error;

pub use model::{build_layout, MetricEntry, ReportBundle};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("DOCX generation failed: {0}")]
    Docx(String),
}
