//! Rendering error types

use thiserror::Error;

/// Chart and page rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Template rendering failed
    #[error("Template rendering failed: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Chart drawing failed
    #[error("Chart drawing failed: {0}")]
    Chart(String),
}
