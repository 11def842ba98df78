use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or rendering page templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template registered under this id
    #[error("Template not found with id: {0}")]
    NotFound(String),

    /// Template file could not be read
    #[error("Template not found with id: {id} and filename: {path:?}")]
    File {
        id: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template source failed to parse
    #[error("Template {id} has a syntax error: {source}")]
    Syntax {
        id: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("Failed to render template: {0}")]
    Render(#[from] handlebars::RenderError),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
