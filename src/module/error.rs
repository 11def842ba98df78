use thiserror::Error;

use crate::database::DatabaseError;
use crate::template::TemplateError;

/// Failures raised while building a module page. The page layer adds no
/// variants of its own; everything here comes from a collaborator.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Failed to render built-in fragment: {0}")]
    Fragment(#[from] askama::Error),
}
