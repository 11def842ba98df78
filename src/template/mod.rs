//! Runtime page templates.
//!
//! Pages are assembled from named Handlebars templates read from the template
//! directory. Each template id carries its own key/value data; `{{key}}`
//! placeholders are HTML-escaped and `{{{key}}}` placeholders insert markup
//! that was already built by another template.

mod engine;
mod error;

pub use engine::{extract_section, TemplateEngine, MAIN_TEMPLATE, MAIN_TEMPLATE_FILE};
pub use error::{Result, TemplateError};
