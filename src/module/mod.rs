//! Module pages.
//!
//! Every page of the monitor is a *module*: it fills one content template and
//! leaves the rest of the page (layout, menu labels, update banner, footer) to
//! [`ModuleCore`]. A concrete module owns a core, populates its content in
//! [`Module::initialize`] and is rendered with [`Module::render`].
//!
//! ```no_run
//! use psm::module::{Module, ModuleContext, ModuleCore, ModuleError};
//!
//! struct Hello {
//!     core: ModuleCore,
//! }
//!
//! impl Module for Hello {
//!     fn core(&self) -> &ModuleCore {
//!         &self.core
//!     }
//!     fn core_mut(&mut self) -> &mut ModuleCore {
//!         &mut self.core
//!     }
//!     fn initialize(&mut self) -> Result<(), ModuleError> {
//!         self.core.set_template_id("hello", Some("hello.tpl.html"))?;
//!         self.core.tpl_mut().add_template_data("hello", [("name", "world")]);
//!         Ok(())
//!     }
//! }
//! ```

mod base;
mod error;

use std::io::Write;

use axum::response::Html;

pub use self::base::{ModuleContext, ModuleCore, EMPTY_MESSAGE, FOOTER_TEMPLATE, NAV_LABELS};
pub use self::error::ModuleError;

pub trait Module: Send {
    fn core(&self) -> &ModuleCore;

    fn core_mut(&mut self) -> &mut ModuleCore;

    /// Register and fill the module's content template.
    fn initialize(&mut self) -> Result<(), ModuleError>;

    fn render(&mut self) -> Result<Html<String>, ModuleError> {
        self.initialize()?;
        self.core_mut().create_html()
    }

    fn render_to(&mut self, out: &mut dyn Write) -> Result<(), ModuleError> {
        self.initialize()?;
        self.core_mut().display(out)
    }
}
