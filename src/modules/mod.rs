//! Concrete module pages.

mod config;
mod help;
mod update;

pub use config::ConfigModule;
pub use help::HelpModule;
pub use update::UpdateModule;

use crate::module::{Module, ModuleContext, ModuleError};

/// Module types this build can render.
pub const MODULE_TYPES: [&str; 3] = ["config", "update", "help"];

/// Construct the module for `kind`, or `None` if there is no such module.
pub fn build(kind: &str, ctx: &ModuleContext) -> Result<Option<Box<dyn Module>>, ModuleError> {
    let ctx = ModuleContext {
        mode: kind.to_string(),
        ..ctx.clone()
    };

    let module: Box<dyn Module> = match kind {
        "config" => Box::new(ConfigModule::new(&ctx)?),
        "update" => Box::new(UpdateModule::new(&ctx)?),
        "help" => Box::new(HelpModule::new(&ctx)?),
        _ => return Ok(None),
    };
    Ok(Some(module))
}
