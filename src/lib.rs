//! Page rendering for a small server and website uptime monitor.
//!
//! Each page is a [`module::Module`] built on [`module::ModuleCore`], which
//! wraps the module's own content in the shared layout together with the
//! localized menu, the optional update banner and the footer.

pub mod config;
pub mod database;
pub mod fragments;
pub mod handlers;
pub mod lang;
pub mod lookup;
pub mod module;
pub mod modules;
pub mod routes;
pub mod state;
pub mod template;
pub mod update;
