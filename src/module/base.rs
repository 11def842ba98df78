use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use askama::Template;
use axum::response::Html;

use super::error::ModuleError;
use crate::config;
use crate::database::Database;
use crate::fragments::UpdateBannerTemplate;
use crate::lookup::ConfigLookup;
use crate::template::{TemplateEngine, MAIN_TEMPLATE, MAIN_TEMPLATE_FILE};

/// Id of the footer section inside the layout file.
pub const FOOTER_TEMPLATE: &str = "main_footer";

/// Placeholder shown in the message area when there is nothing to say.
pub const EMPTY_MESSAGE: &str = "&nbsp;";

/// Navigation entries; each gets a `label_<name>` placeholder in the layout.
pub const NAV_LABELS: [&str; 6] = ["servers", "users", "log", "config", "update", "help"];

/// What a page needs from the process that hosts it.
#[derive(Clone)]
pub struct ModuleContext {
    /// Process-wide data handle, if one has been opened already.
    pub db: Option<Arc<Database>>,
    pub lookup: Arc<dyn ConfigLookup>,
    pub template_dir: PathBuf,
    /// Module type of the current request (`config`, `update`, ...).
    pub mode: String,
}

/// Shared part of every module page: owns the template engine for one
/// request and assembles the layout around the module's own content.
pub struct ModuleCore {
    /// HTML shown above the content; empty means nothing to report.
    pub message: String,
    /// Module type, used for the subtitle and the active menu entry.
    pub mode: String,
    add_footer: bool,
    db: Arc<Database>,
    tpl: TemplateEngine,
    tpl_id: Option<String>,
    lookup: Arc<dyn ConfigLookup>,
}

impl ModuleCore {
    /// Reuses the context's data handle or opens the configured data file,
    /// then creates a fresh template engine.
    pub fn new(ctx: &ModuleContext) -> Result<Self, ModuleError> {
        let db = match &ctx.db {
            Some(db) => Arc::clone(db),
            None => {
                let path = config::get_data_file();
                tracing::debug!(path = %path.display(), "No shared data handle; opening one");
                Arc::new(Database::open(path)?)
            }
        };

        Ok(Self {
            message: String::new(),
            mode: ctx.mode.clone(),
            add_footer: true,
            db,
            tpl: TemplateEngine::new(ctx.template_dir.clone())?,
            tpl_id: None,
            lookup: Arc::clone(&ctx.lookup),
        })
    }

    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn lookup(&self) -> &dyn ConfigLookup {
        self.lookup.as_ref()
    }

    pub fn tpl(&self) -> &TemplateEngine {
        &self.tpl
    }

    pub fn tpl_mut(&mut self) -> &mut TemplateEngine {
        &mut self.tpl
    }

    /// Names the template that supplies this module's content. When `file` is
    /// given the template is registered from it right away.
    pub fn set_template_id(&mut self, id: &str, file: Option<&str>) -> Result<(), ModuleError> {
        self.tpl_id = Some(id.to_string());
        if let Some(file) = file {
            self.tpl.new_template(id, file)?;
        }
        Ok(())
    }

    pub fn template_id(&self) -> Option<&str> {
        self.tpl_id.as_deref()
    }

    /// Show or hide the page footer.
    pub fn add_footer(&mut self, value: bool) {
        self.add_footer = value;
    }

    pub fn has_footer(&self) -> bool {
        self.add_footer
    }

    /// Render the complete page.
    pub fn create_html(&mut self) -> Result<Html<String>, ModuleError> {
        self.prepare()?;
        Ok(Html(self.tpl.get_template(MAIN_TEMPLATE)?))
    }

    /// Render the complete page into `out`.
    pub fn display<W: Write>(&mut self, out: W) -> Result<(), ModuleError> {
        self.prepare()?;
        self.tpl.display(MAIN_TEMPLATE, out)?;
        Ok(())
    }

    fn prepare(&mut self) -> Result<(), ModuleError> {
        let html_footer = if self.add_footer {
            self.tpl.new_template(FOOTER_TEMPLATE, MAIN_TEMPLATE_FILE)?;
            self.tpl.get_template(FOOTER_TEMPLATE)?
        } else {
            String::new()
        };

        if self.lookup.config_flag("show_update") {
            self.create_html_update_available()?;
        }

        self.create_html_labels();

        let content = match &self.tpl_id {
            Some(id) => self.tpl.get_template(id)?,
            None => String::new(),
        };
        let message = if self.message.is_empty() {
            EMPTY_MESSAGE.to_string()
        } else {
            self.message.clone()
        };
        let back_to_top = self.lookup.localized("system", "back_to_top");

        self.tpl.add_template_data(
            MAIN_TEMPLATE,
            [
                ("content", content),
                ("message", message),
                ("html_footer", html_footer),
                ("label_back_to_top", back_to_top),
            ],
        );
        Ok(())
    }

    fn create_html_update_available(&mut self) -> Result<(), ModuleError> {
        if !self.lookup.is_update_available() {
            return Ok(());
        }

        let label = self.lookup.localized("system", "update_available");
        let banner = UpdateBannerTemplate { label: &label }.render()?;
        self.tpl
            .add_template_data(MAIN_TEMPLATE, [("update_available", banner)]);
        Ok(())
    }

    fn create_html_labels(&mut self) {
        let lookup = Arc::clone(&self.lookup);
        let mut labels = vec![
            (
                "title".to_string(),
                lookup.localized("system", "title").to_uppercase(),
            ),
            ("subtitle".to_string(), lookup.localized("system", &self.mode)),
            (format!("active_{}", self.mode), "active".to_string()),
        ];
        labels.extend(
            NAV_LABELS
                .iter()
                .map(|name| (format!("label_{}", name), lookup.localized("system", name))),
        );

        self.tpl.add_template_data(MAIN_TEMPLATE, labels);
    }
}
