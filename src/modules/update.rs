use serde_json::Value;

use crate::module::{Module, ModuleContext, ModuleCore, ModuleError};
use crate::update::{last_checked, latest_known, Version};

pub const TEMPLATE_ID: &str = "update_status";

/// Running version, latest known release and when it was last looked up.
pub struct UpdateModule {
    core: ModuleCore,
}

impl UpdateModule {
    pub fn new(ctx: &ModuleContext) -> Result<Self, ModuleError> {
        Ok(Self {
            core: ModuleCore::new(ctx)?,
        })
    }
}

impl Module for UpdateModule {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModuleCore {
        &mut self.core
    }

    fn initialize(&mut self) -> Result<(), ModuleError> {
        self.core.set_template_id(TEMPLATE_ID, Some("update.tpl.html"))?;

        let db = self.core.db();
        let lookup = self.core.lookup();
        let current = Version::current();
        let latest = latest_known(db);

        let latest_version = match &latest {
            Some(v) => v.to_string(),
            None => lookup.localized("update", "unknown"),
        };
        let last_check = match last_checked(db) {
            Some(at) => at.format("%Y-%m-%d %H:%M UTC").to_string(),
            None => lookup.localized("update", "never"),
        };
        let status = match &latest {
            Some(v) if v.is_newer_than(&current) => lookup
                .localized("update", "available")
                .replace("{version}", &v.to_string()),
            Some(_) => lookup.localized("update", "up_to_date"),
            None => String::new(),
        };

        let data = [
            ("heading", Value::from(lookup.localized("update", "heading"))),
            ("label_current_version", Value::from(lookup.localized("update", "current_version"))),
            ("label_latest_version", Value::from(lookup.localized("update", "latest_version"))),
            ("label_last_check", Value::from(lookup.localized("update", "last_check"))),
            ("label_check_now", Value::from(lookup.localized("update", "check_now"))),
            ("current_version", Value::from(current.to_string())),
            ("latest_version", Value::from(latest_version)),
            ("last_check", Value::from(last_check)),
            ("status", Value::from(status)),
        ];
        self.core.tpl_mut().add_template_data(TEMPLATE_ID, data);
        Ok(())
    }
}
