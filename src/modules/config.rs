use serde_json::{json, Value};

use crate::module::{Module, ModuleContext, ModuleCore, ModuleError};

pub const TEMPLATE_ID: &str = "config_list";

/// Read-only view of the stored settings.
pub struct ConfigModule {
    core: ModuleCore,
}

impl ConfigModule {
    pub fn new(ctx: &ModuleContext) -> Result<Self, ModuleError> {
        Ok(Self {
            core: ModuleCore::new(ctx)?,
        })
    }
}

impl Module for ConfigModule {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModuleCore {
        &mut self.core
    }

    fn initialize(&mut self) -> Result<(), ModuleError> {
        self.core.set_template_id(TEMPLATE_ID, Some("config.tpl.html"))?;

        let rows: Vec<Value> = self
            .core
            .db()
            .entries()
            .into_iter()
            .map(|(key, value)| json!({ "key": key, "value": value }))
            .collect();

        let lookup = self.core.lookup();
        let data = [
            ("heading", Value::from(lookup.localized("config", "heading"))),
            ("label_key", Value::from(lookup.localized("config", "key"))),
            ("label_value", Value::from(lookup.localized("config", "value"))),
            ("label_empty", Value::from(lookup.localized("config", "empty"))),
            ("rows", Value::Array(rows)),
        ];
        self.core.tpl_mut().add_template_data(TEMPLATE_ID, data);
        Ok(())
    }
}
