use serde_json::Value;

use crate::module::{Module, ModuleContext, ModuleCore, ModuleError};

pub const TEMPLATE_ID: &str = "help";

const TOPICS: [&str; 3] = ["config", "update", "update_notice"];

pub struct HelpModule {
    core: ModuleCore,
}

impl HelpModule {
    pub fn new(ctx: &ModuleContext) -> Result<Self, ModuleError> {
        Ok(Self {
            core: ModuleCore::new(ctx)?,
        })
    }
}

impl Module for HelpModule {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ModuleCore {
        &mut self.core
    }

    fn initialize(&mut self) -> Result<(), ModuleError> {
        self.core.set_template_id(TEMPLATE_ID, Some("help.tpl.html"))?;

        let lookup = self.core.lookup();
        let topics: Vec<Value> = TOPICS
            .iter()
            .map(|t| Value::from(lookup.localized("help", t)))
            .collect();
        let data = [
            ("heading", Value::from(lookup.localized("help", "heading"))),
            ("intro", Value::from(lookup.localized("help", "intro"))),
            ("topics", Value::Array(topics)),
        ];
        self.core.tpl_mut().add_template_data(TEMPLATE_ID, data);
        Ok(())
    }
}
