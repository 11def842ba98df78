use std::sync::Arc;

use crate::config::parse_flag;
use crate::database::Database;
use crate::lang::Language;
use crate::update;

/// Configuration and localization values a page needs while rendering.
pub trait ConfigLookup: Send + Sync {
    /// Configuration flag `name`; missing keys are `false`.
    fn config_flag(&self, name: &str) -> bool;

    /// Label `key` of `section` in the active language.
    fn localized(&self, section: &str, key: &str) -> String;

    /// Whether a newer release than the running one is known.
    fn is_update_available(&self) -> bool;
}

/// Lookup backed by the data file, the active language and the embedded
/// English catalog.
#[derive(Clone)]
pub struct Settings {
    db: Arc<Database>,
    language: Arc<Language>,
    fallback: Arc<Language>,
}

impl Settings {
    pub fn new(db: Arc<Database>, language: Arc<Language>) -> Self {
        Self {
            db,
            language,
            fallback: Arc::new(Language::english()),
        }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn language(&self) -> &Language {
        &self.language
    }
}

impl ConfigLookup for Settings {
    fn config_flag(&self, name: &str) -> bool {
        self.db.get(name).map(|v| parse_flag(&v)).unwrap_or(false)
    }

    fn localized(&self, section: &str, key: &str) -> String {
        if let Some(s) = self.language.get(section, key) {
            return s.to_string();
        }
        if let Some(s) = self.fallback.get(section, key) {
            return s.to_string();
        }
        tracing::debug!(section, key, language = self.language.code(), "Missing label");
        key.to_string()
    }

    fn is_update_available(&self) -> bool {
        update::is_update_available(&self.db)
    }
}
