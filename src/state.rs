use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{self, DEFAULT_LANGUAGE};
use crate::database::{Database, DatabaseError};
use crate::lang::Language;
use crate::lookup::{ConfigLookup, Settings};
use crate::module::ModuleContext;
use crate::update::{UpdateChecker, UpdateError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Update(#[from] UpdateError),
}

/// Process-wide handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub settings: Arc<Settings>,
    pub updates: Arc<UpdateChecker>,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        language: Language,
        updates: UpdateChecker,
        template_dir: PathBuf,
        static_dir: PathBuf,
    ) -> Self {
        let settings = Settings::new(Arc::clone(&db), Arc::new(language));
        Self {
            db,
            settings: Arc::new(settings),
            updates: Arc::new(updates),
            template_dir,
            static_dir,
        }
    }

    /// Open the data file and language named by the environment.
    pub fn from_env() -> Result<Self, StartupError> {
        let db = Arc::new(Database::open(config::get_data_file())?);
        let code = db
            .get("language")
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let language = Language::load_or_english(config::get_lang_dir(), &code);
        tracing::info!(language = language.code(), data = %db.path().display(), "Loaded settings");

        Ok(Self::new(
            db,
            language,
            UpdateChecker::from_env()?,
            config::get_template_dir(),
            config::get_static_dir(),
        ))
    }

    pub fn lookup(&self) -> Arc<dyn ConfigLookup> {
        self.settings.clone()
    }

    /// Context for a module page of type `mode`.
    pub fn module_context(&self, mode: &str) -> ModuleContext {
        ModuleContext {
            db: Some(Arc::clone(&self.db)),
            lookup: self.lookup(),
            template_dir: self.template_dir.clone(),
            mode: mode.to_string(),
        }
    }
}
