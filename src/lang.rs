//! Localized label catalogs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::DEFAULT_LANGUAGE;

/// English catalog compiled into the binary; used when a key is missing from
/// the active language or no language file could be read.
const EMBEDDED_ENGLISH: &str = include_str!("../lang/en_US.json");

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("Invalid language code: {0:?}")]
    InvalidCode(String),

    #[error("Failed to read language file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Language file {0} is malformed: {1}")]
    Json(String, #[source] serde_json::Error),
}

#[derive(Debug, Clone, Default)]
pub struct Language {
    code: String,
    sections: HashMap<String, HashMap<String, String>>,
}

impl Language {
    /// Loads `<dir>/<code>.json`.
    pub fn load(dir: impl AsRef<Path>, code: &str) -> Result<Self, LanguageError> {
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(LanguageError::InvalidCode(code.to_string()));
        }
        let path = dir.as_ref().join(format!("{}.json", code));
        let text = std::fs::read_to_string(&path)
            .map_err(|source| LanguageError::Io { path, source })?;
        Self::from_json(code, &text)
    }

    pub fn from_json(code: &str, text: &str) -> Result<Self, LanguageError> {
        let sections = serde_json::from_str(text)
            .map_err(|e| LanguageError::Json(code.to_string(), e))?;
        Ok(Self {
            code: code.to_string(),
            sections,
        })
    }

    pub fn english() -> Self {
        Self::from_json(DEFAULT_LANGUAGE, EMBEDDED_ENGLISH).unwrap_or_else(|e| {
            tracing::error!(%e, "Embedded English catalog could not be parsed");
            Self {
                code: DEFAULT_LANGUAGE.to_string(),
                sections: HashMap::new(),
            }
        })
    }

    /// Loads the requested language, falling back to the embedded English
    /// catalog when the file is missing or broken.
    pub fn load_or_english(dir: impl AsRef<Path>, code: &str) -> Self {
        match Self::load(dir, code) {
            Ok(lang) => lang,
            Err(e) => {
                tracing::warn!(%e, code, "Falling back to English");
                Self::english()
            }
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
    }
}
