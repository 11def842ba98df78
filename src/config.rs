use std::env;
use std::path::{Path, PathBuf};

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";
pub const DEFAULT_LANG_DIR: &str = "lang";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_DATA_FILE: &str = "data/config.json";
pub const DEFAULT_LANGUAGE: &str = "en_US";
pub const DEFAULT_UPDATE_INTERVAL_DAYS: i64 = 7;
pub const MAX_UPDATE_INTERVAL_DAYS: i64 = 36_500;
pub const DEFAULT_UPDATE_REPO: &str = "phpservermon/phpservermon";

/// Module rendered when a request does not name one.
pub const DEFAULT_MODULE: &str = "config";

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_host() -> String {
    env::var("PSM_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string())
}

pub fn get_port() -> u16 {
    env::var("PSM_PORT")
        .ok()
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

pub fn get_template_dir() -> PathBuf {
    path_from_env("PSM_TEMPLATE_DIR", DEFAULT_TEMPLATE_DIR)
}

pub fn get_lang_dir() -> PathBuf {
    path_from_env("PSM_LANG_DIR", DEFAULT_LANG_DIR)
}

pub fn get_static_dir() -> PathBuf {
    path_from_env("PSM_STATIC_DIR", DEFAULT_STATIC_DIR)
}

pub fn get_data_file() -> PathBuf {
    path_from_env("PSM_DATA_FILE", DEFAULT_DATA_FILE)
}

pub fn get_update_interval_days() -> i64 {
    env::var("PSM_UPDATE_INTERVAL_DAYS")
        .ok()
        .and_then(|d| d.trim().parse::<i64>().ok())
        .filter(|d| (1..=MAX_UPDATE_INTERVAL_DAYS).contains(d))
        .unwrap_or(DEFAULT_UPDATE_INTERVAL_DAYS)
}

/// Returns the `(owner, name)` of the repository queried for releases.
pub fn get_update_repo() -> (String, String) {
    let raw = env::var("PSM_UPDATE_REPO").unwrap_or_default();
    parse_repo(&raw).unwrap_or_else(|| {
        parse_repo(DEFAULT_UPDATE_REPO).unwrap_or_default()
    })
}

pub fn parse_repo(raw: &str) -> Option<(String, String)> {
    let (owner, name) = raw.trim().trim_matches('/').split_once('/')?;
    let (owner, name) = (owner.trim(), name.trim());
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((owner.to_string(), name.to_string()))
}

/// Interprets a stored configuration value as a flag.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn path_from_env(key: &str, default: &str) -> PathBuf {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => PathBuf::from(default),
    }
}
