#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use psm::config::parse_repo;
use psm::database::{default_settings, Database};
use psm::lang::Language;
use psm::lookup::ConfigLookup;
use psm::module::ModuleContext;
use psm::state::AppState;
use psm::update::{GitHubClient, UpdateChecker};

/// Nothing listens on the discard port, so requests fail fast.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:9";

pub fn template_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Lookup that echoes `section.key` for every label.
#[derive(Default)]
pub struct FakeLookup {
    pub flags: HashMap<String, bool>,
    pub update_available: bool,
}

impl FakeLookup {
    pub fn with_flag(mut self, name: &str, value: bool) -> Self {
        self.flags.insert(name.to_string(), value);
        self
    }

    pub fn with_update(mut self, available: bool) -> Self {
        self.update_available = available;
        self
    }
}

impl ConfigLookup for FakeLookup {
    fn config_flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    fn localized(&self, section: &str, key: &str) -> String {
        format!("{}.{}", section, key)
    }

    fn is_update_available(&self) -> bool {
        self.update_available
    }
}

pub fn context(lookup: FakeLookup, mode: &str) -> ModuleContext {
    ModuleContext {
        db: Some(Arc::new(Database::in_memory(BTreeMap::new()))),
        lookup: Arc::new(lookup),
        template_dir: template_dir(),
        mode: mode.to_string(),
    }
}

pub fn checker(api_base: &str) -> UpdateChecker {
    let (owner, name) = parse_repo("phpservermon/phpservermon").unwrap();
    UpdateChecker::new(GitHubClient::with_api_base(api_base, owner, name).unwrap(), 7)
}

/// State over an in-memory database holding the defaults plus `overrides`.
pub fn app_state(overrides: &[(&str, &str)], api_base: &str) -> AppState {
    let mut values = default_settings();
    for (k, v) in overrides {
        values.insert(k.to_string(), v.to_string());
    }
    AppState::new(
        Arc::new(Database::in_memory(values)),
        Language::english(),
        checker(api_base),
        template_dir(),
        static_dir(),
    )
}

/// Serve `tag` as the latest release of any repository on a local port.
pub async fn spawn_release_server(tag: &'static str) -> String {
    use axum::{routing::get, Json, Router};

    let app = Router::new().route(
        "/repos/:owner/:repo/releases/latest",
        get(move || async move { Json(serde_json::json!({ "tag_name": tag, "draft": false })) }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
