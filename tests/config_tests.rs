use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use psm::config;

// Tests in this file share the process environment.
static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[test]
fn test_parse_repo() {
    assert_eq!(
        config::parse_repo("phpservermon/phpservermon"),
        Some(("phpservermon".to_string(), "phpservermon".to_string()))
    );
    assert_eq!(
        config::parse_repo(" /owner/name/ "),
        Some(("owner".to_string(), "name".to_string()))
    );
}

#[test]
fn test_parse_repo_rejects_malformed() {
    assert_eq!(config::parse_repo(""), None);
    assert_eq!(config::parse_repo("owner"), None);
    assert_eq!(config::parse_repo("owner/"), None);
    assert_eq!(config::parse_repo("a/b/c"), None);
}

#[test]
fn test_parse_flag() {
    for raw in ["1", "true", "TRUE", " yes ", "on"] {
        assert!(config::parse_flag(raw), "{:?} should be on", raw);
    }
    for raw in ["0", "false", "", "off", "2"] {
        assert!(!config::parse_flag(raw), "{:?} should be off", raw);
    }
}

#[test]
fn test_get_port_uses_default_on_garbage() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    env::set_var("PSM_PORT", "not-a-port");
    assert_eq!(config::get_port(), config::DEFAULT_PORT);

    env::set_var("PSM_PORT", "9090");
    assert_eq!(config::get_port(), 9090);

    env::remove_var("PSM_PORT");
}

#[test]
fn test_get_template_dir() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    env::remove_var("PSM_TEMPLATE_DIR");
    assert_eq!(config::get_template_dir(), PathBuf::from("templates"));

    env::set_var("PSM_TEMPLATE_DIR", "  /srv/psm/templates ");
    assert_eq!(config::get_template_dir(), PathBuf::from("/srv/psm/templates"));

    env::set_var("PSM_TEMPLATE_DIR", "   ");
    assert_eq!(config::get_template_dir(), PathBuf::from("templates"));

    env::remove_var("PSM_TEMPLATE_DIR");
}

#[test]
fn test_get_update_interval_days() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    env::set_var("PSM_UPDATE_INTERVAL_DAYS", "0");
    assert_eq!(config::get_update_interval_days(), config::DEFAULT_UPDATE_INTERVAL_DAYS);

    env::set_var("PSM_UPDATE_INTERVAL_DAYS", "30");
    assert_eq!(config::get_update_interval_days(), 30);

    env::set_var("PSM_UPDATE_INTERVAL_DAYS", "36500");
    assert_eq!(config::get_update_interval_days(), config::MAX_UPDATE_INTERVAL_DAYS);

    env::remove_var("PSM_UPDATE_INTERVAL_DAYS");
}

#[test]
fn test_oversized_update_interval_uses_default() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    env::set_var("PSM_UPDATE_INTERVAL_DAYS", "200000000000000");
    let days = config::get_update_interval_days();
    env::remove_var("PSM_UPDATE_INTERVAL_DAYS");

    assert_eq!(days, config::DEFAULT_UPDATE_INTERVAL_DAYS);
    // The value feeds the checker at startup; it must not panic there.
    let client = psm::update::GitHubClient::new("o".into(), "r".into()).unwrap();
    psm::update::UpdateChecker::new(client, days);
}

#[test]
fn test_get_update_repo_falls_back() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    env::set_var("PSM_UPDATE_REPO", "nonsense");
    assert_eq!(
        config::get_update_repo(),
        ("phpservermon".to_string(), "phpservermon".to_string())
    );

    env::set_var("PSM_UPDATE_REPO", "me/fork");
    assert_eq!(config::get_update_repo(), ("me".to_string(), "fork".to_string()));

    env::remove_var("PSM_UPDATE_REPO");
}
