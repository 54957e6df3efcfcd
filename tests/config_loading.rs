//! Configuration loading integration tests
//!
//! Covers BANKING_CONFIG support and configuration precedence.

use banking_error_handler::config::ConfigLoader;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Environment variables are process-wide
static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

const ENV_VARS: &[&str] = &[
    "BANKING_CONFIG",
    "BANKING_SERVER_HOST",
    "BANKING_SERVER_PORT",
    "BANKING_ADMIN_URL",
    "BANKING_ADMIN_API_KEY",
    "BANKING_ADMIN_API_SECRET",
    "BANKING_STORE_PATH",
    "LOG_LEVEL",
    "VERBOSE",
];

/// Clears the banking variables and restores them on drop
struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn new() -> Self {
        let saved = ENV_VARS
            .iter()
            .map(|name| (*name, std::env::var(name).ok()))
            .collect();
        for name in ENV_VARS {
            unsafe {
                std::env::remove_var(name);
            }
        }
        Self { saved }
    }

    fn set(&self, name: &str, value: &str) {
        unsafe {
            std::env::set_var(name, value);
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            unsafe {
                match value {
                    Some(value) => std::env::set_var(name, value),
                    None => std::env::remove_var(name),
                }
            }
        }
    }
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_banking_config_env_var_loading() {
    let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env = EnvGuard::new();

    let file = config_file(
        r#"
[server]
host = "0.0.0.0"
port = 9999

[messages]
retry = "Bitte erneut versuchen."
"#,
    );
    env.set("BANKING_CONFIG", file.path().to_str().unwrap());

    let config_path = ConfigLoader::get_config_path();
    assert_eq!(config_path.as_deref(), Some(file.path()));

    let settings = ConfigLoader::new().load(config_path.as_deref()).unwrap();
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 9999);
    assert_eq!(settings.messages.retry, "Bitte erneut versuchen.");
    // untouched sections keep their defaults
    assert_eq!(settings.messages.title, "Banking Error");
}

#[test]
fn test_env_overrides_config_file() {
    let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env = EnvGuard::new();

    let file = config_file(
        r#"
[server]
port = 9999

[admin]
base_url = "http://file.local"
"#,
    );
    env.set("BANKING_SERVER_PORT", "7000");
    env.set("BANKING_ADMIN_URL", "http://env.local:8000");
    env.set("BANKING_ADMIN_API_KEY", "key");
    env.set("BANKING_ADMIN_API_SECRET", "secret");

    let settings = ConfigLoader::new().load(Some(file.path())).unwrap();
    assert_eq!(settings.server.port, 7000);
    assert_eq!(settings.admin.base_url, "http://env.local:8000");
    assert_eq!(settings.admin.api_key.as_deref(), Some("key"));
    assert_eq!(settings.admin.api_secret.as_deref(), Some("secret"));
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let _env = EnvGuard::new();

    let settings = ConfigLoader::new()
        .load(Some(std::path::Path::new("/nonexistent/config.toml")))
        .unwrap();
    assert_eq!(settings.server.port, 8417);
    assert!(settings.storage.path.is_none());
}

#[test]
fn test_invalid_config_is_rejected() {
    let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let _env = EnvGuard::new();

    let broken = config_file("invalid toml content [[[");
    assert!(ConfigLoader::new().load(Some(broken.path())).is_err());

    let half_credentials = config_file(
        r#"
[admin]
api_key = "key"
"#,
    );
    assert!(ConfigLoader::new().load(Some(half_credentials.path())).is_err());
}

#[test]
fn test_store_path_from_env() {
    let _lock = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env = EnvGuard::new();
    env.set("BANKING_STORE_PATH", "/var/lib/banking/store.json");

    let settings = ConfigLoader::new().load(None).unwrap();
    assert_eq!(
        settings.storage.path.as_deref(),
        Some(std::path::Path::new("/var/lib/banking/store.json"))
    );
}
