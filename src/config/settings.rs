//! Configuration settings
//!
//! Settings are loaded from a TOML file and environment variables. Every
//! section has serde defaults, so a partial file is always valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

// Helper functions for serde defaults
fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_true() -> bool {
    true
}

fn default_max_body_size() -> usize {
    64 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_admin_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_end_session_path() -> String {
    "/api/method/banking_admin.api.end_session".to_string()
}

fn default_error_log_capacity() -> usize {
    200
}

fn default_title() -> String {
    "Banking Error".to_string()
}

fn default_retry() -> String {
    "Something went wrong. Please retry in a while.".to_string()
}

fn default_invalid_credentials() -> String {
    "Authentication error due to invalid credentials.".to_string()
}

fn default_invalid_access() -> String {
    "Authorization error due to invalid access.".to_string()
}

fn default_server_error() -> String {
    "The server has errored. Please retry in some time.".to_string()
}

fn default_failure_lead_in() -> String {
    "Banking Action has failed due to the following error(s):".to_string()
}

fn default_consent_instruction() -> String {
    "Please go to Banking Settings and click on {action}.".to_string()
}

fn default_consent_action() -> String {
    "Link Bank and Accounts".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8417
}

// Duration serialization module
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Main configuration settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Admin app connection
    #[serde(default)]
    pub admin: AdminSettings,
    /// Account and session storage
    #[serde(default)]
    pub storage: StorageSettings,
    /// User-facing messages
    #[serde(default)]
    pub messages: MessageSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
    /// Maximum request body size
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

/// Connection to the banking admin app
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminSettings {
    /// Base URL of the admin app
    #[serde(default = "default_admin_url")]
    pub base_url: String,
    /// Path of the end-session method
    #[serde(default = "default_end_session_path")]
    pub end_session_path: String,
    /// API key for token authentication
    #[serde(default)]
    pub api_key: Option<String>,
    /// API secret for token authentication
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs", default = "default_timeout")]
    pub request_timeout: Duration,
}

impl fmt::Debug for AdminSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("AdminSettings")
            .field("base_url", &self.base_url)
            .field("end_session_path", &self.end_session_path)
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Account and session storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// JSON file backing the store; in-memory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Number of error log entries kept in memory
    #[serde(default = "default_error_log_capacity")]
    pub error_log_capacity: usize,
}

/// User-facing messages
///
/// Defaults are the English texts shown by the banking integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSettings {
    /// Title of every banking error
    #[serde(default = "default_title")]
    pub title: String,
    /// Generic retry message
    #[serde(default = "default_retry")]
    pub retry: String,
    /// Shown on 401
    #[serde(default = "default_invalid_credentials")]
    pub invalid_credentials: String,
    /// Shown on 403 without a textual message
    #[serde(default = "default_invalid_access")]
    pub invalid_access: String,
    /// Shown when the admin app crashed without an exception text
    #[serde(default = "default_server_error")]
    pub server_error: String,
    /// Lead-in above the list of multiple errors
    #[serde(default = "default_failure_lead_in")]
    pub failure_lead_in: String,
    /// Consent hint; `{action}` is replaced by the bold action label
    #[serde(default = "default_consent_instruction")]
    pub consent_instruction: String,
    /// Label of the settings action that grants consent
    #[serde(default = "default_consent_action")]
    pub consent_action: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_true(),
            max_body_size: default_max_body_size(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            verbose: false,
        }
    }
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            base_url: default_admin_url(),
            end_session_path: default_end_session_path(),
            api_key: None,
            api_secret: None,
            request_timeout: default_timeout(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: None,
            error_log_capacity: default_error_log_capacity(),
        }
    }
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            retry: default_retry(),
            invalid_credentials: default_invalid_credentials(),
            invalid_access: default_invalid_access(),
            server_error: default_server_error(),
            failure_lead_in: default_failure_lead_in(),
            consent_instruction: default_consent_instruction(),
            consent_action: default_consent_action(),
        }
    }
}

impl MessageSettings {
    /// Consent hint with the action label in bold
    pub fn consent_hint(&self) -> String {
        self.consent_instruction.replace(
            "{action}",
            &format!("<strong>{}</strong>", self.consent_action),
        )
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut settings = Self::default();

        if let Ok(host) = std::env::var("BANKING_SERVER_HOST") {
            settings.server.host = host;
        }

        if let Ok(port) = std::env::var("BANKING_SERVER_PORT") {
            settings.server.port = port
                .parse()
                .map_err(|e| crate::Error::config("port", &format!("Invalid port: {}", e)))?;
        }

        if let Ok(url) = std::env::var("BANKING_ADMIN_URL") {
            settings.admin.base_url = url;
        }
        settings.admin.api_key = std::env::var("BANKING_ADMIN_API_KEY").ok();
        settings.admin.api_secret = std::env::var("BANKING_ADMIN_API_SECRET").ok();

        settings.storage.path = std::env::var("BANKING_STORE_PATH").ok().map(PathBuf::from);

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            settings.logging.level = level;
        }

        if let Ok(verbose) = std::env::var("VERBOSE") {
            settings.logging.verbose = verbose.parse().unwrap_or(false);
        }

        Ok(settings)
    }

    /// Load settings from configuration file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config("file", &format!("Failed to read config file: {}", e))
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| {
            crate::Error::config("file", &format!("Failed to parse config file: {}", e))
        })?;

        Ok(settings)
    }

    /// Merge settings with environment variable overrides
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        let env_settings = Self::from_env()?;
        let defaults = Self::default();

        // Merge only non-default values from environment
        if env_settings.server.host != defaults.server.host {
            self.server.host = env_settings.server.host;
        }
        if env_settings.server.port != defaults.server.port {
            self.server.port = env_settings.server.port;
        }
        if env_settings.admin.base_url != defaults.admin.base_url {
            self.admin.base_url = env_settings.admin.base_url;
        }
        if env_settings.logging.level != defaults.logging.level {
            self.logging.level = env_settings.logging.level;
        }
        if env_settings.logging.verbose {
            self.logging.verbose = true;
        }

        // Credentials and store path always override if present
        if env_settings.admin.api_key.is_some() {
            self.admin.api_key = env_settings.admin.api_key;
        }
        if env_settings.admin.api_secret.is_some() {
            self.admin.api_secret = env_settings.admin.api_secret;
        }
        if env_settings.storage.path.is_some() {
            self.storage.path = env_settings.storage.path;
        }

        Ok(self)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.port == 0 {
            return Err(crate::Error::config(
                "port",
                "Invalid server port: cannot be 0",
            ));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(crate::Error::config(
                    "log_level",
                    &format!("Invalid log level: {}", self.logging.level),
                ));
            }
        }

        if let Err(e) = url::Url::parse(&self.admin.base_url) {
            return Err(crate::Error::config(
                "admin.base_url",
                &format!("Invalid admin URL '{}': {}", self.admin.base_url, e),
            ));
        }

        if self.admin.api_key.is_some() != self.admin.api_secret.is_some() {
            return Err(crate::Error::config(
                "admin",
                "api_key and api_secret must be set together",
            ));
        }

        if self.storage.error_log_capacity == 0 {
            return Err(crate::Error::config(
                "storage.error_log_capacity",
                "Error log capacity cannot be 0",
            ));
        }

        Ok(())
    }
}

// Serializes tests that touch process environment variables
#[cfg(test)]
pub(crate) static ENV_TEST_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
