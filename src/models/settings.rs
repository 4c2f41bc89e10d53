use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public demo API used when no endpoint is configured.
pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// Bundled dataset read when the remote endpoint is unavailable.
pub const DEFAULT_FALLBACK_PATH: &str = "data/users.json";

/// Runtime settings from `settings.yaml`, overridable via `USER_TABLE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Remote endpoint returning a JSON array of users
    pub api_url: String,

    /// Budget for the remote request before falling back, in milliseconds
    pub remote_timeout_ms: u64,

    /// Local JSON dataset used as the second tier
    pub fallback_path: Utf8PathBuf,

    /// Quiet period before a search input is committed, in milliseconds
    pub debounce_ms: u64,

    pub log_dir: String,

    pub debug_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            remote_timeout_ms: 8000,
            fallback_path: Utf8PathBuf::from(DEFAULT_FALLBACK_PATH),
            debounce_ms: 300,
            log_dir: "logs".to_string(),
            debug_mode: false,
        }
    }
}

impl Settings {
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
