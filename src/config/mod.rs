use crate::models::Settings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::collections::HashMap;
use std::fs;

/// Name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "settings.yaml";

/// Prefix for environment overrides, e.g. `USER_TABLE_API_URL`.
pub const ENV_PREFIX: &str = "USER_TABLE";

/// Configuration manager for loading and saving the YAML settings file.
///
/// Settings are layered, later sources winning:
/// 1. Built-in defaults ([`Settings::default`])
/// 2. `settings.yaml` in the config directory (optional)
/// 3. `USER_TABLE_*` environment variables
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join(SETTINGS_FILE),
            config_dir,
        })
    }

    /// Load settings from defaults, the settings file and the process environment.
    pub fn load_settings(&self) -> Result<Settings> {
        self.load_with_env(Environment::with_prefix(ENV_PREFIX))
    }

    /// Same as [`load_settings`](Self::load_settings), but environment overrides
    /// come from `vars` instead of the process environment.
    pub fn load_settings_with_vars(&self, vars: HashMap<String, String>) -> Result<Settings> {
        let vars: config::Map<String, String> = vars.into_iter().collect();
        self.load_with_env(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn load_with_env(&self, env: Environment) -> Result<Settings> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        let defaults =
            Config::try_from(&Settings::default()).context("Failed to build default settings")?;

        let settings: Settings = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(self.settings_path.as_std_path())
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .add_source(env.try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!(
            "Loaded settings: api_url={}, fallback={}",
            settings.api_url,
            settings.fallback_path
        );
        Ok(settings)
    }

    /// Save settings to the settings file.
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}
