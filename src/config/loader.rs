use super::Config;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Load `~/.vidlytics/config.toml`, writing defaults on first run, then
    /// apply environment overrides.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let vidlytics_dir = home.join(".vidlytics");
        let config_path = vidlytics_dir.join("config.toml");

        if !vidlytics_dir.exists() {
            fs::create_dir_all(&vidlytics_dir).context("Failed to create .vidlytics directory")?;
        }

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let mut config = Self {
                config_path,
                ..Self::default()
            };
            config.save()?;
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load an explicit config file and apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .map_err(|err| ConfigError::Load(err.to_string()))
            .context("Failed to parse config file")?;
        config.config_path = path.to_path_buf();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Persist everything except the API key, which stays out of the file
    /// unless the user put it there.
    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Validation(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(ConfigError::Validation(
                "max_output_tokens must be greater than 0".into(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Validation("model must not be empty".into()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "log_level must be one of {}, got {}",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }
        Ok(())
    }
}
