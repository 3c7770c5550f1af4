use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const API_URL_ENV: &str = "ACTIVITY_DESK_API_URL";
pub const TOKEN_ENV: &str = "ACTIVITY_DESK_TOKEN";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Config {
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Config {
            api_url: normalize_api_url(api_url)?,
            token: None,
        })
    }

    pub fn get_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "activitydesk", "activity-desk")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path().ok_or(ConfigError::NoConfigDirectory)?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::ApiUrlNotFound);
        }

        let config_data = fs::read_to_string(config_path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_json::from_str(&config_data)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Load the saved config, then apply environment overrides.
    ///
    /// With no config file, `ACTIVITY_DESK_API_URL` alone is enough.
    pub fn load_with_env() -> Result<Self, ConfigError> {
        let env_url = std::env::var(API_URL_ENV).ok().filter(|v| !v.trim().is_empty());
        let env_token = std::env::var(TOKEN_ENV).ok().filter(|v| !v.trim().is_empty());

        let mut config = match (Self::load(), env_url.as_deref()) {
            (Ok(config), _) => config,
            (Err(ConfigError::ApiUrlNotFound), Some(url)) => Self::new(url)?,
            (Err(e), _) => return Err(e),
        };
        config.apply_overrides(env_url.as_deref(), env_token)?;
        Ok(config)
    }

    pub fn apply_overrides(
        &mut self,
        api_url: Option<&str>,
        token: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = api_url {
            self.api_url = normalize_api_url(url)?;
        }
        if let Some(token) = token {
            self.token = Some(token.trim().to_string());
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::get_config_path().ok_or(ConfigError::NoConfigDirectory)?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config_data = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, config_data)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write config file: {}", e)))?;

        tracing::debug!(path = %config_path.display(), "Saved configuration");
        Ok(())
    }

    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.token.as_deref().ok_or(ConfigError::TokenNotFound)
    }

    pub fn prompt_for_api_url() -> io::Result<String> {
        println!("Please enter the base URL of the activity API:");
        println!("Example: http://localhost:8080");

        let mut api_url = String::new();
        io::stdin().read_line(&mut api_url)?;
        Ok(api_url.trim().to_string())
    }
}

/// Trim whitespace and trailing slashes, and require an http(s) scheme.
pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::ApiUrlNotFound);
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidApiUrl(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}
