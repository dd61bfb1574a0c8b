//! Configuration Management
//!
//! Credentials and the API endpoint come from, in order of precedence,
//! command-line flags, the environment, and a JSON file under the user's
//! config directory.

use crate::api::{Credentials, DEFAULT_API_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const USERNAME_ENV: &str = "OKTAWAVE_USERNAME";
pub const PASSWORD_ENV: &str = "OKTAWAVE_PASSWORD";

/// Stored configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Oktawave account user name
    #[serde(default)]
    pub username: Option<String>,
    /// Oktawave account password
    #[serde(default)]
    pub password: Option<String>,
    /// API root, production when unset
    #[serde(default)]
    pub api_url: Option<String>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_url: Option<String>,
}

impl Config {
    /// Default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("oktawave").join("config.json"))
    }

    /// Load configuration from `path`, or the default location.
    ///
    /// A missing default file yields an empty config; an explicitly given
    /// file must exist and parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::read(path);
        }

        match Self::config_path() {
            Some(path) if path.exists() => Self::read(&path),
            _ => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Save configuration to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Apply environment variables, which win over file values
    pub fn with_env(mut self) -> Self {
        self.apply_env(|key| std::env::var(key).ok());
        self
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(username) = lookup(USERNAME_ENV).filter(|v| !v.is_empty()) {
            self.username = Some(username);
        }
        if let Some(password) = lookup(PASSWORD_ENV).filter(|v| !v.is_empty()) {
            self.password = Some(password);
        }
    }

    /// Apply command-line values, which win over everything else
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if overrides.username.is_some() {
            self.username = overrides.username;
        }
        if overrides.password.is_some() {
            self.password = overrides.password;
        }
        if overrides.api_url.is_some() {
            self.api_url = overrides.api_url;
        }
        self
    }

    /// Get effective API root (CLI > config > production)
    pub fn effective_api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Credentials, or an error naming what is missing
    pub fn credentials(&self) -> Result<Credentials> {
        let username = self
            .username
            .clone()
            .with_context(|| format!("No username configured. Use --username or set {}", USERNAME_ENV))?;
        let password = self
            .password
            .clone()
            .with_context(|| format!("No password configured. Use --password or set {}", PASSWORD_ENV))?;
        Ok(Credentials { username, password })
    }
}
