//! Configuration profiles
//!
//! Stores named connection profiles in `~/.config/dash0/config.yaml` and
//! resolves the connection used for a command. Each field is taken from the
//! first source that sets it: environment, then command-line flags, then the
//! selected profile.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ApiError, Result};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "DASH0_CONFIG_DIR";

pub const API_URL_ENV: &str = "DASH0_API_URL";
pub const AUTH_TOKEN_ENV: &str = "DASH0_AUTH_TOKEN";
pub const DATASET_ENV: &str = "DASH0_DATASET";

/// Dataset name that means "no dataset parameter"
pub const DEFAULT_DATASET: &str = "default";

/// Configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_profile: Option<String>,

    #[serde(default)]
    pub profiles: Vec<Profile>,
}

fn default_api_version() -> String {
    "dash0.com/v1".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            active_profile: None,
            profiles: Vec::new(),
        }
    }
}

impl CliConfig {
    /// Load configuration from default location
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to default location
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save to a specific path; the file holds tokens, so it is owner-only on Unix
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut options = std::fs::OpenOptions::new();
            options.write(true).create(true).truncate(true).mode(0o600);
            std::io::Write::write_all(&mut options.open(path)?, content.as_bytes())?;
            Ok(())
        }

        #[cfg(not(unix))]
        {
            std::fs::write(path, content)?;
            Ok(())
        }
    }

    /// Get default configuration path
    pub fn default_path() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir).join("config.yaml"));
        }
        let config_dir = dirs::config_dir().ok_or_else(|| ApiError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("dash0").join("config.yaml"))
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// The profile `activeProfile` points at
    pub fn active(&self) -> Option<&Profile> {
        self.active_profile.as_deref().and_then(|name| self.get(name))
    }

    /// Add a profile; the first profile added becomes active
    pub fn add(&mut self, profile: Profile) -> Result<()> {
        if self.get(&profile.name).is_some() {
            return Err(ApiError::ProfileAlreadyExists {
                name: profile.name.clone(),
            });
        }
        if self.active_profile.is_none() {
            self.active_profile = Some(profile.name.clone());
        }
        self.profiles.push(profile);
        Ok(())
    }

    /// Remove a profile by name
    pub fn remove(&mut self, name: &str) -> Result<Profile> {
        let idx = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ApiError::ProfileNotFound {
                name: name.to_string(),
            })?;
        if self.active_profile.as_deref() == Some(name) {
            self.active_profile = None;
        }
        Ok(self.profiles.remove(idx))
    }

    /// Make a profile the active one
    pub fn select(&mut self, name: &str) -> Result<()> {
        if self.get(name).is_none() {
            return Err(ApiError::ProfileNotFound {
                name: name.to_string(),
            });
        }
        self.active_profile = Some(name.to_string());
        Ok(())
    }
}

/// A named connection profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
}

/// Connection settings given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConnectionFlags {
    pub api_url: Option<String>,
    pub auth_token: Option<String>,
    pub dataset: Option<String>,
    /// Profile to use instead of the active one
    pub profile: Option<String>,
}

/// Fully resolved connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub api_url: String,
    pub auth_token: String,
    /// `None` targets the default dataset
    pub dataset: Option<String>,
}

impl Connection {
    /// Resolve from the process environment, flags and configuration
    pub fn resolve(config: &CliConfig, flags: &ConnectionFlags) -> Result<Self> {
        Self::resolve_with(config, flags, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup
    pub fn resolve_with<F>(config: &CliConfig, flags: &ConnectionFlags, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = match &flags.profile {
            Some(name) => Some(config.get(name).ok_or_else(|| ApiError::ProfileNotFound {
                name: name.clone(),
            })?),
            None => config.active(),
        };

        let pick = |key: &str, flag: &Option<String>, from_profile: Option<&String>| {
            env(key)
                .filter(|v| !v.is_empty())
                .or_else(|| flag.clone())
                .or_else(|| from_profile.cloned())
        };

        let api_url = pick(
            API_URL_ENV,
            &flags.api_url,
            profile.and_then(|p| p.api_url.as_ref()),
        )
        .ok_or_else(|| ApiError::InvalidConfig {
            message: format!(
                "no API URL configured; set {} or --api-url, or create a profile",
                API_URL_ENV
            ),
        })?;

        let auth_token = pick(
            AUTH_TOKEN_ENV,
            &flags.auth_token,
            profile.and_then(|p| p.auth_token.as_ref()),
        )
        .ok_or_else(|| ApiError::InvalidConfig {
            message: format!(
                "no auth token configured; set {} or --auth-token, or create a profile",
                AUTH_TOKEN_ENV
            ),
        })?;

        let dataset = pick(
            DATASET_ENV,
            &flags.dataset,
            profile.and_then(|p| p.dataset.as_ref()),
        )
        .filter(|d| !d.is_empty() && d != DEFAULT_DATASET);

        Ok(Self {
            api_url,
            auth_token,
            dataset,
        })
    }

    /// Auth token with all but the last four characters hidden
    pub fn masked_token(&self) -> String {
        let visible: String = self
            .auth_token
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{}", visible)
    }
}
