//! Configuration loading and validation
//!
//! TOML configuration with a `[login]` section (retry policy) and a
//! `[shell]` section (prompt cosmetics). Every field has a default so a
//! missing file or section degrades gracefully.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration file name looked up under the platform config directory.
pub const CONFIG_FILE_NAME: &str = "ttyshell.toml";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config from '{path}': {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid max login attempts: {0} (must be at least 1)")]
    InvalidMaxAttempts(u32),

    #[error("Prompt suffix must not be empty")]
    EmptyPromptSuffix,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Login retry policy.
    pub login: LoginConfig,

    /// Shell prompt settings.
    pub shell: ShellConfig,
}

/// Login-flow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    /// Failed attempts allowed before the flow gives up.
    pub max_attempts: u32,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Shell prompt settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Text appended to the current directory in the prompt.
    pub prompt_suffix: String,

    /// Optional banner printed once after login.
    pub greeting: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt_suffix: ">".to_string(),
            greeting: None,
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the platform config directory, falling back to defaults
    /// when no file exists there.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "loading configuration");
                Self::load(&path)
            }
            _ => {
                debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Platform location of the configuration file, if one is defined.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Check field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.login.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(self.login.max_attempts));
        }
        if self.shell.prompt_suffix.is_empty() {
            return Err(ConfigError::EmptyPromptSuffix);
        }
        Ok(())
    }
}
