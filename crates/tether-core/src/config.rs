use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tether_util::retry::RetryPolicy;

/// Global user configuration loaded from `~/.tether/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub system: SystemConfig,

    /// Remote repositories in priority order.
    #[serde(default, rename = "repository")]
    pub repositories: Vec<RepositoryConfig>,

    #[serde(default)]
    pub descriptor: DescriptorConfig,
}

/// The system-wide repository from `[system]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_system_dir")]
    pub dir: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            dir: default_system_dir(),
        }
    }
}

fn default_system_dir() -> String {
    "~/.tether/packages".to_string()
}

/// A named remote repository from `[[repository]]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub name: String,
    pub dir: String,
}

/// Descriptor read policy from `[descriptor]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptorConfig {
    #[serde(default = "default_read_retries", rename = "read-retries")]
    pub read_retries: u32,
    #[serde(default = "default_retry_wait_ms", rename = "retry-wait-ms")]
    pub retry_wait_ms: u64,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            read_retries: default_read_retries(),
            retry_wait_ms: default_retry_wait_ms(),
        }
    }
}

fn default_read_retries() -> u32 {
    5
}

fn default_retry_wait_ms() -> u64 {
    500
}

impl DescriptorConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.read_retries, Duration::from_millis(self.retry_wait_ms))
    }
}

impl GlobalConfig {
    /// Load the global configuration from `~/.tether/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load the configuration from `path`, or return defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if path.is_file() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                tether_util::errors::TetherError::Config {
                    message: format!("Failed to read {}: {e}", path.display()),
                }
            })?;
            Self::from_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse a configuration from a TOML string.
    pub fn from_str(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            tether_util::errors::TetherError::Config {
                message: format!("Failed to parse config: {e}"),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// The system repository directory with a leading `~` expanded.
    pub fn system_dir(&self) -> PathBuf {
        expand_home(&self.system.dir)
    }
}

/// Returns the path to the tether data directory (`~/.tether/`).
pub fn dirs_path() -> PathBuf {
    home_dir().join(".tether")
}

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None if path == "~" => home_dir(),
        None => PathBuf::from(path),
    }
}
