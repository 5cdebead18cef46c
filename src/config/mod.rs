use crate::utils::{DEFAULT_BRANCH, DEFAULT_REQUEST_TIMEOUT_SECS};
use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tracing::Level;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Config field {0} is missing or empty")]
    MissingField(&'static str),

    #[error("Config field {field} is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Backup configuration, as stored in `backupUtil.cfg`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackupConfig {
    #[serde(rename = "GiteaURL", default)]
    pub gitea_url: String,
    #[serde(rename = "GiteaToken", default)]
    pub gitea_token: String,
    #[serde(rename = "RepoOwner", default)]
    pub repo_owner: String,
    #[serde(rename = "RepoName", default)]
    pub repo_name: String,
    #[serde(rename = "BackupFolder", default)]
    pub backup_folder: PathBuf,
    /// File inside the backup folder holding the commit message; never uploaded
    #[serde(rename = "GitLogFile", default)]
    pub git_log_file: String,
    #[serde(rename = "LogLevel", default)]
    pub log_level: String,
    #[serde(rename = "Branch", default = "default_branch")]
    pub branch: String,
    #[serde(rename = "RequestTimeoutSecs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl BackupConfig {
    /// Check that every required field is present and well-formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("GiteaURL", &self.gitea_url)?;
        require("GiteaToken", &self.gitea_token)?;
        require("RepoOwner", &self.repo_owner)?;
        require("RepoName", &self.repo_name)?;
        if self.backup_folder.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("BackupFolder"));
        }
        require("GitLogFile", &self.git_log_file)?;
        require("Branch", &self.branch)?;

        if self.git_log_file.contains(['/', '\\']) {
            return Err(ConfigError::InvalidField {
                field: "GitLogFile",
                reason: "must be a plain file name".to_string(),
            });
        }

        self.base_url()?;
        self.level()?;

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidField {
                field: "RequestTimeoutSecs",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Parse `GiteaURL`, accepting only http and https
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(self.gitea_url.trim()).map_err(|e| ConfigError::InvalidField {
            field: "GiteaURL",
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidField {
                field: "GiteaURL",
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    /// Log level from `LogLevel`; empty means INFO.
    pub fn level(&self) -> Result<Level, ConfigError> {
        parse_level(&self.log_level)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Parse a log level name, case-insensitively
pub fn parse_level(value: &str) -> Result<Level, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "info" => Ok(Level::INFO),
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(ConfigError::InvalidField {
            field: "LogLevel",
            reason: format!("unknown level '{other}'"),
        }),
    }
}

/// Parse configuration from YAML text without validating it
pub fn parse_config(content: &str) -> Result<BackupConfig, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Read and validate the configuration file
pub async fn read_config(config_path: &Path) -> Result<BackupConfig, ConfigError> {
    let content = fs::read_to_string(config_path)
        .await
        .map_err(|source| ConfigError::IoError {
            path: config_path.to_path_buf(),
            source,
        })?;

    let config = parse_config(&content)?;
    config.validate()?;
    Ok(config)
}
