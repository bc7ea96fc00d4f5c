//! Configuration types for hljs-mcp.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::Error;

/// Server configuration loaded from YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Server settings
    pub server: ServerSettings,
    /// Engine settings
    pub engine: EngineSettings,
}

impl ServerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: ServerConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.request_timeout_ms == 0 {
            return Err(Error::Config(
                "server.request_timeout_ms must be > 0".to_string(),
            ));
        }

        self.engine.validate()
    }
}

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Deadline for one highlight request in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

/// What the engine loader does after a failed initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadFailurePolicy {
    /// Re-attempt initialization on every acquire until one succeeds
    #[default]
    Retry,
    /// Remember the first failure and stop attempting
    FailFast,
}

/// Engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Directory holding the engine payload
    pub resource_dir: PathBuf,
    /// Logical name of the payload
    pub resource_name: String,
    /// Payload extension
    pub resource_extension: String,
    /// Global object the payload must expose
    pub entry_point: String,
    /// Behaviour after a failed initialization
    pub load_failure: LoadFailurePolicy,
    /// Interpreter heap limit in bytes (unset = unlimited)
    pub memory_limit_bytes: Option<usize>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            resource_dir: PathBuf::from("resources"),
            resource_name: "highlight.min".to_string(),
            resource_extension: "js".to_string(),
            entry_point: "hljs".to_string(),
            load_failure: LoadFailurePolicy::Retry,
            memory_limit_bytes: None,
        }
    }
}

impl EngineSettings {
    /// Validate the engine settings.
    pub fn validate(&self) -> crate::Result<()> {
        let required = [
            ("engine.resource_name", &self.resource_name),
            ("engine.resource_extension", &self.resource_extension),
            ("engine.entry_point", &self.entry_point),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{field} cannot be empty")));
            }
        }

        if self.memory_limit_bytes == Some(0) {
            return Err(Error::Config(
                "engine.memory_limit_bytes must be > 0 when set".to_string(),
            ));
        }

        Ok(())
    }

    /// Full path of the payload on disk.
    pub fn resource_path(&self) -> PathBuf {
        self.resource_dir
            .join(format!("{}.{}", self.resource_name, self.resource_extension))
    }
}
