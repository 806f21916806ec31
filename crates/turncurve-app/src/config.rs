use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

use turncurve_core::BASIC_LANDS;

const DEFAULT_LISTEN: &str = "127.0.0.1:7717";
const DEFAULT_LOG_DIR: &str = "out";
const DEFAULT_PLOTS_DIR: &str = "out/plots";

/// Root viewer configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ViewerConfig {
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ViewerConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: ViewerConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.data.validate()?;
        self.server.validate()?;
        self.outputs.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Win-rate table location and exclusion list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DataConfig {
    pub path: PathBuf,
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl DataConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "data.path".to_string(),
                message: "win-rate table path must not be empty".to_string(),
            });
        }

        if self.exclude.iter().any(|name| name.trim().is_empty()) {
            return Err(ValidationError::InvalidField {
                field: "data.exclude".to_string(),
                message: "excluded card names must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

fn default_exclude() -> Vec<String> {
    BASIC_LANDS.iter().map(|name| name.to_string()).collect()
}

/// Interactive server settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        self.listen
            .parse::<SocketAddr>()
            .map_err(|_| ValidationError::InvalidField {
                field: "server.listen".to_string(),
                message: format!("'{}' is not a valid socket address", self.listen),
            })?;
        Ok(())
    }
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

/// Output artifact locations.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    #[serde(default = "default_plots_dir")]
    pub plots_dir: PathBuf,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            plots_dir: default_plots_dir(),
            log_dir: default_log_dir(),
        }
    }
}

impl OutputsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.plots_dir", &self.plots_dir),
            ("outputs.log_dir", &self.log_dir),
        ] {
            if value.as_os_str().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

fn default_plots_dir() -> PathBuf {
    PathBuf::from(DEFAULT_PLOTS_DIR)
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

/// Logging defaults to compact stderr output at info level.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown tracing level '{}'", self.tracing_level),
            });
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
