//! CLI configuration
//!
//! Built-in defaults, then an optional TOML file, then `PLUMB_` environment
//! variables (`PLUMB_CLIENT__BASE_URL`, `PLUMB_DATA_DIR`, ...).

use anyhow::Result;
use config::{Config, Environment, File};
use plumb_http::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the persisted session inside the data directory
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// API client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Where the session and the log file live
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plumbconnect")
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            data_dir: default_data_dir(),
        }
    }
}

impl CliConfig {
    /// Load configuration, layering `path` and the environment over defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a value has the wrong type
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix("PLUMB"))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings = builder
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}
