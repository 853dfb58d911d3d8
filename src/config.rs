//! Hireflow configuration loaded from `hireflow.toml`.
//!
//! [`HireflowConfig`] holds every tunable. Keys missing from the file fall
//! back to defaults. The `HIREFLOW_DATA_FILE` environment variable takes
//! precedence over the file for the data file location.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::registry::LoadPolicy;

/// Top-level configuration read from `hireflow.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct HireflowConfig {
    /// Flat-text file holding the applications.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether a malformed record aborts loading or is skipped.
    #[serde(default)]
    pub on_invalid_record: LoadPolicy,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("applications.txt")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for HireflowConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_level: default_log_level(),
            on_invalid_record: LoadPolicy::default(),
        }
    }
}

impl HireflowConfig {
    /// Load `hireflow.toml` from the current directory, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("hireflow.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<HireflowConfig>(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        // The environment wins over the file for the data location.
        if let Ok(file) = std::env::var("HIREFLOW_DATA_FILE")
            && !file.is_empty()
        {
            config.data_file = PathBuf::from(file);
        }

        Ok(config)
    }
}
