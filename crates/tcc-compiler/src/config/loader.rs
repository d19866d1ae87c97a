//! Configuration loader
//!
//! Layers the configuration file over the built-in defaults using Figment.

use figment::Figment;
use figment::providers::{Format, Serialized, Yaml};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::info;

use super::CompilerConfig;
use crate::{CompileError, Result};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load and validate the configuration
    ///
    /// A missing file is an error; the defaults only fill keys the file
    /// leaves out.
    pub fn load(&self) -> Result<CompilerConfig> {
        info!(path = %self.config_path.display(), "Loading config");

        let content = std::fs::read_to_string(&self.config_path)
            .map_err(|e| CompileError::io(&self.config_path, e))?;

        let config = Self::from_yaml_str(&content).map_err(|e| match e {
            CompileError::Parse { message, .. } => CompileError::Parse {
                file: self.config_path.clone(),
                message,
            },
            other => other,
        })?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Parse a configuration document without touching the filesystem
    pub fn from_yaml_str(content: &str) -> Result<CompilerConfig> {
        Figment::new()
            .merge(Serialized::defaults(CompilerConfig::default()))
            .merge(Yaml::string(content))
            .extract()
            .map_err(|e| CompileError::Parse {
                file: PathBuf::from("<config>"),
                message: e.to_string(),
            })
    }
}

fn validate_config(config: &CompilerConfig) -> Result<()> {
    Regex::new(config.target_regex())
        .map_err(|e| CompileError::InvalidRegex(format!("TargetRegex: {e}")))?;

    if config.artifact_template.is_empty() {
        return Err(CompileError::Config(
            "ArtifactTemplate must be set".to_string(),
        ));
    }

    Ok(())
}
