//! Converter configuration model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Serialization target for a generated document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Block-style YAML, the usual `docker-compose.yml` form.
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => write!(f, "yaml"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(ConvertError::Config {
                message: format!("unknown output format: {other} (expected yaml or json)"),
            }),
        }
    }
}

/// Root configuration for a conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Value of the document's top-level `version` key.
    pub compose_version: String,
    /// Whether rendered YAML starts with descriptive comment lines.
    pub header: bool,
    /// Output serialization.
    pub format: OutputFormat,
}

impl ConverterConfig {
    /// Checks that the configuration can produce a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the compose version is blank.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.compose_version.trim().is_empty() {
            return Err(ConvertError::Config {
                message: "compose version must not be empty".into(),
            });
        }
        Ok(())
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            compose_version: crate::constants::DEFAULT_COMPOSE_VERSION.to_owned(),
            header: true,
            format: OutputFormat::default(),
        }
    }
}
