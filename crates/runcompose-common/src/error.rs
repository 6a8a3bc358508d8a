//! Unified error type for the runcompose workspace.
//!
//! Only [`ConvertError::Format`] is produced by the translation core; the
//! remaining variants belong to the I/O and rendering edges.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A command line could not be read as a `docker run` invocation.
    #[error("invalid command \"{line}\": {message}")]
    Format {
        /// The offending input, truncated for display.
        line: String,
        /// What was wrong with it.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// YAML serialization failed.
    #[error("YAML serialization error: {source}")]
    Yaml {
        /// Underlying serializer error.
        #[from]
        source: serde_yaml::Error,
    },

    /// JSON serialization failed.
    #[error("JSON serialization error: {source}")]
    Json {
        /// Underlying serializer error.
        #[from]
        source: serde_json::Error,
    },
}

impl ConvertError {
    /// Maximum number of characters of the input kept in a format error.
    const LINE_PREVIEW: usize = 60;

    /// Builds a [`ConvertError::Format`] for `line`.
    pub fn format(line: &str, message: impl Into<String>) -> Self {
        let mut preview: String = line.chars().take(Self::LINE_PREVIEW).collect();
        if line.chars().count() > Self::LINE_PREVIEW {
            preview.push_str("...");
        }
        Self::Format {
            line: preview,
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_keeps_short_lines() {
        let err = ConvertError::format("podman run x", "missing prefix");
        assert_eq!(
            err.to_string(),
            "invalid command \"podman run x\": missing prefix"
        );
    }

    #[test]
    fn format_error_truncates_long_lines() {
        let line = "x".repeat(200);
        let ConvertError::Format { line: preview, .. } = ConvertError::format(&line, "bad") else {
            unreachable!("constructor always builds a format error");
        };
        assert_eq!(preview.len(), 63);
        assert!(preview.ends_with("..."));
    }
}
