//! # runcompose-translate
//!
//! Translates `docker run` invocations into a Docker Compose document.
//!
//! The pipeline has three pure stages:
//! - **Parser**: tokenizes a command line into image, command and
//!   canonical parameters.
//! - **Mapper**: turns one parsed command into a service description.
//! - **Generator**: names services uniquely and aggregates networks and
//!   named volumes.
//!
//! [`render`] serializes the resulting document as YAML or JSON.

pub mod generator;
pub mod mapper;
pub mod parser;
pub mod render;
pub mod service;

use runcompose_common::error::ConvertError;

use crate::generator::ComposeDocument;

/// A command that could not be parsed.
#[derive(Debug)]
pub struct RejectedCommand {
    /// 1-based position in the input.
    pub index: usize,
    /// The command as given.
    pub command: String,
    /// Why it was rejected.
    pub error: ConvertError,
}

/// Outcome of translating a batch of commands.
#[derive(Debug)]
pub struct Translation {
    /// Document built from every command that parsed.
    pub document: ComposeDocument,
    /// Commands skipped because they failed to parse.
    pub rejected: Vec<RejectedCommand>,
}

impl Translation {
    /// Number of services in the document.
    pub fn service_count(&self) -> usize {
        self.document.services.len()
    }
}

/// Parses, maps and assembles `commands` into one document.
///
/// A command that fails to parse is recorded in
/// [`Translation::rejected`] and the remaining commands still translate.
pub fn translate<S: AsRef<str>>(commands: &[S], version: &str) -> Translation {
    let mut services = Vec::with_capacity(commands.len());
    let mut names = Vec::with_capacity(commands.len());
    let mut rejected = Vec::new();

    for (index, command) in commands.iter().enumerate() {
        let command = command.as_ref();
        match parser::parse_command(command) {
            Ok(parsed) => {
                names.push(parsed.value("name").map(str::to_owned));
                services.push(mapper::map_to_service(&parsed));
            }
            Err(error) => {
                tracing::warn!(index = index + 1, error = %error, "skipping command");
                rejected.push(RejectedCommand {
                    index: index + 1,
                    command: command.to_owned(),
                    error,
                });
            }
        }
    }

    Translation {
        document: generator::build_document(version, services, &names),
        rejected,
    }
}
