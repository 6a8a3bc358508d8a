//! `runcompose convert`: translate commands from arguments or a file.

use std::path::{Path, PathBuf};

use clap::Args;

use runcompose_common::config::ConverterConfig;
use runcompose_common::error::ConvertError;
use runcompose_translate::parser::split_commands;
use runcompose_translate::render::render;
use runcompose_translate::translate;

use crate::output;

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// `docker run` commands, each passed as one quoted argument.
    pub commands: Vec<String>,

    /// Read commands from a text file; each `docker run` starts a new one.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Write the document to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Frame stdout output with a banner and summary.
    #[arg(long)]
    pub pretty: bool,
}

/// Executes the `convert` command.
///
/// # Errors
///
/// Returns an error if no command is given, the input file cannot be read,
/// no command translates, or the output cannot be written.
pub fn execute(args: ConvertArgs, config: &ConverterConfig) -> anyhow::Result<()> {
    let commands = collect_commands(&args.commands, args.file.as_deref())?;
    if commands.is_empty() {
        anyhow::bail!("no docker run commands given; pass them as arguments or with --file");
    }
    tracing::info!(commands = commands.len(), "converting docker run commands");
    run_conversion(&commands, config, args.output.as_deref(), args.pretty)
}

/// Gathers commands from inline arguments followed by the file contents.
///
/// # Errors
///
/// Returns [`ConvertError::Io`] if the file cannot be read.
pub fn collect_commands(inline: &[String], file: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let mut commands: Vec<String> = inline
        .iter()
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty())
        .collect();
    if let Some(path) = file {
        let text = std::fs::read_to_string(path).map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        commands.extend(split_commands(&text));
    }
    Ok(commands)
}

/// Translates `commands` and emits the rendered document.
///
/// Rejected commands are reported on stderr and skipped.
///
/// # Errors
///
/// Returns an error if every command was rejected, rendering fails, or the
/// output cannot be written.
pub fn run_conversion(
    commands: &[String],
    config: &ConverterConfig,
    destination: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<()> {
    let translation = translate(commands, &config.compose_version);
    for rejected in &translation.rejected {
        output::warn(&format!(
            "skipping command {}: {}",
            rejected.index, rejected.error
        ))?;
    }
    if translation.service_count() == 0 {
        anyhow::bail!("no valid docker run commands to convert");
    }

    let rendered = render(&translation.document, config)?;
    match destination {
        Some(path) => {
            output::write_file(path, &rendered)?;
            output::summary(path, &translation)?;
        }
        None if pretty => output::print_framed(&rendered)?,
        None => output::print(&rendered)?,
    }
    Ok(())
}
