//! CLI command definitions and dispatch.

pub mod convert;
pub mod interactive;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use runcompose_common::config::{ConverterConfig, OutputFormat};
use runcompose_common::constants::{
    BIN_NAME, COMPOSE_VERSION_ENV, DEFAULT_COMPOSE_VERSION, DEFAULT_INPUT_FILE,
    DEFAULT_OUTPUT_FILE,
};

/// runcompose: turn `docker run` commands into a Docker Compose file.
///
/// Without a subcommand, converts `docker run.txt` in the current directory
/// into `docker-compose.yml`, or prompts for commands when that file is
/// missing.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Document rendering options.
    #[command(flatten)]
    pub render: RenderArgs,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert commands given as arguments or read from a file.
    Convert(convert::ConvertArgs),
    /// Type commands one per line and print the resulting document.
    Interactive,
}

/// Options shared by every way of producing a document.
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Value of the top-level `version` key.
    #[arg(
        long,
        global = true,
        env = COMPOSE_VERSION_ENV,
        default_value = DEFAULT_COMPOSE_VERSION
    )]
    pub compose_version: String,

    /// Output format: yaml or json.
    #[arg(long, global = true, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Omit the comment header from YAML output.
    #[arg(long, global = true)]
    pub no_header: bool,
}

impl RenderArgs {
    /// Builds and validates the converter configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the compose version is blank.
    pub fn to_config(&self) -> anyhow::Result<ConverterConfig> {
        let config = ConverterConfig {
            compose_version: self.compose_version.clone(),
            header: !self.no_header,
            format: self.format,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.render.to_config()?;
    match cli.command {
        Some(Command::Convert(args)) => convert::execute(args, &config),
        Some(Command::Interactive) => interactive::execute(&config),
        None => execute_default(Path::new(DEFAULT_INPUT_FILE), &config),
    }
}

fn execute_default(input: &Path, config: &ConverterConfig) -> anyhow::Result<()> {
    if input.is_file() {
        tracing::info!(path = %input.display(), "found default input file");
        let args = convert::ConvertArgs {
            commands: Vec::new(),
            file: Some(input.to_path_buf()),
            output: Some(PathBuf::from(DEFAULT_OUTPUT_FILE)),
            pretty: false,
        };
        convert::execute(args, config)
    } else {
        interactive::execute(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_uses_defaults() {
        let cli = Cli::try_parse_from(["runcompose"]).expect("should parse");
        assert!(cli.command.is_none());
        let config = cli.render.to_config().expect("valid config");
        assert_eq!(config.format, OutputFormat::Yaml);
        assert!(config.header);
    }

    #[test]
    fn render_flags_apply_after_subcommand() {
        let cli = Cli::try_parse_from([
            "runcompose",
            "convert",
            "docker run redis",
            "--format",
            "json",
            "--compose-version",
            "3.8",
            "--no-header",
        ])
        .expect("should parse");
        let config = cli.render.to_config().expect("valid config");
        assert_eq!(config.compose_version, "3.8");
        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.header);
    }

    #[test]
    fn blank_compose_version_is_rejected() {
        let cli = Cli::try_parse_from(["runcompose", "--compose-version", " "])
            .expect("should parse");
        assert!(cli.render.to_config().is_err());
    }

    #[test]
    fn unknown_format_is_a_usage_error() {
        assert!(Cli::try_parse_from(["runcompose", "--format", "toml"]).is_err());
    }
}
