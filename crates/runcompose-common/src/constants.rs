//! System-wide constants and default paths.

/// The two words every translatable command line starts with.
pub const COMMAND_PREFIX: &str = "docker run";

/// Compose schema version written when none is configured.
pub const DEFAULT_COMPOSE_VERSION: &str = "3.9";

/// Input file picked up when the CLI runs without arguments.
pub const DEFAULT_INPUT_FILE: &str = "docker run.txt";

/// Output file written when the CLI runs without arguments.
pub const DEFAULT_OUTPUT_FILE: &str = "docker-compose.yml";

/// Prefix of the positional fallback service name (`service_1`, ...).
pub const FALLBACK_SERVICE_PREFIX: &str = "service_";

/// Driver assigned to aggregated networks that carry no explicit config.
pub const DEFAULT_NETWORK_DRIVER: &str = "bridge";

/// Network name implied by `--network-alias` without `--network`.
pub const DEFAULT_NETWORK: &str = "default";

/// Comment lines prepended to rendered YAML documents.
pub const DOCUMENT_HEADER: [&str; 2] = [
    "# Docker Compose configuration",
    "# Generated from docker run commands",
];

/// Application name used in CLI output.
pub const APP_NAME: &str = "runcompose";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "runcompose";

/// Environment variable overriding the compose version.
pub const COMPOSE_VERSION_ENV: &str = "RUNCOMPOSE_COMPOSE_VERSION";
