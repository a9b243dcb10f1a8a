//! PRAX CLI Binary
//!
//! Command-line interface for the Oceanum PRAX service.

use clap::Parser;
use prax::cli::{format_command_error, Cli, RunContext};
use prax::config::{ConfigLoader, PraxConfig};
use prax::error::CommandError;
use prax::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{debug, error, info};

fn main() {
    let cli = Cli::parse();

    let mut config = match ConfigLoader::load_with(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(CommandError::new("Error loading configuration", e)),
    };

    // Initialize logging early
    let logging_config = build_logging_config(&cli, &config);
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("PRAX CLI starting");
    config.apply_overrides(cli.api_url.as_deref(), cli.token.as_deref());
    if let Err(e) = config.ensure_valid() {
        exit_with(CommandError::new("Error loading configuration", e));
    }

    let context = match build_context(&config) {
        Ok(ctx) => {
            debug!(api = %ctx.api().base_url(), "CLI context initialized");
            ctx
        }
        Err(e) => {
            error!("Error initializing client: {}", e);
            exit_with(e)
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match context.execute(&cli.command, &mut out) {
        Ok(()) => info!("Command completed successfully"),
        Err(e) => {
            error!("Command failed: {}", e);
            exit_with(e)
        }
    }
}

fn exit_with(err: CommandError) -> ! {
    eprintln!("{}", format_command_error(&err));
    process::exit(1);
}

fn build_context(
    config: &PraxConfig,
) -> Result<RunContext<prax::client::HttpPraxClient>, CommandError> {
    RunContext::from_config(config).map_err(|e| CommandError::new("Error initializing client", e))
}

/// Build logging configuration from CLI args on top of the config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, config: &PraxConfig) -> LoggingConfig {
    let mut logging = config.logging.clone();

    if cli.quiet {
        logging.enabled = false;
    }
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        logging.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        logging.file = Some(file.clone());
    }

    logging
}
