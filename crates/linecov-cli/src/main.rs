//! Linecov CLI: line coverage for C programs
//!
//! ## Usage
//!
//! ```bash
//! linecov instrument src/ build_cov      # Rewrite every .c under src/
//! cc build_cov/*.c -o prog && ./prog     # Run; writes coverage.lcov
//! linecov summary coverage.lcov          # Per-file line coverage
//! ```

use clap::Parser;
use linecov_cli::{
    handlers::{execute_classify, execute_instrument, execute_runtime, execute_summary},
    Cli, CliConfig, CliResult, ColorChoice, Commands, Reporter, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    let use_color = config.color.should_color();
    console::set_colors_enabled(use_color);
    console::set_colors_enabled_stderr(use_color);

    match run(&config, &cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            Reporter::new(&config).failure(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(config: &CliConfig, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Instrument(args) => execute_instrument(config, args).map(|_| ()),
        Commands::Runtime(args) => execute_runtime(config, args),
        Commands::Classify(args) => execute_classify(config, args),
        Commands::Summary(args) => execute_summary(config, args).map(|_| ()),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// `RUST_LOG` wins over the verbosity flags
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
