//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Linecov: line coverage for C programs, reported as LCOV
#[derive(Parser, Debug)]
#[command(name = "linecov")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Instrument every .c file under a directory
    Instrument(InstrumentArgs),

    /// Write the runtime translation unit
    Runtime(RuntimeArgs),

    /// Show the countable lines of one C file
    Classify(ClassifyArgs),

    /// Summarize an LCOV report
    Summary(SummaryArgs),
}

/// Settings baked into generated code
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// YAML file with `test_name` and `registry_capacity`
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// LCOV test name (overrides the config file)
    #[arg(long)]
    pub test_name: Option<String>,

    /// Runtime registry capacity (overrides the config file)
    #[arg(long)]
    pub capacity: Option<usize>,
}

/// Arguments for the instrument command
#[derive(Parser, Debug)]
pub struct InstrumentArgs {
    /// Directory searched recursively for .c files
    #[arg(env = "LINECOV_SOURCE", default_value = ".")]
    pub source_dir: PathBuf,

    /// Output directory; relative layout is preserved
    #[arg(default_value = "build_cov")]
    pub out_dir: PathBuf,

    #[command(flatten)]
    pub settings: ConfigArgs,
}

/// Arguments for the runtime command
#[derive(Parser, Debug)]
pub struct RuntimeArgs {
    /// Output file
    #[arg(default_value = "linecov_runtime.c")]
    pub out_file: PathBuf,

    #[command(flatten)]
    pub settings: ConfigArgs,
}

/// Arguments for the classify command
#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    /// C source file
    pub file: PathBuf,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the summary command
#[derive(Parser, Debug)]
pub struct SummaryArgs {
    /// LCOV report to read
    #[arg(default_value = "coverage.lcov")]
    pub report: PathBuf,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Color argument
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::ColorChoice;

    #[test]
    fn test_instrument_defaults() {
        let cli = Cli::try_parse_from(["linecov", "instrument"]).unwrap();
        let Commands::Instrument(args) = cli.command else {
            panic!("expected instrument");
        };
        assert_eq!(args.out_dir, PathBuf::from("build_cov"));
        assert!(args.settings.capacity.is_none());
    }

    #[test]
    fn test_instrument_positionals_and_overrides() {
        let cli = Cli::try_parse_from([
            "linecov",
            "instrument",
            "src",
            "out",
            "--test-name",
            "nightly",
            "--capacity",
            "64",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Instrument(args) = cli.command else {
            panic!("expected instrument");
        };
        assert_eq!(args.source_dir, PathBuf::from("src"));
        assert_eq!(args.out_dir, PathBuf::from("out"));
        assert_eq!(args.settings.test_name.as_deref(), Some("nightly"));
        assert_eq!(args.settings.capacity, Some(64));
    }

    #[test]
    fn test_summary_json_flag() {
        let cli = Cli::try_parse_from(["linecov", "summary", "r.lcov", "--json"]).unwrap();
        let Commands::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert!(args.json);
        assert_eq!(args.report, PathBuf::from("r.lcov"));
    }

    #[test]
    fn test_color_arg_conversion() {
        assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
        assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
        assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["linecov"]).is_err());
    }
}
