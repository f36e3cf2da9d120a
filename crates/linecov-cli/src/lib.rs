//! Linecov CLI library
//!
//! Argument definitions, output helpers and command handlers behind the
//! `linecov` binary.

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{
    ClassifyArgs, Cli, ColorArg, Commands, ConfigArgs, InstrumentArgs, RuntimeArgs, SummaryArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::Reporter;
