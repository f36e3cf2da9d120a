//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module contains the execution logic for a CLI command, the
//! pure helpers it is built from, and their tests.

pub mod classify;
pub mod instrument;
pub mod runtime;
pub mod summary;

pub use classify::{execute_classify, render_classification, ClassifyReport};
pub use instrument::execute_instrument;
pub use runtime::execute_runtime;
pub use summary::{execute_summary, render_summary};

use crate::commands::ConfigArgs;
use crate::error::CliResult;
use linecov::InstrumentConfig;

/// Build the instrumentation config: YAML file first, then flag overrides
pub fn resolve_instrument_config(args: &ConfigArgs) -> CliResult<InstrumentConfig> {
    let base = match &args.config {
        Some(path) => InstrumentConfig::from_yaml_file(path)?,
        None => InstrumentConfig::default(),
    };
    let mut builder = InstrumentConfig::builder()
        .test_name(args.test_name.clone().unwrap_or(base.test_name))
        .registry_capacity(base.registry_capacity);
    if let Some(capacity) = args.capacity {
        builder = builder.registry_capacity(capacity);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let config = resolve_instrument_config(&ConfigArgs::default()).unwrap();
        assert_eq!(config, InstrumentConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linecov.yaml");
        std::fs::write(&path, "test_name: from_file\nregistry_capacity: 32\n").unwrap();

        let args = ConfigArgs {
            config: Some(path.clone()),
            test_name: None,
            capacity: Some(8),
        };
        let config = resolve_instrument_config(&args).unwrap();
        assert_eq!(config.test_name, "from_file");
        assert_eq!(config.registry_capacity, 8);

        let args = ConfigArgs {
            config: Some(path),
            test_name: Some("cli".into()),
            capacity: None,
        };
        let config = resolve_instrument_config(&args).unwrap();
        assert_eq!(config.test_name, "cli");
        assert_eq!(config.registry_capacity, 32);
    }

    #[test]
    fn test_missing_config_file() {
        let args = ConfigArgs {
            config: Some("/no/such/linecov.yaml".into()),
            ..ConfigArgs::default()
        };
        assert!(resolve_instrument_config(&args).is_err());
    }
}
