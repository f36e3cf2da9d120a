//! Instrumentation configuration
//!
//! Settings that end up baked into the generated C: the LCOV test name and
//! the capacity of the runtime registry. The report file name is fixed.

use crate::result::LinecovResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Report file written by the runtime, relative to the working directory
pub const REPORT_FILE: &str = "coverage.lcov";

/// Default runtime registry capacity
pub const DEFAULT_REGISTRY_CAPACITY: usize = 512;

/// Default LCOV test name
pub const DEFAULT_TEST_NAME: &str = "test";

/// Environment variable naming the diagnostic side-channel file
pub const DIAG_ENV: &str = "LINECOV_DIAG";

/// Configuration for instrumenting a set of translation units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentConfig {
    /// Value of the `TN:` record
    pub test_name: String,
    /// Maximum number of files the runtime registry accepts
    pub registry_capacity: usize,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            test_name: DEFAULT_TEST_NAME.to_string(),
            registry_capacity: DEFAULT_REGISTRY_CAPACITY,
        }
    }
}

impl InstrumentConfig {
    /// Create a builder for instrumentation config
    #[must_use]
    pub fn builder() -> InstrumentConfigBuilder {
        InstrumentConfigBuilder::default()
    }

    /// Load a configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> LinecovResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parse a configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> LinecovResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validated()
    }

    /// Report file name (not configurable)
    #[must_use]
    pub fn report_file(&self) -> &'static str {
        REPORT_FILE
    }

    fn validated(mut self) -> LinecovResult<Self> {
        if self.registry_capacity == 0 {
            self.registry_capacity = DEFAULT_REGISTRY_CAPACITY;
        }
        if self.test_name.chars().any(|c| c == '\n' || c == '\r') {
            return Err(crate::LinecovError::config(
                "test_name must be a single line",
            ));
        }
        Ok(self)
    }
}

/// Builder for instrumentation configuration
#[derive(Debug, Default)]
pub struct InstrumentConfigBuilder {
    test_name: Option<String>,
    registry_capacity: usize,
}

impl InstrumentConfigBuilder {
    /// Set the LCOV test name
    #[must_use]
    pub fn test_name(mut self, name: impl Into<String>) -> Self {
        self.test_name = Some(name.into());
        self
    }

    /// Set the runtime registry capacity
    #[must_use]
    pub fn registry_capacity(mut self, capacity: usize) -> Self {
        self.registry_capacity = capacity;
        self
    }

    /// Build the configuration
    pub fn build(self) -> LinecovResult<InstrumentConfig> {
        InstrumentConfig {
            test_name: self
                .test_name
                .unwrap_or_else(|| DEFAULT_TEST_NAME.to_string()),
            registry_capacity: self.registry_capacity,
        }
        .validated()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InstrumentConfig::default();
        assert_eq!(config.test_name, "test");
        assert_eq!(config.registry_capacity, 512);
        assert_eq!(config.report_file(), "coverage.lcov");
    }

    #[test]
    fn test_builder_zero_capacity_means_default() {
        let config = InstrumentConfig::builder()
            .registry_capacity(0)
            .build()
            .unwrap();
        assert_eq!(config.registry_capacity, DEFAULT_REGISTRY_CAPACITY);
    }

    #[test]
    fn test_builder_overrides() {
        let config = InstrumentConfig::builder()
            .test_name("fuzz_run")
            .registry_capacity(8)
            .build()
            .unwrap();
        assert_eq!(config.test_name, "fuzz_run");
        assert_eq!(config.registry_capacity, 8);
    }

    #[test]
    fn test_builder_rejects_multiline_test_name() {
        let result = InstrumentConfig::builder().test_name("a\nb").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_yaml_partial_uses_defaults() {
        let config = InstrumentConfig::from_yaml_str("registry_capacity: 16\n").unwrap();
        assert_eq!(config.registry_capacity, 16);
        assert_eq!(config.test_name, "test");
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linecov.yaml");
        std::fs::write(&path, "test_name: nightly\nregistry_capacity: 64\n").unwrap();
        let config = InstrumentConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.test_name, "nightly");
        assert_eq!(config.registry_capacity, 64);
    }

    #[test]
    fn test_yaml_invalid() {
        assert!(InstrumentConfig::from_yaml_str("registry_capacity: [1, 2]").is_err());
    }
}
