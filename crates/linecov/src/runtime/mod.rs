//! Runtime side of coverage collection
//!
//! Two renditions of the same behavior live here:
//!
//! - [`runtime_source`] renders the C translation unit that instrumented
//!   programs link against.
//! - [`SourceFileDescriptor`], [`Registry`] and [`ReportGuard`] model it
//!   in Rust, so registration and report semantics can be exercised and
//!   tested without a C toolchain.
//!
//! The C runtime writes its report from an `atexit` handler installed on
//! the first registration. [`ReportGuard`] plays that role for a scope: the
//! report is written when the guard is finished or dropped, and only if
//! something was registered.

mod c_source;
mod descriptor;
mod registry;

pub use c_source::{runtime_source, RUNTIME_FILE};
pub use descriptor::SourceFileDescriptor;
pub use registry::{Registration, Registry};

use crate::config::InstrumentConfig;
use crate::report::LcovFormatter;
use std::path::{Path, PathBuf};

/// What happened when a [`ReportGuard`] wrote its report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Report written with this many file blocks
    Written { files: usize },
    /// Nothing was ever registered, so no report was due
    NotInstalled,
    /// The destination could not be written
    Unwritable,
}

/// Scope owning a registry; writes the report when it ends
#[derive(Debug)]
pub struct ReportGuard<'a> {
    registry: Registry<'a>,
    test_name: String,
    destination: PathBuf,
    installed: bool,
    /// Set once the report has been attempted
    outcome: Option<ReportOutcome>,
}

impl<'a> ReportGuard<'a> {
    /// Guard writing to the configured report file in the working directory
    #[must_use]
    pub fn new(config: &InstrumentConfig) -> Self {
        Self::with_destination(config, config.report_file())
    }

    #[must_use]
    pub fn with_destination(config: &InstrumentConfig, destination: impl Into<PathBuf>) -> Self {
        Self {
            registry: Registry::new(config.registry_capacity),
            test_name: config.test_name.clone(),
            destination: destination.into(),
            installed: false,
            outcome: None,
        }
    }

    /// Register a descriptor. The first successful registration arms the
    /// report.
    pub fn register(&mut self, descriptor: &'a SourceFileDescriptor) -> Registration {
        let outcome = self.registry.register(descriptor);
        if outcome == Registration::Added && !self.installed {
            self.installed = true;
            tracing::debug!(destination = %self.destination.display(), "report armed");
        }
        outcome
    }

    #[must_use]
    pub fn registry(&self) -> &Registry<'a> {
        &self.registry
    }

    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Write the report now instead of at drop. Later calls, and the drop,
    /// return or keep the first outcome without writing again.
    pub fn finish(&mut self) -> ReportOutcome {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        let outcome = self.write();
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn write(&self) -> ReportOutcome {
        if !self.installed {
            return ReportOutcome::NotInstalled;
        }
        let formatter =
            LcovFormatter::new(self.registry.iter()).with_test_name(self.test_name.as_str());
        match formatter.save(&self.destination) {
            Ok(()) => ReportOutcome::Written {
                files: self.registry.len(),
            },
            Err(err) => {
                tracing::warn!(
                    destination = %self.destination.display(),
                    error = %err,
                    "cannot write coverage report"
                );
                ReportOutcome::Unwritable
            }
        }
    }
}

impl Drop for ReportGuard<'_> {
    fn drop(&mut self) {
        if self.outcome.is_none() {
            let _ = self.write();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::classify::CountableMask;

    fn descriptor(path: &str) -> SourceFileDescriptor {
        let mut mask = CountableMask::new(2);
        mask.mark(1);
        SourceFileDescriptor::new(path, mask)
    }

    #[test]
    fn test_guard_writes_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("coverage.lcov");
        let file = descriptor("/a.c");
        {
            let mut guard = ReportGuard::with_destination(&InstrumentConfig::default(), &dest);
            guard.register(&file);
            file.hit(1);
        }
        let content = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(content, "TN:test\nSF:/a.c\nDA:1,1\nLH:1\nLF:1\nend_of_record\n");
    }

    #[test]
    fn test_no_registration_no_report() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("coverage.lcov");
        let mut guard = ReportGuard::with_destination(&InstrumentConfig::default(), &dest);
        assert_eq!(guard.finish(), ReportOutcome::NotInstalled);
        assert!(!dest.exists());
    }

    #[test]
    fn test_unwritable_destination_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing").join("coverage.lcov");
        let file = descriptor("/a.c");
        let mut guard = ReportGuard::with_destination(&InstrumentConfig::default(), &dest);
        guard.register(&file);
        assert_eq!(guard.finish(), ReportOutcome::Unwritable);
    }

    #[test]
    fn test_finish_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("coverage.lcov");
        let file = descriptor("/a.c");
        {
            let mut guard = ReportGuard::with_destination(&InstrumentConfig::default(), &dest);
            guard.register(&file);
            assert_eq!(guard.finish(), ReportOutcome::Written { files: 1 });
            std::fs::write(&dest, "marker\n").unwrap();
            assert_eq!(guard.finish(), ReportOutcome::Written { files: 1 });
        }
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "marker\n");
    }
}
