//! Linecov: source-level line coverage for C
//!
//! Rewrites C translation units so that every executable line bumps a
//! counter, without moving any line, and ships a small C runtime that
//! writes an LCOV report when the instrumented program exits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌──────────┐   ┌─────────────────┐
//! │ Frontend │──►│ Classifier │──►│ Rewriter │──►│ instrumented .c │
//! │ (lex +   │   │ (one site  │   │ (+ ident │   │ + linecov_      │
//! │  scan)   │   │  per line) │   │  suffix) │   │   runtime.c     │
//! └──────────┘   └────────────┘   └──────────┘   └────────┬────────┘
//!                                                          │ run
//!                                                          ▼
//!                                  registry ──atexit──► coverage.lcov
//! ```
//!
//! # Example
//!
//! ```
//! use linecov::{instrument_source, CFrontend};
//!
//! let src = "int main(void)\n{\n  return 0;\n}\n";
//! let out = instrument_source(&CFrontend, "/src/main.c", src).unwrap();
//! assert_eq!(out.lines().count(), src.lines().count());
//! assert!(out.contains("__linecov_boot();"));
//! ```

// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod classify;
pub mod config;
pub mod frontend;
mod ident;
pub mod project;
pub mod report;
mod result;
pub mod rewrite;
pub mod runtime;

pub use classify::{classify, Classification, CountableMask, Site, SiteKind};
pub use config::{InstrumentConfig, InstrumentConfigBuilder, REPORT_FILE};
pub use frontend::{line_count, CFrontend, SourceModel, StatementKind, StatementSource, StatementSpan};
pub use ident::derive_id;
pub use project::{InstrumentedFile, InstrumentedProject, Project};
pub use report::{parse as parse_lcov, LcovFormatter, LcovReport, ReportSummary};
pub use result::{LinecovError, LinecovResult};
pub use rewrite::{escape_c_string, instrument_source, FilePlan, Instrumentor};
pub use runtime::{
    runtime_source, Registration, Registry, ReportGuard, ReportOutcome, SourceFileDescriptor,
    RUNTIME_FILE,
};
