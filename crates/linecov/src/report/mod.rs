//! LCOV reports: writing from descriptors and reading back.

mod lcov;
mod parse;

pub use lcov::LcovFormatter;
pub use parse::{parse, CoverageSummary, FileRecord, FileSummary, LcovReport, ReportSummary};
