//! LCOV report writer
//!
//! ```text
//! TN:<test name>
//! SF:<source file>
//! DA:<line>,<execution count>
//! LH:<lines hit>
//! LF:<lines found>
//! end_of_record
//! ```
//!
//! Only countable lines that executed get a `DA` record; `LF` still counts
//! every countable line.

use crate::result::LinecovResult;
use crate::runtime::SourceFileDescriptor;
use std::fmt::Write as _;
use std::path::Path;

/// LCOV format report generator
#[derive(Debug)]
pub struct LcovFormatter<'a> {
    files: Vec<&'a SourceFileDescriptor>,
    test_name: Option<String>,
}

impl<'a> LcovFormatter<'a> {
    /// Create a formatter over descriptors, in report order
    #[must_use]
    pub fn new(files: impl IntoIterator<Item = &'a SourceFileDescriptor>) -> Self {
        Self {
            files: files.into_iter().collect(),
            test_name: None,
        }
    }

    /// Set the test name for the report
    #[must_use]
    pub fn with_test_name(mut self, name: impl Into<String>) -> Self {
        self.test_name = Some(name.into());
        self
    }

    /// Generate the report text
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "TN:{}", self.test_name.as_deref().unwrap_or(""));

        for file in &self.files {
            let _ = writeln!(output, "SF:{}", file.path());

            let mut lines_hit = 0usize;
            for (line, count) in file.executed_lines() {
                let _ = writeln!(output, "DA:{line},{count}");
                lines_hit += 1;
            }

            let _ = writeln!(output, "LH:{lines_hit}");
            let _ = writeln!(output, "LF:{}", file.lines_found());
            output.push_str("end_of_record\n");
        }

        output
    }

    /// Save the report to a file, replacing any previous report
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written
    pub fn save(&self, path: &Path) -> LinecovResult<()> {
        std::fs::write(path, self.generate())?;
        Ok(())
    }
}
