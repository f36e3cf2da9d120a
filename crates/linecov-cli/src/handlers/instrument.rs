//! Instrument command handler

use super::resolve_instrument_config;
use crate::commands::InstrumentArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;
use linecov::{InstrumentedProject, Project, RUNTIME_FILE};
use std::path::Path;

/// Execute the instrument command
pub fn execute_instrument(config: &CliConfig, args: &InstrumentArgs) -> CliResult<InstrumentedProject> {
    let reporter = Reporter::new(config);
    let settings = resolve_instrument_config(&args.settings)?;

    let project = Project::discover(&args.source_dir)?.exclude(&args.out_dir)?;
    tracing::info!(
        root = %project.root().display(),
        files = project.files().len(),
        "instrumenting"
    );
    let instrumented = project.instrument(&settings)?;
    instrumented.write(&args.out_dir)?;

    for file in &instrumented.files {
        reporter.detail(&format!(
            "{} ({} countable lines)",
            file.relative.display(),
            file.plan.classification.mask.count()
        ));
    }
    if instrumented.main_file().is_none() {
        reporter.warning("no file defines main; files register through load-time constructors");
    }
    reporter.success(&describe_result(&instrumented, &args.out_dir));
    Ok(instrumented)
}

/// One-line summary of an instrumentation run
#[must_use]
pub fn describe_result(instrumented: &InstrumentedProject, out_dir: &Path) -> String {
    let countable: usize = instrumented
        .files
        .iter()
        .map(|f| f.plan.classification.mask.count())
        .sum();
    let files = instrumented.files.len();
    let noun = if files == 1 { "file" } else { "files" };
    format!(
        "Instrumented {files} {noun} ({countable} countable lines) into {}; compile them with {RUNTIME_FILE}",
        out_dir.display()
    )
}
