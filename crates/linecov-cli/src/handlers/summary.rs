//! Summary command handler

use crate::commands::SummaryArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;
use linecov::{parse_lcov, ReportSummary};

/// Execute the summary command
pub fn execute_summary(config: &CliConfig, args: &SummaryArgs) -> CliResult<ReportSummary> {
    let reporter = Reporter::new(config);
    let text = std::fs::read_to_string(&args.report)?;
    let summary = parse_lcov(&text)?.summary();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_summary(&summary, |p| reporter.percent(p)));
    }
    if summary.files.is_empty() {
        reporter.warning("report contains no files");
    }
    Ok(summary)
}

/// Text table of per-file and total coverage
pub fn render_summary(summary: &ReportSummary, percent: impl Fn(f64) -> String) -> String {
    let width = summary
        .files
        .iter()
        .map(|f| f.path.len())
        .max()
        .unwrap_or(0)
        .max("TOTAL".len());

    let mut out = String::new();
    if let Some(name) = summary.test_name.as_deref().filter(|n| !n.is_empty()) {
        out.push_str(&format!("Test: {name}\n"));
    }
    for file in &summary.files {
        out.push_str(&format!(
            "{:<width$}  {:>5}/{:<5}  {}\n",
            file.path,
            file.coverage.hit,
            file.coverage.found,
            percent(file.coverage.percent)
        ));
    }
    out.push_str(&format!(
        "{:<width$}  {:>5}/{:<5}  {}\n",
        "TOTAL",
        summary.total.hit,
        summary.total.found,
        percent(summary.total.percent)
    ));
    out
}
