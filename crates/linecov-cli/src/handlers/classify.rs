//! Classify command handler

use crate::commands::ClassifyArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::Reporter;
use linecov::{CFrontend, FilePlan, SiteKind};
use serde::Serialize;

/// Countable lines of one file, as printed by `linecov classify`
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyReport {
    pub path: String,
    pub line_count: usize,
    pub has_main: bool,
    pub lines: Vec<ClassifiedLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedLine {
    pub line: usize,
    /// `condition` or `prefix`
    pub site: &'static str,
    pub text: String,
}

impl ClassifyReport {
    /// Build from an analyzed file
    #[must_use]
    pub fn from_plan(plan: &FilePlan) -> Self {
        let source_lines: Vec<&str> = plan.source.lines().collect();
        let lines = plan
            .classification
            .sites
            .iter()
            .map(|site| ClassifiedLine {
                line: site.line,
                site: match site.kind {
                    SiteKind::Condition { .. } => "condition",
                    SiteKind::Prefix { .. } => "prefix",
                },
                text: source_lines
                    .get(site.line - 1)
                    .map_or_else(String::new, |l| l.trim().to_string()),
            })
            .collect();
        Self {
            path: plan.path.clone(),
            line_count: plan.line_count(),
            has_main: plan.has_main(),
            lines,
        }
    }
}

/// Execute the classify command
pub fn execute_classify(config: &CliConfig, args: &ClassifyArgs) -> CliResult<()> {
    let reporter = Reporter::new(config);
    let path = args.file.canonicalize()?;
    let path_str = path
        .to_str()
        .ok_or_else(|| CliError::invalid_argument(format!("path is not UTF-8: {}", path.display())))?;
    let source = std::fs::read_to_string(&path)?;
    let plan = FilePlan::analyze(&CFrontend, path_str, source)?;
    let report = ClassifyReport::from_plan(&plan);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_classification(&report));
        reporter.detail(&format!(
            "{} of {} lines countable",
            report.lines.len(),
            report.line_count
        ));
    }
    Ok(())
}

/// Text rendering: one `line: source` row per countable line
#[must_use]
pub fn render_classification(report: &ClassifyReport) -> String {
    let width = report.line_count.to_string().len();
    report
        .lines
        .iter()
        .map(|l| format!("{:>width$}: {}\n", l.line, l.text))
        .collect()
}
