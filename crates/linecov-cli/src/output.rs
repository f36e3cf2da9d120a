//! Status output

use crate::config::{CliConfig, Verbosity};
use console::{style, Term};

/// Writes status lines to stderr; command results go to stdout
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Verbosity level
    pub verbosity: Verbosity,
}

impl Reporter {
    /// Create a reporter for the given CLI configuration
    #[must_use]
    pub fn new(config: &CliConfig) -> Self {
        Self {
            term: Term::stderr(),
            use_color: config.color.should_color(),
            verbosity: config.verbosity,
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.verbosity.is_quiet() {
            return;
        }
        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "OK".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.verbosity.is_quiet() {
            return;
        }
        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a message only in verbose mode
    pub fn detail(&self, message: &str) {
        if !self.verbosity.is_verbose() {
            return;
        }
        let prefix = if self.use_color {
            style("·").dim().to_string()
        } else {
            " ".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message; shown even in quiet mode
    pub fn failure(&self, message: &str) {
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "ERROR".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Style a coverage percentage: green at 80% and above, yellow from
    /// 50%, red below
    #[must_use]
    pub fn percent(&self, value: f64) -> String {
        let text = format!("{value:.1}%");
        if !self.use_color {
            return text;
        }
        let styled = if value >= 80.0 {
            style(text).green()
        } else if value >= 50.0 {
            style(text).yellow()
        } else {
            style(text).red()
        };
        styled.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorChoice;

    #[test]
    fn test_percent_without_color() {
        let reporter = Reporter::new(&CliConfig::new().with_color(ColorChoice::Never));
        assert_eq!(reporter.percent(66.666), "66.7%");
        assert_eq!(reporter.percent(0.0), "0.0%");
    }

    #[test]
    fn test_percent_with_color_keeps_text() {
        let reporter = Reporter::new(&CliConfig::new().with_color(ColorChoice::Always));
        assert!(reporter.percent(91.0).contains("91.0%"));
    }
}
