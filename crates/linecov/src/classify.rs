//! Line classification
//!
//! Decides which physical lines are countable and where on each of those
//! lines the counter goes. Every countable line gets exactly one [`Site`]:
//! a controlling-expression wrap if the line has one, otherwise a statement
//! prefix, earliest by byte offset in both cases.

use crate::frontend::{line_count, StatementKind, StatementSpan};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;

/// Per-line countability, indexed by 1-based line number.
///
/// Index 0 is reserved and always `false`, so the mask has
/// `line_count + 1` entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountableMask {
    lines: Vec<bool>,
}

impl CountableMask {
    /// An all-false mask for a file of `line_count` lines
    #[must_use]
    pub fn new(line_count: usize) -> Self {
        Self {
            lines: vec![false; line_count + 1],
        }
    }

    /// Number of entries, including the reserved slot 0
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Never true; slot 0 always exists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len() - 1
    }

    #[must_use]
    pub fn is_countable(&self, line: usize) -> bool {
        line != 0 && self.lines.get(line).copied().unwrap_or(false)
    }

    /// Mark a line countable; out-of-range lines and slot 0 are ignored
    pub fn mark(&mut self, line: usize) {
        if line != 0 {
            if let Some(slot) = self.lines.get_mut(line) {
                *slot = true;
            }
        }
    }

    /// Countable lines in ascending order
    pub fn countable_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(line, &countable)| countable.then_some(line))
    }

    /// Number of countable lines (the `LF` value)
    #[must_use]
    pub fn count(&self) -> usize {
        self.lines.iter().filter(|&&c| c).count()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.lines
    }
}

/// How the counter is attached on a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SiteKind {
    /// `counter++;` inserted before the statement at `at`. When the
    /// statement is an unbraced body, `wrap_until` is its end and the pair
    /// is wrapped in braces.
    Prefix {
        at: usize,
        wrap_until: Option<usize>,
    },
    /// Controlling expression at `range` becomes `(counter++, (expr))`
    Condition { range: Range<usize> },
}

/// The single counter site of one countable line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Site {
    pub line: usize,
    #[serde(flatten)]
    pub kind: SiteKind,
}

impl Site {
    /// Byte offset where the site begins
    #[must_use]
    pub fn offset(&self) -> usize {
        match &self.kind {
            SiteKind::Prefix { at, .. } => *at,
            SiteKind::Condition { range } => range.start,
        }
    }

    const fn is_condition(&self) -> bool {
        matches!(self.kind, SiteKind::Condition { .. })
    }

    /// Whether `self` should win over `other` for the same line
    fn outranks(&self, other: &Self) -> bool {
        match (self.is_condition(), other.is_condition()) {
            (true, false) => true,
            (false, true) => false,
            _ => self.offset() < other.offset(),
        }
    }
}

/// Result of classifying one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub mask: CountableMask,
    /// One site per countable line, ascending by line
    pub sites: Vec<Site>,
}

/// Classify the lines of `source` given its statement spans
#[must_use]
pub fn classify(source: &str, statements: &[StatementSpan]) -> Classification {
    let lines = line_count(source);
    let mut chosen: BTreeMap<usize, Site> = BTreeMap::new();

    for candidate in statements.iter().filter_map(candidate_site) {
        if candidate.line == 0 || candidate.line > lines {
            continue;
        }
        match chosen.get(&candidate.line) {
            Some(current) if !candidate.outranks(current) => {}
            _ => {
                chosen.insert(candidate.line, candidate);
            }
        }
    }

    let mut mask = CountableMask::new(lines);
    for &line in chosen.keys() {
        mask.mark(line);
    }
    Classification {
        mask,
        sites: chosen.into_values().collect(),
    }
}

fn candidate_site(span: &StatementSpan) -> Option<Site> {
    let prefix = || Site {
        line: span.start_line,
        kind: SiteKind::Prefix {
            at: span.start_byte,
            wrap_until: span.bare_body.then_some(span.end_byte),
        },
    };
    let condition = |line: usize, range: &Range<usize>| Site {
        line,
        kind: SiteKind::Condition {
            range: range.clone(),
        },
    };

    match &span.kind {
        StatementKind::Expression
        | StatementKind::Jump
        | StatementKind::Declaration {
            has_initializer: true,
        } => Some(prefix()),
        StatementKind::Declaration {
            has_initializer: false,
        }
        | StatementKind::Switch => None,
        StatementKind::If { condition: range } | StatementKind::While { condition: range } => {
            Some(condition(span.start_line, range))
        }
        StatementKind::DoWhile {
            condition: range,
            condition_line,
        } => Some(condition(*condition_line, range)),
        StatementKind::For {
            condition: Some(range),
        } => Some(condition(span.start_line, range)),
        StatementKind::For { condition: None } => Some(prefix()),
    }
}
