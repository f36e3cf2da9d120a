//! Per-file coverage state.

use crate::classify::CountableMask;
use crate::rewrite::FilePlan;
use std::cell::Cell;

/// Hit counters and countable mask of one translation unit.
///
/// Slot 0 of both arrays is reserved so line `n` lives at index `n`.
/// Counters use interior mutability: a descriptor is shared with the
/// registry while the program keeps hitting lines.
#[derive(Debug, Clone)]
pub struct SourceFileDescriptor {
    path: String,
    hits: Vec<Cell<u64>>,
    mask: CountableMask,
}

impl SourceFileDescriptor {
    #[must_use]
    pub fn new(path: impl Into<String>, mask: CountableMask) -> Self {
        Self {
            path: path.into(),
            hits: vec![Cell::new(0); mask.len()],
            mask,
        }
    }

    /// Descriptor for an analyzed unit, all counters zero
    #[must_use]
    pub fn from_plan(plan: &FilePlan) -> Self {
        Self::new(plan.path.clone(), plan.classification.mask.clone())
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn mask(&self) -> &CountableMask {
        &self.mask
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.mask.line_count()
    }

    /// Record one execution of `line`. Slot 0 and lines past the end are
    /// ignored.
    pub fn hit(&self, line: usize) {
        if line == 0 {
            return;
        }
        if let Some(counter) = self.hits.get(line) {
            counter.set(counter.get().saturating_add(1));
        }
    }

    #[must_use]
    pub fn hits(&self, line: usize) -> u64 {
        self.hits.get(line).map_or(0, Cell::get)
    }

    /// Countable lines (`LF`)
    #[must_use]
    pub fn lines_found(&self) -> usize {
        self.mask.count()
    }

    /// Countable lines with at least one hit (`LH`)
    #[must_use]
    pub fn lines_hit(&self) -> usize {
        self.executed_lines().count()
    }

    /// `(line, hits)` for countable lines that ran, ascending
    pub fn executed_lines(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.mask
            .countable_lines()
            .map(|line| (line, self.hits(line)))
            .filter(|&(_, count)| count > 0)
    }
}
