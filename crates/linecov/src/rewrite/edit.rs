//! Text insertions that never add or remove a line break.

/// Order of insertions that land on the same byte offset, left to right
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Placement {
    /// Prologue and boot call
    Leading,
    /// End of a wrap, e.g. the ` }` after a braced body
    Closing,
    /// Start of a wrap or a plain prefix
    Opening,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Insertion {
    pub at: usize,
    pub placement: Placement,
    pub text: String,
}

impl Insertion {
    pub(crate) fn new(at: usize, placement: Placement, text: impl Into<String>) -> Self {
        Self {
            at,
            placement,
            text: text.into(),
        }
    }
}

/// Apply all insertions in one pass. Offsets refer to the original text;
/// insertions at the same offset keep their [`Placement`] order, then their
/// order in `edits`.
pub(crate) fn apply(source: &str, mut edits: Vec<Insertion>) -> String {
    edits.sort_by_key(|e| (e.at, e.placement));
    let extra: usize = edits.iter().map(|e| e.text.len()).sum();
    let mut out = String::with_capacity(source.len() + extra);
    let mut copied = 0;
    for edit in &edits {
        let at = edit.at.min(source.len());
        if at > copied {
            out.push_str(&source[copied..at]);
            copied = at;
        }
        out.push_str(&edit.text);
    }
    out.push_str(&source[copied..]);
    out
}
