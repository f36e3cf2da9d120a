//! C front-end
//!
//! Turns C source text into a [`SourceModel`]: the function definitions, the
//! statement spans inside their bodies, and the place where file-scope code
//! may be inserted without disturbing line numbers.
//!
//! The front-end sits behind the [`StatementSource`] trait so the classifier
//! and rewriter never depend on how statements were found.

mod cursor;
mod lexer;
mod scanner;

pub use lexer::{lex, tokenize, FreeLine, Lexed, Token, TokenKind};
pub use scanner::{FunctionDef, SourceModel, StatementKind, StatementSpan};

use crate::result::LinecovResult;

/// Anything that can produce statement spans for a translation unit
pub trait StatementSource {
    /// Scan `source`; `path` is only used in error messages
    fn scan(&self, path: &str, source: &str) -> LinecovResult<SourceModel>;
}

/// The built-in C front-end
#[derive(Debug, Clone, Copy, Default)]
pub struct CFrontend;

impl StatementSource for CFrontend {
    fn scan(&self, path: &str, source: &str) -> LinecovResult<SourceModel> {
        scanner::scan(path, source)
    }
}

/// Number of lines in `source`.
///
/// A line starts at byte 0 and after every `\n` that is not the last byte,
/// so a trailing newline does not open an extra line and empty text is one
/// line.
#[must_use]
pub fn line_count(source: &str) -> usize {
    let bytes = source.as_bytes();
    let newlines = bytes.iter().filter(|&&b| b == b'\n').count();
    if bytes.last() == Some(&b'\n') {
        newlines
    } else {
        newlines + 1
    }
}
