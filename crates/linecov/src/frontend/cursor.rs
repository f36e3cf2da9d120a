//! Character cursor with line tracking for the C lexer.

/// End-of-file sentinel character.
pub const EOF_CHAR: char = '\0';

/// A cursor over C source that tracks byte position and 1-based line.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    chars: std::str::Chars<'src>,
    pos: usize,
    line: usize,
}

impl<'src> Cursor<'src> {
    /// Create a new cursor over the given source.
    #[inline]
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.chars(),
            pos: 0,
            line: 1,
        }
    }

    /// Current byte position.
    #[inline]
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Current 1-based line.
    #[inline]
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    #[inline]
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Peek at the next character without consuming it.
    #[inline]
    #[must_use]
    pub fn first(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    /// Peek at the character after next.
    #[inline]
    #[must_use]
    pub fn second(&self) -> char {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next().unwrap_or(EOF_CHAR)
    }

    /// Consume and return the next character.
    #[inline]
    pub fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Consume characters while the predicate returns true.
    #[inline]
    pub fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while !self.is_eof() && predicate(self.first()) {
            self.bump();
        }
    }

    /// Consume a backslash-newline splice (`\` followed by `\n` or `\r\n`).
    pub fn eat_splice(&mut self) -> bool {
        if self.first() != '\\' {
            return false;
        }
        let rest = &self.source[self.pos + 1..];
        if rest.starts_with('\n') {
            self.bump();
            self.bump();
            true
        } else if rest.starts_with("\r\n") {
            self.bump();
            self.bump();
            self.bump();
            true
        } else {
            false
        }
    }

    /// Source text from `start` to the current position.
    #[inline]
    #[must_use]
    pub fn slice_from(&self, start: usize) -> &'src str {
        &self.source[start..self.pos]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_tracks_lines() {
        let mut cursor = Cursor::new("a\nb\n");
        assert_eq!(cursor.line(), 1);
        cursor.bump();
        cursor.bump();
        assert_eq!(cursor.line(), 2);
        assert_eq!(cursor.first(), 'b');
    }

    #[test]
    fn test_cursor_empty() {
        let cursor = Cursor::new("");
        assert!(cursor.is_eof());
        assert_eq!(cursor.first(), EOF_CHAR);
    }

    #[test]
    fn test_cursor_unicode_positions() {
        let mut cursor = Cursor::new("αb");
        cursor.bump();
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.first(), 'b');
    }

    #[test]
    fn test_eat_splice() {
        let mut cursor = Cursor::new("\\\nx");
        assert!(cursor.eat_splice());
        assert_eq!(cursor.first(), 'x');
        assert_eq!(cursor.line(), 2);
        let mut cursor = Cursor::new("\\x");
        assert!(!cursor.eat_splice());
    }

    #[test]
    fn test_eat_while_and_slice() {
        let mut cursor = Cursor::new("abc123 ");
        cursor.eat_while(char::is_alphanumeric);
        assert_eq!(cursor.slice_from(0), "abc123");
    }
}
