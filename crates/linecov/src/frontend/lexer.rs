//! C tokenizer
//!
//! Produces just enough of a token stream to find statement boundaries:
//! identifiers, numbers, string/char literals and punctuators. Comments and
//! whitespace vanish. Preprocessor directives vanish too, but `#if`-family
//! nesting is recorded on every token so callers can tell whether a token
//! lives inside conditional code.

use super::cursor::Cursor;

/// Multi-character punctuators, longest first.
const PUNCTUATORS: &[&str] = &[
    "<<=", ">>=", "...", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "*=",
    "/=", "%=", "+=", "-=", "&=", "^=", "|=", "##",
];

/// Token category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword
    Ident,
    /// Preprocessing number
    Number,
    /// String literal, including encoding prefix
    Str,
    /// Character literal, including encoding prefix
    Char,
    /// Operator or punctuator
    Punct,
}

/// A lexed token. Text is recovered from the source via the byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// 1-based line of the first character
    pub line: usize,
    /// Number of enclosing `#if`/`#ifdef`/`#ifndef` groups
    pub cond_depth: u32,
}

impl Token {
    /// Source text of this token
    #[inline]
    #[must_use]
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }

    #[inline]
    #[must_use]
    pub fn is_ident(&self) -> bool {
        self.kind == TokenKind::Ident
    }
}

/// A physical line holding no token and no directive, whose first byte is
/// outside any comment or literal. Text inserted at `start` lands at file
/// scope if the line is between external declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeLine {
    /// 1-based line number
    pub line: usize,
    /// Byte offset of the first character of the line
    pub start: usize,
    /// Number of enclosing `#if`/`#ifdef`/`#ifndef` groups
    pub cond_depth: u32,
}

/// Tokens and free lines of one translation unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    /// Ascending by line
    pub free_lines: Vec<FreeLine>,
}

/// Tokenize C source text
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    tokenize(source).tokens
}

/// Tokenize C source text and record its free lines
#[must_use]
pub fn tokenize(source: &str) -> Lexed {
    Lexer::new(source).run()
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$' || !c.is_ascii()
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || !c.is_ascii()
}

struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    tokens: Vec<Token>,
    free_lines: Vec<FreeLine>,
    /// Current line, while it has shown nothing but whitespace and comments
    pending_free: Option<FreeLine>,
    at_line_start: bool,
    cond_depth: u32,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            cursor: Cursor::new(source),
            tokens: Vec::new(),
            free_lines: Vec::new(),
            pending_free: None,
            at_line_start: true,
            cond_depth: 0,
        }
    }

    fn run(mut self) -> Lexed {
        let mut checked_line = 0;
        while !self.cursor.is_eof() {
            if self.cursor.line() != checked_line && self.at_physical_line_start() {
                checked_line = self.cursor.line();
                self.note_free_line();
            }
            let c = self.cursor.first();
            if c == '\n' {
                self.free_lines.extend(self.pending_free.take());
                self.cursor.bump();
                self.at_line_start = true;
            } else if c.is_whitespace() {
                self.cursor.bump();
            } else if c == '\\' && self.cursor.eat_splice() {
                continue;
            } else if c == '/' && self.cursor.second() == '/' {
                self.line_comment();
            } else if c == '/' && self.cursor.second() == '*' {
                self.block_comment();
            } else if c == '#' && self.at_line_start {
                self.pending_free = None;
                self.directive();
            } else {
                self.pending_free = None;
                self.at_line_start = false;
                self.token();
            }
        }
        self.free_lines.extend(self.pending_free.take());
        Lexed {
            tokens: self.tokens,
            free_lines: self.free_lines,
        }
    }

    /// The cursor sits on the first byte of a physical line that does not
    /// continue the previous one through a backslash splice.
    fn at_physical_line_start(&self) -> bool {
        let before = &self.source[..self.cursor.pos()];
        if before.is_empty() {
            return true;
        }
        let Some(rest) = before.strip_suffix('\n') else {
            return false;
        };
        !rest.strip_suffix('\r').unwrap_or(rest).ends_with('\\')
    }

    fn note_free_line(&mut self) {
        let start = self.cursor.pos();
        let text = self.source[start..].split('\n').next().unwrap_or("");
        let content = text.trim_start_matches([' ', '\t', '\r', '\x0b', '\x0c']);
        let free = content.is_empty() || content.starts_with("//") || content.starts_with("/*");
        self.pending_free = free.then(|| FreeLine {
            line: self.cursor.line(),
            start,
            cond_depth: self.cond_depth,
        });
    }

    fn line_comment(&mut self) {
        loop {
            self.cursor.eat_while(|c| c != '\n' && c != '\\');
            if self.cursor.is_eof() || self.cursor.first() == '\n' {
                break;
            }
            // A spliced newline continues the comment; any other backslash is text.
            if !self.cursor.eat_splice() {
                self.cursor.bump();
            }
        }
    }

    fn block_comment(&mut self) {
        self.cursor.bump();
        self.cursor.bump();
        while !self.cursor.is_eof() {
            if self.cursor.first() == '*' && self.cursor.second() == '/' {
                self.cursor.bump();
                self.cursor.bump();
                return;
            }
            self.cursor.bump();
        }
    }

    fn directive(&mut self) {
        self.cursor.bump();
        self.cursor
            .eat_while(|c| c == ' ' || c == '\t' || c == '\x0b' || c == '\x0c');
        let name_start = self.cursor.pos();
        self.cursor.eat_while(is_ident_continue);
        match self.cursor.slice_from(name_start) {
            "if" | "ifdef" | "ifndef" => self.cond_depth += 1,
            "endif" => self.cond_depth = self.cond_depth.saturating_sub(1),
            _ => {}
        }

        while !self.cursor.is_eof() {
            let c = self.cursor.first();
            if c == '\n' {
                break;
            }
            if self.cursor.eat_splice() {
                continue;
            }
            if c == '/' && self.cursor.second() == '*' {
                self.block_comment();
            } else if c == '/' && self.cursor.second() == '/' {
                self.line_comment();
            } else if c == '"' || c == '\'' {
                self.quoted(c);
            } else {
                self.cursor.bump();
            }
        }
    }

    /// Consume a quoted literal. Stops at an unescaped newline so an
    /// unterminated literal never swallows the rest of the file.
    fn quoted(&mut self, quote: char) {
        self.cursor.bump();
        while !self.cursor.is_eof() {
            let c = self.cursor.first();
            if c == '\\' {
                if self.cursor.eat_splice() {
                    continue;
                }
                self.cursor.bump();
                if !self.cursor.is_eof() && self.cursor.first() != '\n' {
                    self.cursor.bump();
                }
            } else if c == quote {
                self.cursor.bump();
                return;
            } else if c == '\n' {
                return;
            } else {
                self.cursor.bump();
            }
        }
    }

    fn token(&mut self) {
        let start = self.cursor.pos();
        let line = self.cursor.line();
        let c = self.cursor.first();

        let kind = if is_ident_start(c) {
            self.cursor.eat_while(is_ident_continue);
            let next = self.cursor.first();
            let prefixed = matches!(self.cursor.slice_from(start), "L" | "u" | "U" | "u8");
            if prefixed && (next == '"' || next == '\'') {
                self.quoted(next);
                if next == '"' {
                    TokenKind::Str
                } else {
                    TokenKind::Char
                }
            } else {
                TokenKind::Ident
            }
        } else if c.is_ascii_digit() || (c == '.' && self.cursor.second().is_ascii_digit()) {
            self.number();
            TokenKind::Number
        } else if c == '"' {
            self.quoted('"');
            TokenKind::Str
        } else if c == '\'' {
            self.quoted('\'');
            TokenKind::Char
        } else {
            let rest = &self.source[start..];
            match PUNCTUATORS.iter().find(|p| rest.starts_with(**p)) {
                Some(p) => {
                    for _ in 0..p.len() {
                        self.cursor.bump();
                    }
                }
                None => {
                    self.cursor.bump();
                }
            }
            TokenKind::Punct
        };

        self.tokens.push(Token {
            kind,
            start,
            end: self.cursor.pos(),
            line,
            cond_depth: self.cond_depth,
        });
    }

    fn number(&mut self) {
        let mut prev = '\0';
        while !self.cursor.is_eof() {
            let c = self.cursor.first();
            let exponent_sign = (c == '+' || c == '-') && matches!(prev, 'e' | 'E' | 'p' | 'P');
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                self.cursor.bump();
                prev = c;
            } else {
                break;
            }
        }
    }
}
