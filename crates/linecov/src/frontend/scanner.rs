//! Statement scanner
//!
//! Walks the token stream of one translation unit, splits it into external
//! declarations, and descends into every function body to record statement
//! spans. This is not a C parser: expressions are never analyzed, bracket
//! groups are skipped as opaque units, and declarations are recognized
//! heuristically (see [`Scanner::is_declaration`]).

use super::lexer::{tokenize, FreeLine, Token};
use super::line_count;
use crate::result::{LinecovError, LinecovResult};
use std::collections::HashSet;
use std::ops::Range;

/// Words that introduce or qualify a declaration.
const DECL_KEYWORDS: &[&str] = &[
    "auto", "bool", "char", "const", "double", "enum", "extern", "float", "inline", "int", "long",
    "register", "restrict", "short", "signed", "static", "struct", "typedef", "typeof", "union",
    "unsigned", "void", "volatile", "_Alignas", "_Atomic", "_Bool", "_Complex", "_Noreturn",
    "_Static_assert", "_Thread_local", "static_assert", "__inline", "__inline__", "__restrict",
    "__thread", "__typeof__",
];

/// Keywords that can never name a variable, type or label.
const STATEMENT_KEYWORDS: &[&str] = &[
    "break", "case", "continue", "default", "do", "else", "for", "goto", "if", "return", "sizeof",
    "switch", "while", "_Alignof", "_Generic",
];

/// Attribute-like wrappers whose parenthesized argument is not a declarator.
const ATTRIBUTE_WORDS: &[&str] = &[
    "__attribute__", "__attribute", "__declspec", "__asm__", "__asm", "asm",
];

/// Library typedefs recognized without seeing their definition.
const LIBRARY_TYPES: &[&str] = &["FILE", "DIR", "va_list", "jmp_buf", "sigjmp_buf"];

/// What a scanned statement is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    /// Expression statement, including macro invocations
    Expression,
    /// `return`, `break`, `continue` or `goto`
    Jump,
    /// Block-scope declaration
    Declaration {
        /// Contains `=` outside any bracket group
        has_initializer: bool,
    },
    /// `if` with the byte range of its controlling expression
    If { condition: Range<usize> },
    /// `while` with the byte range of its controlling expression
    While { condition: Range<usize> },
    /// `do ... while`; the condition sits on `condition_line`
    DoWhile {
        condition: Range<usize>,
        condition_line: usize,
    },
    /// `for`; `None` when the condition clause is empty
    For { condition: Option<Range<usize>> },
    /// `switch`
    Switch,
}

/// One statement inside a function body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementSpan {
    /// 1-based line of the first token
    pub start_line: usize,
    /// Byte offset of the first token
    pub start_byte: usize,
    /// Byte offset one past the last token
    pub end_byte: usize,
    pub kind: StatementKind,
    /// Direct body of `if`/`else`/`while`/`for`/`do` written without braces
    pub bare_body: bool,
}

/// A function definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    /// 1-based line where the definition starts
    pub line: usize,
    /// Bytes from the opening `{` to one past the closing `}`
    pub body: Range<usize>,
}

impl FunctionDef {
    #[must_use]
    pub fn is_main(&self) -> bool {
        self.name == "main"
    }

    /// Byte offset just after the opening brace
    #[must_use]
    pub fn body_entry(&self) -> usize {
        self.body.start + 1
    }
}

/// Everything the rewriter needs to know about one translation unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceModel {
    pub line_count: usize,
    pub functions: Vec<FunctionDef>,
    /// Statements in source order
    pub statements: Vec<StatementSpan>,
    /// Where file-scope text can be inserted without shifting lines: the
    /// first external declaration when it is outside any preprocessor
    /// conditional, else the first blank or comment-only line at file scope
    /// before any function definition
    pub prologue_anchor: Option<usize>,
}

impl SourceModel {
    /// The `main` definition, if this unit has one
    #[must_use]
    pub fn main_function(&self) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.is_main())
    }
}

/// Scan one translation unit
pub fn scan(path: &str, source: &str) -> LinecovResult<SourceModel> {
    let lexed = tokenize(source);
    let tokens = lexed.tokens;
    let matching = match_delimiters(path, source, &tokens)?;
    let mut scanner = Scanner {
        path,
        source,
        tokens: &tokens,
        matching,
        typedefs: HashSet::new(),
        functions: Vec::new(),
        statements: Vec::new(),
        declarations: Vec::new(),
    };
    let prologue_anchor = match scanner.external_declarations()? {
        Some(anchor) => Some(anchor),
        None => scanner.free_line_anchor(&lexed.free_lines),
    };
    // Enclosing statements are pushed after their bodies.
    scanner.statements.sort_by_key(|s| s.start_byte);
    Ok(SourceModel {
        line_count: line_count(source),
        functions: scanner.functions,
        statements: scanner.statements,
        prologue_anchor,
    })
}

fn match_delimiters(path: &str, source: &str, tokens: &[Token]) -> LinecovResult<Vec<Option<usize>>> {
    let mut matching = vec![None; tokens.len()];
    let mut stack: Vec<usize> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let text = token.text(source);
        let opener = match text {
            "(" | "[" | "{" => {
                stack.push(i);
                continue;
            }
            ")" => "(",
            "]" => "[",
            "}" => "{",
            _ => continue,
        };
        match stack.pop() {
            Some(open) if tokens[open].text(source) == opener => {
                matching[open] = Some(i);
                matching[i] = Some(open);
            }
            Some(open) => {
                return Err(LinecovError::frontend(
                    path,
                    token.line,
                    format!(
                        "'{text}' does not match '{}' opened on line {}",
                        tokens[open].text(source),
                        tokens[open].line
                    ),
                ));
            }
            None => {
                return Err(LinecovError::frontend(
                    path,
                    token.line,
                    format!("unexpected '{text}'"),
                ));
            }
        }
    }
    if let Some(open) = stack.pop() {
        return Err(LinecovError::frontend(
            path,
            tokens[open].line,
            format!("'{}' is never closed", tokens[open].text(source)),
        ));
    }
    Ok(matching)
}

struct Scanner<'a> {
    path: &'a str,
    source: &'a str,
    tokens: &'a [Token],
    matching: Vec<Option<usize>>,
    typedefs: HashSet<String>,
    functions: Vec<FunctionDef>,
    statements: Vec<StatementSpan>,
    /// Byte spans of external declarations, up to the first function
    /// definition inclusive
    declarations: Vec<Range<usize>>,
}

impl<'a> Scanner<'a> {
    fn text(&self, i: usize) -> &'a str {
        self.tokens.get(i).map_or("", |t| t.text(self.source))
    }

    fn is(&self, i: usize, text: &str) -> bool {
        self.text(i) == text
    }

    fn is_keyword(&self, i: usize) -> bool {
        let text = self.text(i);
        DECL_KEYWORDS.contains(&text) || STATEMENT_KEYWORDS.contains(&text)
    }

    fn is_plain_ident(&self, i: usize) -> bool {
        self.tokens.get(i).is_some_and(Token::is_ident) && !self.is_keyword(i)
    }

    /// Partner of a delimiter; delimiters were verified balanced up front.
    fn close(&self, i: usize) -> usize {
        self.matching.get(i).copied().flatten().unwrap_or(i)
    }

    /// Index past the token at `i`, jumping over a whole group if it opens one.
    fn skip(&self, i: usize) -> usize {
        match self.text(i) {
            "(" | "[" | "{" => self.close(i) + 1,
            _ => i + 1,
        }
    }

    fn error(&self, i: usize, message: impl Into<String>) -> LinecovError {
        let line = self
            .tokens
            .get(i)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line);
        LinecovError::frontend(self.path, line, message)
    }

    fn byte_range(&self, from: usize, to: usize) -> Option<Range<usize>> {
        (from < to).then(|| self.tokens[from].start..self.tokens[to - 1].end)
    }

    fn external_declarations(&mut self) -> LinecovResult<Option<usize>> {
        let n = self.tokens.len();
        let mut anchor = None;
        let mut seen_first = false;
        let mut i = 0;

        while i < n {
            if self.is(i, ";") {
                i += 1;
                continue;
            }
            if !seen_first {
                seen_first = true;
                if self.tokens[i].cond_depth == 0 {
                    anchor = Some(self.tokens[i].start);
                }
            }

            let start = i;
            let mut j = i;
            let mut body = None;
            while j < n {
                match self.text(j) {
                    ";" => break,
                    "{" => {
                        if let Some(params) = self.parameter_list(start, j) {
                            body = Some((params, j));
                            break;
                        }
                        j = self.close(j) + 1;
                    }
                    _ => j = self.skip(j),
                }
            }

            let last = body.map_or(j.min(n - 1), |(_, open)| self.close(open));
            if self.functions.is_empty() {
                self.declarations
                    .push(self.tokens[start].start..self.tokens[last].end);
            }

            match body {
                Some((params, open)) => {
                    let close = self.close(open);
                    let function = FunctionDef {
                        name: self.function_name(params),
                        line: self.tokens[start].line,
                        body: self.tokens[open].start..self.tokens[close].end,
                    };
                    self.functions.push(function);
                    self.block(open)?;
                    i = close + 1;
                }
                None => {
                    if self.is(start, "typedef") {
                        self.collect_typedefs(start + 1, j.min(n));
                    }
                    i = j + 1;
                }
            }
        }
        Ok(anchor)
    }

    fn free_line_anchor(&self, free_lines: &[FreeLine]) -> Option<usize> {
        // Only the last span can be a function definition.
        let limit = if self.functions.is_empty() {
            usize::MAX
        } else {
            self.declarations.last().map_or(usize::MAX, |span| span.start)
        };
        free_lines
            .iter()
            .filter(|free| free.cond_depth == 0 && free.start < limit)
            .find(|free| {
                !self
                    .declarations
                    .iter()
                    .any(|span| span.start < free.start && free.start < span.end)
            })
            .map(|free| free.start)
    }

    /// If the brace at `brace` opens a function body, return the index of the
    /// `(` of its parameter list. Attribute groups between the declarator
    /// and the body are skipped.
    fn parameter_list(&self, start: usize, brace: usize) -> Option<usize> {
        let mut end = brace;
        while end > start {
            let last = end - 1;
            if !self.is(last, ")") {
                return None;
            }
            let open = self.close(last);
            if open <= start {
                return None;
            }
            if ATTRIBUTE_WORDS.contains(&self.text(open - 1)) {
                end = open - 1;
                continue;
            }
            let declarator = self.is_plain_ident(open - 1) || self.is(open - 1, ")");
            return declarator.then_some(open);
        }
        None
    }

    fn function_name(&self, params: usize) -> String {
        if self.is_plain_ident(params - 1) {
            return self.text(params - 1).to_string();
        }
        // Declarator in parentheses, e.g. `int (*handler(int))(void)`.
        let inner_open = self.close(params - 1);
        let inner = inner_open + 1..params - 1;
        inner
            .clone()
            .find(|&k| self.is_plain_ident(k) && self.is(k + 1, "("))
            .or_else(|| inner.rev().find(|&k| self.is_plain_ident(k)))
            .map_or_else(String::new, |k| self.text(k).to_string())
    }

    /// Record the names declared by a `typedef` spanning `from..to`.
    fn collect_typedefs(&mut self, from: usize, to: usize) {
        let mut part_start = from;
        let mut k = from;
        while k <= to {
            if k == to || self.is(k, ",") || self.is(k, ";") {
                if let Some(name) = self.declared_name(part_start, k) {
                    self.typedefs.insert(name.to_string());
                }
                part_start = k + 1;
                if k == to || self.is(k, ";") {
                    break;
                }
                k += 1;
            } else {
                k = self.skip(k);
            }
        }
    }

    fn declared_name(&self, from: usize, to: usize) -> Option<&'a str> {
        let mut name = None;
        let mut first_group = None;
        let mut k = from;
        while k < to {
            if self.is(k, "(") && first_group.is_none() {
                first_group = Some(k);
            }
            if self.is_plain_ident(k) && !ATTRIBUTE_WORDS.contains(&self.text(k)) {
                name = Some(self.text(k));
            }
            k = self.skip(k);
        }
        name.or_else(|| {
            let open = first_group?;
            (open + 1..self.close(open))
                .find(|&k| self.is_plain_ident(k))
                .map(|k| self.text(k))
        })
    }

    /// Scan a compound statement; returns the index after its `}`.
    fn block(&mut self, open: usize) -> LinecovResult<usize> {
        let close = self.close(open);
        let mut i = open + 1;
        while i < close {
            i = self.statement(i, close, false)?;
        }
        Ok(close + 1)
    }

    fn statement(&mut self, i: usize, limit: usize, bare: bool) -> LinecovResult<usize> {
        if i >= limit {
            return Ok(limit);
        }
        match self.text(i) {
            "{" => self.block(i),
            ";" => Ok(i + 1),
            "if" => {
                let (condition, after) = self.condition(i)?;
                let mut end = self.statement(after, limit, true)?;
                if end < limit && self.is(end, "else") {
                    end = self.statement(end + 1, limit, true)?;
                }
                self.push(i, end, StatementKind::If { condition }, bare);
                Ok(end)
            }
            "while" => {
                let (condition, after) = self.condition(i)?;
                let end = self.statement(after, limit, true)?;
                self.push(i, end, StatementKind::While { condition }, bare);
                Ok(end)
            }
            "do" => {
                let body_end = self.statement(i + 1, limit, true)?;
                if !self.is(body_end, "while") {
                    return Err(self.error(body_end, "expected 'while' after 'do' body"));
                }
                let (condition, after) = self.condition(body_end)?;
                let end = if self.is(after, ";") { after + 1 } else { after };
                let condition_line = self.tokens[body_end].line;
                self.push(
                    i,
                    end,
                    StatementKind::DoWhile {
                        condition,
                        condition_line,
                    },
                    bare,
                );
                Ok(end)
            }
            "for" => {
                if !self.is(i + 1, "(") {
                    return Err(self.error(i, "expected '(' after 'for'"));
                }
                let close = self.close(i + 1);
                let mut semicolons = Vec::with_capacity(2);
                let mut k = i + 2;
                while k < close {
                    if self.is(k, ";") {
                        semicolons.push(k);
                    }
                    k = self.skip(k);
                }
                let [first, second] = semicolons[..] else {
                    return Err(self.error(i, "malformed 'for' header"));
                };
                let condition = self.byte_range(first + 1, second);
                let end = self.statement(close + 1, limit, true)?;
                self.push(i, end, StatementKind::For { condition }, bare);
                Ok(end)
            }
            "switch" => {
                let (_, after) = self.condition(i)?;
                let end = self.statement(after, limit, true)?;
                self.push(i, end, StatementKind::Switch, bare);
                Ok(end)
            }
            "case" => {
                let colon = self.case_colon(i + 1, limit)?;
                self.statement(colon + 1, limit, bare)
            }
            "default" if self.is(i + 1, ":") => self.statement(i + 2, limit, bare),
            "else" => Err(self.error(i, "'else' without a matching 'if'")),
            "return" | "break" | "continue" | "goto" => {
                let end = self.simple_end(i, limit);
                self.push(i, end, StatementKind::Jump, bare);
                Ok(end)
            }
            _ if self.is_plain_ident(i) && self.is(i + 1, ":") => {
                self.statement(i + 2, limit, bare)
            }
            _ => self.simple(i, limit, bare),
        }
    }

    /// Parenthesized controlling expression after the keyword at `keyword`.
    /// Returns its byte range and the index after `)`.
    fn condition(&self, keyword: usize) -> LinecovResult<(Range<usize>, usize)> {
        let open = keyword + 1;
        if !self.is(open, "(") {
            return Err(self.error(
                keyword,
                format!("expected '(' after '{}'", self.text(keyword)),
            ));
        }
        let close = self.close(open);
        let range = self
            .byte_range(open + 1, close)
            .ok_or_else(|| self.error(open, "empty condition"))?;
        Ok((range, close + 1))
    }

    fn case_colon(&self, from: usize, limit: usize) -> LinecovResult<usize> {
        let mut pending_ternary = 0usize;
        let mut k = from;
        while k < limit {
            match self.text(k) {
                "?" => pending_ternary += 1,
                ":" if pending_ternary == 0 => return Ok(k),
                ":" => pending_ternary -= 1,
                _ => {}
            }
            k = self.skip(k);
        }
        Err(self.error(from, "expected ':' after 'case'"))
    }

    fn simple_end(&self, i: usize, limit: usize) -> usize {
        let mut k = i;
        while k < limit {
            if self.is(k, ";") {
                return k + 1;
            }
            k = self.skip(k);
        }
        limit
    }

    /// Expression statement or declaration. A macro used as a loop header,
    /// `name(args) { ... }`, ends at its block, which is scanned as a body.
    fn simple(&mut self, i: usize, limit: usize, bare: bool) -> LinecovResult<usize> {
        if self.is_plain_ident(i) && self.is(i + 1, "(") {
            let after_args = self.close(i + 1) + 1;
            if after_args < limit && self.is(after_args, "{") {
                let end = self.block(after_args)?;
                self.push(i, end, StatementKind::Expression, bare);
                return Ok(end);
            }
        }

        let end = self.simple_end(i, limit);
        let kind = if self.is_declaration(i) {
            if self.is(i, "typedef") {
                self.collect_typedefs(i + 1, end);
            }
            StatementKind::Declaration {
                has_initializer: self.has_initializer(i, end),
            }
        } else {
            StatementKind::Expression
        };
        self.push(i, end, kind, bare);
        Ok(end)
    }

    /// Declarations start with a declaration keyword, a known type name
    /// followed by a declarator, or two adjacent identifiers.
    fn is_declaration(&self, i: usize) -> bool {
        let text = self.text(i);
        if DECL_KEYWORDS.contains(&text) {
            return true;
        }
        if !self.is_plain_ident(i) {
            return false;
        }
        let next_is_ident = self.tokens.get(i + 1).is_some_and(Token::is_ident);
        let known_type = self.typedefs.contains(text)
            || LIBRARY_TYPES.contains(&text)
            || text.ends_with("_t");
        next_is_ident || (known_type && self.is(i + 1, "*"))
    }

    fn has_initializer(&self, i: usize, end: usize) -> bool {
        let mut k = i;
        while k < end {
            if self.is(k, "=") {
                return true;
            }
            k = self.skip(k);
        }
        false
    }

    fn push(&mut self, first: usize, end: usize, kind: StatementKind, bare: bool) {
        let last = end.saturating_sub(1).max(first);
        self.statements.push(StatementSpan {
            start_line: self.tokens[first].line,
            start_byte: self.tokens[first].start,
            end_byte: self.tokens[last].end,
            kind,
            bare_body: bare,
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(usize, StatementKind)> {
        scan("t.c", source)
            .unwrap()
            .statements
            .into_iter()
            .map(|s| (s.start_line, s.kind))
            .collect()
    }

    #[test]
    fn test_function_detection() {
        let src = "static int add(int a, int b) { return a + b; }\nint main(void)\n{\n  return add(1, 2);\n}\n";
        let model = scan("t.c", src).unwrap();
        let names: Vec<&str> = model.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["add", "main"]);
        assert!(model.main_function().is_some());
        assert_eq!(model.main_function().unwrap().line, 2);
        assert_eq!(&src[model.functions[1].body.clone()], "{\n  return add(1, 2);\n}");
    }

    #[test]
    fn test_struct_with_attribute_is_not_a_function() {
        let src = "typedef struct __attribute__((packed)) { int a; } S;\nint f(void) { return 0; }\n";
        let model = scan("t.c", src).unwrap();
        assert_eq!(model.functions.len(), 1);
        assert_eq!(model.functions[0].name, "f");
    }

    #[test]
    fn test_prototype_is_not_a_function() {
        let model = scan("t.c", "int f(void);\nint g = 3;\n").unwrap();
        assert!(model.functions.is_empty());
        assert!(model.statements.is_empty());
    }

    #[test]
    fn test_parenthesized_declarator_name() {
        let src = "void (*handler(int sig))(int) { return 0; }\n";
        let model = scan("t.c", src).unwrap();
        assert_eq!(model.functions[0].name, "handler");
    }

    #[test]
    fn test_statement_kinds() {
        let src = "int f(int n) {\n  int a;\n  int b = n;\n  if (a) b++;\n  while (n--) { a += b; }\n  for (;;) break;\n  switch (n) { case 1: a = 2; break; default: ; }\n  return a;\n}\n";
        let k = kinds(src);
        assert!(k.contains(&(2, StatementKind::Declaration { has_initializer: false })));
        assert!(k.contains(&(3, StatementKind::Declaration { has_initializer: true })));
        assert!(matches!(k.iter().find(|(l, _)| *l == 4).unwrap().1, StatementKind::If { .. }));
        assert!(k.contains(&(6, StatementKind::For { condition: None })));
        assert!(k.contains(&(7, StatementKind::Switch)));
        assert!(k.contains(&(8, StatementKind::Jump)));
    }

    #[test]
    fn test_condition_ranges() {
        let src = "void f(int i) {\n  for (i = 0; i < 10; i++) {}\n  if ( i > 2 ) {}\n}\n";
        let model = scan("t.c", src).unwrap();
        let conds: Vec<&str> = model
            .statements
            .iter()
            .filter_map(|s| match &s.kind {
                StatementKind::For { condition: Some(r) } | StatementKind::If { condition: r } => {
                    Some(&src[r.clone()])
                }
                _ => None,
            })
            .collect();
        assert_eq!(conds, vec!["i < 10", "i > 2"]);
    }

    #[test]
    fn test_bare_bodies_flagged() {
        let src = "void f(int x) {\n  if (x)\n    g();\n  else\n    h();\n  k();\n}\n";
        let model = scan("t.c", src).unwrap();
        let bare: Vec<(usize, bool)> = model
            .statements
            .iter()
            .filter(|s| s.kind == StatementKind::Expression)
            .map(|s| (s.start_line, s.bare_body))
            .collect();
        assert_eq!(bare, vec![(3, true), (5, true), (6, false)]);
    }

    #[test]
    fn test_do_while_condition_line() {
        let src = "void f(int x) {\n  do {\n    x--;\n  } while (x > 0);\n}\n";
        let model = scan("t.c", src).unwrap();
        let dw = model
            .statements
            .iter()
            .find_map(|s| match &s.kind {
                StatementKind::DoWhile { condition, condition_line } => Some((condition.clone(), *condition_line)),
                _ => None,
            })
            .unwrap();
        assert_eq!(&src[dw.0], "x > 0");
        assert_eq!(dw.1, 4);
    }

    #[test]
    fn test_labels_and_cases_pass_through() {
        let src = "int f(int x) {\n  switch (x) {\n  case 1 ? 2 : 3: return 1;\n  }\nout:\n  return 0;\n}\n";
        let k = kinds(src);
        assert!(k.contains(&(3, StatementKind::Jump)));
        assert!(k.contains(&(6, StatementKind::Jump)));
    }

    #[test]
    fn test_typedef_names_make_declarations() {
        let src = "typedef struct node { int v; } node;\ntypedef int (*cb)(int);\nvoid f(void) {\n  node *n;\n  cb c = 0;\n  size_t *s;\n  a * b;\n}\n";
        let k = kinds(src);
        assert!(k.contains(&(4, StatementKind::Declaration { has_initializer: false })));
        assert!(k.contains(&(5, StatementKind::Declaration { has_initializer: true })));
        assert!(k.contains(&(6, StatementKind::Declaration { has_initializer: false })));
        assert!(k.contains(&(7, StatementKind::Expression)));
    }

    #[test]
    fn test_initializer_inside_braces_ignored() {
        let src = "void f(void) {\n  struct s x;\n  int y[2] = {1, 2};\n  int z == 0;\n}\n";
        let k = kinds(src);
        assert!(k.contains(&(2, StatementKind::Declaration { has_initializer: false })));
        assert!(k.contains(&(3, StatementKind::Declaration { has_initializer: true })));
        assert!(k.contains(&(4, StatementKind::Declaration { has_initializer: false })));
    }

    #[test]
    fn test_macro_loop_header_scans_body() {
        let src = "void f(void) {\n  list_for_each(p, head) {\n    use(p);\n  }\n  done();\n}\n";
        let lines: Vec<usize> = kinds(src).into_iter().map(|(l, _)| l).collect();
        assert_eq!(lines, vec![2, 3, 5]);
    }

    #[test]
    fn test_anchor_skips_directives_and_conditionals() {
        let src = "#include <stdio.h>\n\nint g = 1;\n";
        let model = scan("t.c", src).unwrap();
        assert_eq!(model.prologue_anchor, Some(src.find("int").unwrap()));

        let src = "#ifdef X\nint g;\n#endif\nint main(void) { return 0; }\n";
        let model = scan("t.c", src).unwrap();
        assert_eq!(model.prologue_anchor, None);

        let model = scan("t.c", "/* nothing */\n").unwrap();
        assert_eq!(model.prologue_anchor, Some(0));
    }

    #[test]
    fn test_anchor_falls_back_to_free_line() {
        let src = "#ifdef X\nint g;\n#endif\n\n// entry\nint main(void) { return 0; }\n";
        let model = scan("t.c", src).unwrap();
        assert_eq!(model.prologue_anchor, Some(src.find("\n\n").unwrap() + 1));
    }

    #[test]
    fn test_anchor_ignores_unsafe_free_lines() {
        // Inside a conditional, inside a declaration, after the first function.
        let src = "#ifdef X\n\nint g;\n#endif\nint a[] = {\n\n  1 };\nvoid f(void)\n{\n\n}\n\nint z;\n";
        let model = scan("t.c", src).unwrap();
        assert_eq!(model.prologue_anchor, None);
    }

    #[test]
    fn test_unbalanced_reports_line() {
        let err = scan("bad.c", "int f(void) {\n  if (x {\n}\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("bad.c:"), "{msg}");
    }

    #[test]
    fn test_stray_else_is_error() {
        assert!(scan("t.c", "void f(void) { else x(); }").is_err());
    }
}
