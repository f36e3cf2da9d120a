//! Generated C declarations placed at file scope of each instrumented unit.

use crate::classify::CountableMask;
use std::fmt::Write as _;

/// Descriptor layout shared by every instrumented unit and the runtime
pub(crate) const FILE_STRUCT: &str =
    "struct __linecov_file { const char *path; unsigned long *hits; int nlines; const unsigned char *mask; };";

/// Runtime entry point that adds a descriptor to the registry
pub(crate) const REGISTER_FN: &str = "__linecov_register";

/// Function defined in the `main` unit that registers every unit
pub(crate) const BOOT_FN: &str = "__linecov_boot";

pub(crate) fn hits_symbol(id: &str) -> String {
    format!("__linecov_hits_{id}")
}

pub(crate) fn register_symbol(id: &str) -> String {
    format!("__linecov_register_{id}")
}

/// Quote `text` as a C string literal. Anything outside printable ASCII is
/// written as an octal escape, and `?` is escaped so no trigraph can form.
#[must_use]
pub fn escape_c_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for byte in text.bytes() {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'?' => out.push_str("\\?"),
            0x20..=0x7e => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "\\{byte:03o}");
            }
        }
    }
    out.push('"');
    out
}

/// How a unit's registration function gets called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hook<'a> {
    /// Called from `__linecov_boot`, which this unit defines when it holds
    /// `main`. The slice lists every unit's id in plan order.
    Boot(Option<&'a [String]>),
    /// Marked as a load-time constructor
    Constructor,
}

pub(crate) struct Prologue<'a> {
    pub id: &'a str,
    pub path: &'a str,
    pub mask: &'a CountableMask,
    pub hook: Hook<'a>,
}

impl Prologue<'_> {
    /// Render as a single line with a trailing space and no newline
    pub(crate) fn render(&self) -> String {
        let id = self.id;
        let hits = hits_symbol(id);
        let register = register_symbol(id);
        let entries = self.mask.len();
        let line_count = self.mask.line_count();

        let mut out = String::with_capacity(512 + entries * 2);
        out.push_str(FILE_STRUCT);
        let _ = write!(out, " void {REGISTER_FN}(struct __linecov_file *);");
        let _ = write!(out, " static unsigned long {hits}[{entries}] = {{0}};");

        let _ = write!(out, " static const unsigned char __linecov_mask_{id}[{entries}] = {{");
        for (i, &countable) in self.mask.as_slice().iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push(if countable { '1' } else { '0' });
        }
        out.push_str("};");

        let _ = write!(
            out,
            " static struct __linecov_file __linecov_me_{id} = {{{}, {hits}, {line_count}, __linecov_mask_{id}}};",
            escape_c_string(self.path)
        );
        let _ = write!(out, " static int __linecov_done_{id};");

        let attribute = match self.hook {
            Hook::Constructor => "__attribute__((constructor)) ",
            Hook::Boot(_) => "",
        };
        let _ = write!(
            out,
            " {attribute}void {register}(void) {{ if (__linecov_done_{id}) return; __linecov_done_{id} = 1; {REGISTER_FN}(&__linecov_me_{id}); }}"
        );

        if let Hook::Boot(Some(all)) = self.hook {
            for other in all.iter().filter(|other| other.as_str() != id) {
                let _ = write!(out, " void {}(void);", register_symbol(other));
            }
            let _ = write!(out, " static void {BOOT_FN}(void) {{");
            for unit in all {
                let _ = write!(out, " {}();", register_symbol(unit));
            }
            out.push_str(" }");
        }
        out.push(' ');
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn mask() -> CountableMask {
        let mut mask = CountableMask::new(3);
        mask.mark(2);
        mask
    }

    #[test]
    fn test_escape_c_string() {
        assert_eq!(escape_c_string("/a/b.c"), "\"/a/b.c\"");
        assert_eq!(escape_c_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(escape_c_string("??="), "\"\\?\\?=\"");
        assert_eq!(escape_c_string("é"), "\"\\303\\251\"");
        assert_eq!(escape_c_string("tab\there"), "\"tab\\011here\"");
    }

    #[test]
    fn test_prologue_is_one_line() {
        let mask = mask();
        let text = Prologue {
            id: "a_1234abcd",
            path: "/src/a.c",
            mask: &mask,
            hook: Hook::Boot(None),
        }
        .render();
        assert!(!text.contains('\n'));
        assert!(text.contains("static unsigned long __linecov_hits_a_1234abcd[4] = {0};"));
        assert!(text.contains("__linecov_mask_a_1234abcd[4] = {0,0,1,0};"));
        assert!(text.contains("{\"/src/a.c\", __linecov_hits_a_1234abcd, 3, __linecov_mask_a_1234abcd}"));
        assert!(!text.contains(BOOT_FN));
        assert!(!text.contains("constructor"));
    }

    #[test]
    fn test_boot_calls_every_unit_in_order() {
        let mask = mask();
        let ids = vec!["main_1".to_string(), "util_2".to_string()];
        let text = Prologue {
            id: "main_1",
            path: "/src/main.c",
            mask: &mask,
            hook: Hook::Boot(Some(&ids)),
        }
        .render();
        assert!(text.contains(" void __linecov_register_util_2(void);"));
        assert!(text.contains(
            "static void __linecov_boot(void) { __linecov_register_main_1(); __linecov_register_util_2(); }"
        ));
    }

    #[test]
    fn test_constructor_hook() {
        let mask = mask();
        let text = Prologue {
            id: "lib_9",
            path: "/src/lib.c",
            mask: &mask,
            hook: Hook::Constructor,
        }
        .render();
        assert!(text.contains("__attribute__((constructor)) void __linecov_register_lib_9(void)"));
    }
}
