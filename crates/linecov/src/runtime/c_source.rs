//! The C runtime translation unit, `linecov_runtime.c`.
//!
//! Compiled once per program next to the instrumented units. It owns the
//! registry, installs the report writer with `atexit` on the first
//! registration, and reports its own failures only through the file named
//! by `$LINECOV_DIAG`.

use crate::config::{InstrumentConfig, DIAG_ENV};
use crate::rewrite::{escape_c_string, FILE_STRUCT, REGISTER_FN};

/// File name of the runtime unit in an output tree
pub const RUNTIME_FILE: &str = "linecov_runtime.c";

const TEMPLATE: &str = r#"/* linecov runtime: file registry and LCOV writer. Generated; do not edit. */
#include <stdarg.h>
#include <stdio.h>
#include <stdlib.h>

@FILE_STRUCT@

#define LINECOV_CAPACITY @CAPACITY@
#define LINECOV_TEST_NAME @TEST_NAME@
#define LINECOV_REPORT @REPORT@
#define LINECOV_DIAG_ENV @DIAG_ENV@

static struct __linecov_file *__linecov_files[LINECOV_CAPACITY];
static int __linecov_count;
static int __linecov_installed;

static void __linecov_diag(const char *fmt, ...)
{
    const char *target = getenv(LINECOV_DIAG_ENV);
    FILE *out;
    va_list args;

    if (target == NULL || target[0] == '\0')
        return;
    out = fopen(target, "a");
    if (out == NULL)
        return;
    va_start(args, fmt);
    vfprintf(out, fmt, args);
    va_end(args);
    fputc('\n', out);
    fclose(out);
}

static void __linecov_write_report(void)
{
    FILE *out = fopen(LINECOV_REPORT, "w");
    int i;
    int line;

    if (out == NULL) {
        __linecov_diag("linecov: cannot open %s for writing", LINECOV_REPORT);
        return;
    }
    fprintf(out, "TN:%s\n", LINECOV_TEST_NAME);
    for (i = 0; i < __linecov_count; i++) {
        const struct __linecov_file *f = __linecov_files[i];
        int found = 0;
        int hit = 0;

        fprintf(out, "SF:%s\n", f->path);
        for (line = 1; line <= f->nlines; line++) {
            if (!f->mask[line])
                continue;
            found++;
            if (f->hits[line] > 0) {
                hit++;
                fprintf(out, "DA:%d,%lu\n", line, f->hits[line]);
            }
        }
        fprintf(out, "LH:%d\nLF:%d\nend_of_record\n", hit, found);
    }
    if (fclose(out) != 0)
        __linecov_diag("linecov: error while writing %s", LINECOV_REPORT);
}

void @REGISTER_FN@(struct __linecov_file *file)
{
    int i;

    for (i = 0; i < __linecov_count; i++)
        if (__linecov_files[i] == file)
            return;
    if (__linecov_count >= LINECOV_CAPACITY) {
        __linecov_diag("linecov: registry full (%d files), dropped %s",
                       LINECOV_CAPACITY, file->path);
        return;
    }
    __linecov_files[__linecov_count++] = file;
    if (!__linecov_installed) {
        __linecov_installed = 1;
        if (atexit(__linecov_write_report) != 0)
            __linecov_diag("linecov: atexit failed, no report will be written");
    }
}
"#;

/// Render the runtime unit for `config`
#[must_use]
pub fn runtime_source(config: &InstrumentConfig) -> String {
    TEMPLATE
        .replace("@FILE_STRUCT@", FILE_STRUCT)
        .replace("@CAPACITY@", &config.registry_capacity.to_string())
        .replace("@TEST_NAME@", &escape_c_string(&config.test_name))
        .replace("@REPORT@", &escape_c_string(config.report_file()))
        .replace("@DIAG_ENV@", &escape_c_string(DIAG_ENV))
        .replace("@REGISTER_FN@", REGISTER_FN)
}
