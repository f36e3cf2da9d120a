//! LCOV report reader

use crate::result::{LinecovError, LinecovResult};
use serde::Serialize;
use std::collections::BTreeMap;

/// A parsed LCOV report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LcovReport {
    pub test_name: Option<String>,
    pub files: Vec<FileRecord>,
}

/// One `SF` ... `end_of_record` block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRecord {
    pub path: String,
    /// `DA` records by line
    pub lines: BTreeMap<usize, u64>,
    /// `LF` value, if present
    pub lines_found: Option<usize>,
    /// `LH` value, if present
    pub lines_hit: Option<usize>,
}

impl FileRecord {
    /// `LF`, or the number of `DA` records when absent
    #[must_use]
    pub fn found(&self) -> usize {
        self.lines_found.unwrap_or(self.lines.len())
    }

    /// `LH`, or the number of `DA` records with a non-zero count when absent
    #[must_use]
    pub fn hit(&self) -> usize {
        self.lines_hit
            .unwrap_or_else(|| self.lines.values().filter(|&&c| c > 0).count())
    }
}

/// Found/hit totals for one file or a whole report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub found: usize,
    pub hit: usize,
    pub percent: f64,
}

impl CoverageSummary {
    #[allow(clippy::cast_precision_loss)]
    fn new(found: usize, hit: usize) -> Self {
        let percent = if found == 0 {
            0.0
        } else {
            hit as f64 / found as f64 * 100.0
        };
        Self {
            found,
            hit,
            percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub path: String,
    #[serde(flatten)]
    pub coverage: CoverageSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub test_name: Option<String>,
    pub files: Vec<FileSummary>,
    pub total: CoverageSummary,
}

impl LcovReport {
    /// Per-file and total coverage
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        let files: Vec<FileSummary> = self
            .files
            .iter()
            .map(|f| FileSummary {
                path: f.path.clone(),
                coverage: CoverageSummary::new(f.found(), f.hit()),
            })
            .collect();
        let found = files.iter().map(|f| f.coverage.found).sum();
        let hit = files.iter().map(|f| f.coverage.hit).sum();
        ReportSummary {
            test_name: self.test_name.clone(),
            files,
            total: CoverageSummary::new(found, hit),
        }
    }

    /// Look up a file block by path
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// Parse LCOV text.
///
/// Record types other than `TN`, `SF`, `DA`, `LF`, `LH` and
/// `end_of_record` are ignored. A block left open at the end of input is
/// kept.
pub fn parse(text: &str) -> LinecovResult<LcovReport> {
    let mut report = LcovReport::default();
    let mut current: Option<FileRecord> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        if line == "end_of_record" {
            let record = current
                .take()
                .ok_or_else(|| LinecovError::report_parse(line_no, "end_of_record outside SF block"))?;
            report.files.push(record);
            continue;
        }

        let Some((tag, value)) = line.split_once(':') else {
            continue;
        };
        match tag {
            "TN" => report.test_name = Some(value.to_string()),
            "SF" => {
                if current.is_some() {
                    return Err(LinecovError::report_parse(line_no, "SF inside an open SF block"));
                }
                current = Some(FileRecord {
                    path: value.to_string(),
                    ..FileRecord::default()
                });
            }
            "DA" | "LF" | "LH" => {
                let record = current.as_mut().ok_or_else(|| {
                    LinecovError::report_parse(line_no, format!("{tag} outside SF block"))
                })?;
                match tag {
                    "DA" => {
                        let mut fields = value.split(',');
                        let source_line = number::<usize>(fields.next(), line_no, "DA line")?;
                        let count = number::<u64>(fields.next(), line_no, "DA count")?;
                        record.lines.insert(source_line, count);
                    }
                    "LF" => record.lines_found = Some(number(Some(value), line_no, "LF")?),
                    _ => record.lines_hit = Some(number(Some(value), line_no, "LH")?),
                }
            }
            _ => {}
        }
    }

    if let Some(record) = current {
        report.files.push(record);
    }
    Ok(report)
}

fn number<T: std::str::FromStr>(field: Option<&str>, line: usize, what: &str) -> LinecovResult<T> {
    let field = field.ok_or_else(|| LinecovError::report_parse(line, format!("missing {what}")))?;
    field
        .trim()
        .parse()
        .map_err(|_| LinecovError::report_parse(line, format!("invalid {what}: '{field}'")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = "TN:test\nSF:/p/main.c\nDA:5,1\nDA:6,3\nLH:2\nLF:5\nend_of_record\nSF:/p/math.c\nFN:1,add\nDA:3,1\nDA:5,0\nend_of_record\n";

    #[test]
    fn test_parse_sample() {
        let report = parse(SAMPLE).unwrap();
        assert_eq!(report.test_name.as_deref(), Some("test"));
        assert_eq!(report.files.len(), 2);
        let main = report.file("/p/main.c").unwrap();
        assert_eq!(main.lines.get(&6), Some(&3));
        assert_eq!(main.found(), 5);
        assert_eq!(main.hit(), 2);
        let math = report.file("/p/math.c").unwrap();
        assert_eq!(math.found(), 2);
        assert_eq!(math.hit(), 1);
    }

    #[test]
    fn test_summary_totals() {
        let summary = parse(SAMPLE).unwrap().summary();
        assert_eq!(summary.total.found, 7);
        assert_eq!(summary.total.hit, 3);
        assert!((summary.files[0].coverage.percent - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary_percent_zero() {
        let summary = parse("TN:\n").unwrap().summary();
        assert_eq!(summary.total.found, 0);
        assert!(summary.total.percent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_da_outside_block() {
        let err = parse("TN:x\nDA:1,1\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_bad_number() {
        let err = parse("SF:/a.c\nDA:one,1\n").unwrap_err();
        assert!(err.to_string().contains("invalid DA line"));
    }

    #[test]
    fn test_nested_sf_rejected() {
        assert!(parse("SF:/a.c\nSF:/b.c\n").is_err());
    }

    #[test]
    fn test_crlf_and_unterminated_block() {
        let report = parse("TN:t\r\nSF:/a.c\r\nDA:1,2\r\n").unwrap();
        assert_eq!(report.files[0].path, "/a.c");
        assert_eq!(report.files[0].lines.get(&1), Some(&2));
    }

    #[test]
    fn test_summary_serializes() {
        let json = serde_json::to_value(parse(SAMPLE).unwrap().summary()).unwrap();
        assert_eq!(json["total"]["found"], 7);
        assert_eq!(json["files"][0]["path"], "/p/main.c");
        assert_eq!(json["files"][0]["hit"], 2);
    }
}
