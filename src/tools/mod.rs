//! Batch evaluation of payload pairs
//!
//! A pair file holds one case per line, tab separated:
//!
//! ```text
//! # mode          first                           second                  expected
//! canonical-url   https://Example.com/Page/       https://example.com/Page   match
//! exact           café                            cafe                       no-match
//! ```
//!
//! The `expected` column is optional. Blank lines and `#` comments are skipped.

/// Line-fed decoder and stdin command parsing for interactive sessions
pub mod feed;

use crate::models::{CanonicalValue, NormalizationMode, UnknownModeError};
use crate::normalize::normalize;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to read or parse a pair file
#[derive(Debug, Error)]
pub enum PairsError {
    /// The file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// A line has fewer than three columns
    #[error("line {line}: expected `mode<TAB>first<TAB>second[<TAB>expected]`")]
    MissingColumns {
        /// 1-based line number
        line: usize,
    },
    /// The mode column is not a known mode
    #[error("line {line}: {source}")]
    Mode {
        /// 1-based line number
        line: usize,
        /// Parser error
        #[source]
        source: UnknownModeError,
    },
    /// The expected column is neither `match` nor `no-match`
    #[error("line {line}: expected `match` or `no-match`, found `{found}`")]
    Expectation {
        /// 1-based line number
        line: usize,
        /// Offending text
        found: String,
    },
}

/// One comparison to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairCase {
    /// 1-based line in the source file (0 when built in code)
    pub line: usize,
    /// Equivalence rule
    pub mode: NormalizationMode,
    /// First scanned payload
    pub first: String,
    /// Second scanned payload
    pub second: String,
    /// Expected verdict, if labelled
    pub expected: Option<bool>,
}

/// Result of one comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairReport {
    /// The case that was run
    #[serde(flatten)]
    pub case: PairCase,
    /// Canonical form of `first`
    pub first_canonical: CanonicalValue,
    /// Canonical form of `second`
    pub second_canonical: CanonicalValue,
    /// Whether the canonical forms are equal
    pub matched: bool,
}

impl PairReport {
    /// `Some(true)` when the verdict agrees with a labelled expectation
    pub fn agrees(&self) -> Option<bool> {
        self.case.expected.map(|expected| expected == self.matched)
    }
}

/// Totals over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Cases run
    pub total: usize,
    /// Cases that matched
    pub matched: usize,
    /// Cases with an expectation
    pub labelled: usize,
    /// Labelled cases whose verdict disagreed
    pub disagreements: usize,
}

fn parse_expected(text: &str, line: usize) -> Result<bool, PairsError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "match" | "yes" | "1" | "true" => Ok(true),
        "no-match" | "nomatch" | "no" | "0" | "false" => Ok(false),
        _ => Err(PairsError::Expectation {
            line,
            found: text.to_string(),
        }),
    }
}

/// Parse pair-file content
pub fn parse_pairs(content: &str) -> Result<Vec<PairCase>, PairsError> {
    let mut cases = Vec::new();
    for (idx, raw_line) in content.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // payload columns are kept verbatim; surrounding whitespace can matter
        let columns: Vec<&str> = raw_line.split('\t').collect();
        if columns.len() < 3 {
            return Err(PairsError::MissingColumns { line });
        }
        let mode = columns[0]
            .parse::<NormalizationMode>()
            .map_err(|source| PairsError::Mode { line, source })?;
        let expected = match columns.get(3) {
            Some(text) if !text.trim().is_empty() => Some(parse_expected(text, line)?),
            _ => None,
        };

        cases.push(PairCase {
            line,
            mode,
            first: columns[1].to_string(),
            second: columns[2].to_string(),
            expected,
        });
    }
    Ok(cases)
}

/// Read and parse a pair file
pub fn load_pairs<P: AsRef<Path>>(path: P) -> Result<Vec<PairCase>, PairsError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| PairsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_pairs(&content)
}

/// Normalize and compare one case
pub fn evaluate_pair(case: &PairCase) -> PairReport {
    let first_canonical = normalize(&case.first, case.mode);
    let second_canonical = normalize(&case.second, case.mode);
    PairReport {
        matched: first_canonical == second_canonical,
        case: case.clone(),
        first_canonical,
        second_canonical,
    }
}

/// Evaluate every case in parallel, preserving input order
pub fn evaluate_pairs(cases: &[PairCase]) -> Vec<PairReport> {
    cases.par_iter().map(evaluate_pair).collect()
}

/// Count totals over a batch
pub fn summarize(reports: &[PairReport]) -> BatchSummary {
    reports.iter().fold(BatchSummary::default(), |mut summary, report| {
        summary.total += 1;
        if report.matched {
            summary.matched += 1;
        }
        match report.agrees() {
            Some(true) => summary.labelled += 1,
            Some(false) => {
                summary.labelled += 1;
                summary.disagreements += 1;
            }
            None => {}
        }
        summary
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn write_temp_file(contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before UNIX epoch")
            .as_nanos();
        let sequence = TEMP_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        path.push(format!("qr_compare_pairs_{nanos}_{sequence}.tsv"));
        fs::write(&path, contents).expect("failed to write temp pair file");
        path
    }

    #[test]
    fn test_load_pairs_skips_comments_and_blank_lines() {
        let path = write_temp_file(
            "# mode\tfirst\tsecond\texpected\n\
             \n\
             canonical-url\thttps://Example.com/Page/?utm_source=x&b=2&a=1\thttps://example.com/Page?a=1&b=2\tmatch\n\
             exact\t  café  \tcafé\n",
        );
        let cases = load_pairs(&path).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].line, 3);
        assert_eq!(cases[0].expected, Some(true));
        assert_eq!(cases[1].first, "  café  ");
        assert_eq!(cases[1].expected, None);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        assert!(matches!(
            parse_pairs("exact\tonly-one-column"),
            Err(PairsError::MissingColumns { line: 1 })
        ));
        assert!(matches!(
            parse_pairs("\nfuzzy\ta\tb"),
            Err(PairsError::Mode { line: 2, .. })
        ));
        assert!(matches!(
            parse_pairs("exact\ta\tb\tmaybe"),
            Err(PairsError::Expectation { line: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_pairs("/nonexistent/qr_compare/pairs.tsv").unwrap_err();
        assert!(matches!(err, PairsError::Io { .. }));
    }

    #[test]
    fn test_evaluate_and_summarize() {
        let cases = parse_pairs(
            "exact\tA\ta\tno-match\n\
             domain-path\thttps://X.com/p/\thttps://x.com/p?q=1\tmatch\n\
             exact\tsame\tsame\tno-match\n\
             canonical-url\tnot a url\tnot a url\n",
        )
        .unwrap();
        let reports = evaluate_pairs(&cases);
        assert_eq!(reports.len(), 4);
        assert_eq!(reports[1].first_canonical, "x.com/p");
        assert_eq!(reports[2].agrees(), Some(false));

        let summary = summarize(&reports);
        assert_eq!(
            summary,
            BatchSummary {
                total: 4,
                matched: 3,
                labelled: 3,
                disagreements: 1,
            }
        );
    }
}
