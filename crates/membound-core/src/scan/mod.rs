//! C/C++ source scanner.
//!
//! Checks that the input is a `.c`/`.cpp` file, masks comments, then runs
//! every rule of a [`RuleSet`] line by line. Regex rules match each line on
//! its own; the use-after-free rule keeps the set of identifiers passed to
//! `free()` and reports later mentions of them.
//!
//! The use-after-free tracking is lexical: it ignores scopes and control
//! flow, and treats a re-assignment (`p = ...`) or a re-declaration with an
//! initializer (`char *p = ...`) as making `p` valid again.

pub mod rules;
pub mod source;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use rules::{Matcher, RuleSet, Severity, VulnerabilityRule};
pub use source::{mask_source, validate_input_file};

lazy_static! {
    static ref FREE_CALL: Regex = Regex::new(r"\bfree\s*\(\s*([A-Za-z_]\w*)\s*\)").unwrap();
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("File does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid file extension: {extension} ({})", .path.display())]
    InvalidExtension { path: PathBuf, extension: String },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub rule: String,
    pub severity: Severity,
    /// 1-based.
    pub line: usize,
    /// 1-based, in characters.
    pub column: usize,
    pub snippet: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub file: String,
    pub findings: Vec<Finding>,
}

impl ScanReport {
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }

    pub fn count_by_severity(&self) -> BTreeMap<Severity, usize> {
        let mut counts = BTreeMap::new();
        for f in &self.findings {
            *counts.entry(f.severity).or_insert(0) += 1;
        }
        counts
    }
}

/// Validates `path`, reads it and scans it with `rules`.
pub fn scan_file(path: &Path, rules: &RuleSet) -> Result<ScanReport, ScanError> {
    validate_input_file(path)?;
    let bytes = std::fs::read(path).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let src = String::from_utf8_lossy(&bytes);
    let mut report = scan_source(&src, rules);
    report.file = path.display().to_string();
    tracing::info!(
        file = %report.file,
        findings = report.findings.len(),
        "scan complete"
    );
    Ok(report)
}

/// Scans in-memory source text. `file` in the returned report is empty.
pub fn scan_source(src: &str, rules: &RuleSet) -> ScanReport {
    let code = mask_source(src, false);
    let idents = mask_source(src, true);
    let original: Vec<&str> = src.lines().collect();
    let code_lines: Vec<&str> = code.lines().collect();
    let ident_lines: Vec<&str> = idents.lines().collect();

    let mut findings = Vec::new();
    for rule in rules.rules() {
        match &rule.matcher {
            Matcher::Regex(re) => {
                for (idx, line) in code_lines.iter().enumerate() {
                    for m in re.find_iter(line) {
                        findings.push(finding(rule, &original, line, idx, m.start()));
                    }
                }
            }
            Matcher::UseAfterFree => {
                let mut tracker = FreeTracker::new();
                for (idx, line) in ident_lines.iter().enumerate() {
                    for offset in tracker.step(line) {
                        findings.push(finding(rule, &original, line, idx, offset));
                    }
                }
            }
        }
    }

    findings.sort_by(|a, b| {
        (a.line, a.column, &a.rule).cmp(&(b.line, b.column, &b.rule))
    });
    ScanReport {
        file: String::new(),
        findings,
    }
}

fn finding(
    rule: &VulnerabilityRule,
    original: &[&str],
    masked_line: &str,
    idx: usize,
    byte_offset: usize,
) -> Finding {
    Finding {
        rule: rule.name.clone(),
        severity: rule.severity,
        line: idx + 1,
        column: masked_line[..byte_offset].chars().count() + 1,
        snippet: original
            .get(idx)
            .map(|l| l.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Identifiers released with `free()` and not yet re-assigned.
struct FreeTracker {
    released: Vec<(String, Regex)>,
}

impl FreeTracker {
    fn new() -> Self {
        Self {
            released: Vec::new(),
        }
    }

    /// Processes one masked line and returns byte offsets of uses of
    /// released identifiers (at most one per identifier).
    ///
    /// Mentions are visited left to right, so `free(p); p = NULL;` on one
    /// line leaves `p` valid while `free(p); *p = 0;` reports the write.
    fn step(&mut self, line: &str) -> Vec<usize> {
        let frees: Vec<(usize, usize)> = FREE_CALL
            .captures_iter(line)
            .filter_map(|cap| cap.get(1))
            .map(|m| (m.start(), m.end()))
            .collect();

        let before_line = self.released.len();
        for cap in FREE_CALL.captures_iter(line) {
            let name = &cap[1];
            if self.released.iter().any(|(n, _)| n == name) {
                continue;
            }
            if let Ok(re) = Regex::new(&format!(r"\b{}\b", regex::escape(name))) {
                self.released.push((name.to_string(), re));
            }
        }

        let mut uses = Vec::new();
        let mut idx = 0;
        self.released.retain(|(_, mention)| {
            let mut released = idx < before_line;
            idx += 1;
            let mut reported = false;
            for m in mention.find_iter(line) {
                let is_free_arg = frees.contains(&(m.start(), m.end()));
                if is_free_arg {
                    if released && !reported {
                        // Double free.
                        uses.push(m.start());
                        reported = true;
                    }
                    released = true;
                } else if released {
                    if is_reassignment(line, m.start(), m.end()) {
                        released = false;
                    } else if !reported {
                        uses.push(m.start());
                        reported = true;
                    }
                }
            }
            released
        });
        uses
    }
}

/// `p = ...` and `char *p = ...`, but not `*p = ...`, `p == ...` or `s.p = ...`.
fn is_reassignment(line: &str, start: usize, end: usize) -> bool {
    let after = line[end..].trim_start();
    if !after.starts_with('=') || after.starts_with("==") {
        return false;
    }
    let before = line[..start].trim_end();
    if before.ends_with(['.', '>', '[', '&']) {
        return false;
    }
    if before.ends_with('*') {
        // A type token before the stars makes this a declaration.
        let head = before.trim_end_matches(|c: char| c == '*' || c.is_whitespace());
        let token = head
            .rsplit(|c: char| !(c.is_alphanumeric() || c == '_'))
            .next()
            .unwrap_or("");
        return !token.is_empty() && token != "return";
    }
    true
}
