use crate::model::{Finding, QueryFailure, ScanReport};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

use super::Reporter;

/// Default width of a printed advisory summary, in characters.
pub const SUMMARY_MAX_CHARS: usize = 110;

const ELLIPSIS: char = '…';

/// Streams human-readable results as each dependency is checked.
pub struct TextReporter<W: Write> {
    out: W,
    summary_max_chars: usize,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W, summary_max_chars: usize) -> Self {
        Self {
            out,
            summary_max_chars,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn no_dependencies(&mut self, _source: &Path) -> Result<()> {
        writeln!(
            self.out,
            "⚠️  No dependencies found in lockfile (expected npm lockfile v2/v3)."
        )?;
        Ok(())
    }

    fn start(&mut self, source: &Path, extracted: usize) -> Result<()> {
        writeln!(
            self.out,
            "🔎 Scanning {} packages from: {}",
            extracted,
            source.display()
        )?;
        Ok(())
    }

    fn finding(&mut self, finding: &Finding) -> Result<()> {
        writeln!(
            self.out,
            "  🚨 {} — {} vuln(s)",
            finding.dependency,
            finding.vulnerabilities.len()
        )?;
        for vuln in &finding.vulnerabilities {
            writeln!(
                self.out,
                "     • {} — {}",
                vuln.id,
                one_line_summary(&vuln.summary, self.summary_max_chars)
            )?;
        }
        Ok(())
    }

    fn failure(&mut self, failure: &QueryFailure) -> Result<()> {
        writeln!(self.out, "  ❌ {} → {}", failure.dependency, failure.error)?;
        Ok(())
    }

    fn finish(&mut self, report: &ScanReport) -> Result<()> {
        if report.is_clean() {
            writeln!(
                self.out,
                "✅ No known vulnerabilities found for the packages in this lockfile (per OSV)."
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Reduces an advisory summary to one printable line.
///
/// Keeps the first line of the trimmed text; if that is longer than
/// `max_chars` characters it is cut there and an ellipsis appended.
pub fn one_line_summary(text: &str, max_chars: usize) -> String {
    let line = text.trim().lines().next().unwrap_or_default();

    match line.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &line[..cut], ELLIPSIS),
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dependency, Vulnerability};

    fn render(f: impl FnOnce(&mut TextReporter<Vec<u8>>)) -> String {
        let mut reporter = TextReporter::new(Vec::new(), SUMMARY_MAX_CHARS);
        f(&mut reporter);
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_one_line_summary_short_untouched() {
        assert_eq!(one_line_summary("Prototype Pollution", 110), "Prototype Pollution");
    }

    #[test]
    fn test_one_line_summary_truncates_long() {
        let long = "x".repeat(200);
        let summary = one_line_summary(&long, 110);

        assert_eq!(summary.chars().count(), 111);
        assert!(summary.starts_with(&"x".repeat(110)));
        assert!(summary.ends_with('…'));
    }

    #[test]
    fn test_one_line_summary_exact_width_untouched() {
        let exact = "y".repeat(110);
        assert_eq!(one_line_summary(&exact, 110), exact);
    }

    #[test]
    fn test_one_line_summary_first_line_only() {
        assert_eq!(
            one_line_summary("\n  ReDoS in parser\nMore details here.\n", 110),
            "ReDoS in parser"
        );
    }

    #[test]
    fn test_one_line_summary_counts_characters() {
        let wide = "é".repeat(120);
        let summary = one_line_summary(&wide, 110);
        assert_eq!(summary, format!("{}…", "é".repeat(110)));
    }

    #[test]
    fn test_one_line_summary_empty() {
        assert_eq!(one_line_summary("", 110), "");
        assert_eq!(one_line_summary("   \n ", 110), "");
    }

    #[test]
    fn test_finding_block() {
        let output = render(|r| {
            r.finding(&Finding {
                dependency: Dependency::new("lodash", "4.17.15"),
                vulnerabilities: vec![
                    Vulnerability::new("GHSA-p6mc-m468-83gw", "Prototype Pollution in lodash"),
                    Vulnerability::new(
                        "GHSA-35jh-r3h4-6jhm",
                        "Command Injection in lodash\nDetails",
                    ),
                ],
            })
            .unwrap();
        });

        assert_eq!(
            output,
            "  🚨 lodash@4.17.15 — 2 vuln(s)\n\
             \x20    • GHSA-p6mc-m468-83gw — Prototype Pollution in lodash\n\
             \x20    • GHSA-35jh-r3h4-6jhm — Command Injection in lodash\n"
        );
    }

    #[test]
    fn test_failure_line() {
        let output = render(|r| {
            r.failure(&QueryFailure {
                dependency: Dependency::new("left-pad", "1.3.0"),
                error: "OSV returned HTTP 503".to_string(),
            })
            .unwrap();
        });

        assert_eq!(output, "  ❌ left-pad@1.3.0 → OSV returned HTTP 503\n");
    }

    #[test]
    fn test_finish_clean_and_dirty() {
        let clean = ScanReport::new("package-lock.json", 3);
        let output = render(|r| r.finish(&clean).unwrap());
        assert!(output.starts_with("✅ No known vulnerabilities found"));

        let mut dirty = ScanReport::new("package-lock.json", 3);
        dirty.total_vulnerabilities = 1;
        let output = render(|r| r.finish(&dirty).unwrap());
        assert!(output.is_empty());
    }

    #[test]
    fn test_start_and_no_dependencies() {
        let output = render(|r| r.start(Path::new("app/package-lock.json"), 12).unwrap());
        assert_eq!(output, "🔎 Scanning 12 packages from: app/package-lock.json\n");

        let output = render(|r| r.no_dependencies(Path::new("package-lock.json")).unwrap());
        assert!(output.contains("No dependencies found in lockfile"));
    }
}
