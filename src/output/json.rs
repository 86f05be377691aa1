use crate::model::{Finding, QueryFailure, ScanReport};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

use super::Reporter;

/// Writes the whole [`ScanReport`] as pretty JSON once the scan ends.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn no_dependencies(&mut self, source: &Path) -> Result<()> {
        self.finish(&ScanReport::new(source, 0))
    }

    fn start(&mut self, _source: &Path, _extracted: usize) -> Result<()> {
        Ok(())
    }

    fn finding(&mut self, _finding: &Finding) -> Result<()> {
        Ok(())
    }

    fn failure(&mut self, _failure: &QueryFailure) -> Result<()> {
        Ok(())
    }

    fn finish(&mut self, report: &ScanReport) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, report)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dependency, Vulnerability};

    #[test]
    fn test_report_written_on_finish_only() {
        let mut reporter = JsonReporter::new(Vec::new());
        let finding = Finding {
            dependency: Dependency::new("minimist", "1.2.0"),
            vulnerabilities: vec![Vulnerability::new("GHSA-vh95-rmgr-6w4m", "Prototype Pollution")],
        };

        reporter.start(Path::new("package-lock.json"), 1).unwrap();
        reporter.finding(&finding).unwrap();
        assert!(reporter.out.is_empty());

        let mut report = ScanReport::new("package-lock.json", 1);
        report.queried = 1;
        report.record_finding(finding);
        reporter.finish(&report).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
        assert_eq!(value["source"], "package-lock.json");
        assert_eq!(value["total_vulnerabilities"], 1);
        assert_eq!(value["findings"][0]["dependency"]["name"], "minimist");
        assert_eq!(value["findings"][0]["vulnerabilities"][0]["id"], "GHSA-vh95-rmgr-6w4m");
    }

    #[test]
    fn test_no_dependencies_writes_empty_report() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.no_dependencies(Path::new("package-lock.json")).unwrap();

        let report: ScanReport = serde_json::from_slice(&reporter.into_inner()).unwrap();
        assert_eq!(report.extracted, 0);
        assert!(report.findings.is_empty());
    }
}
