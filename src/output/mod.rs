mod json;
mod text;

pub use json::JsonReporter;
pub use text::{one_line_summary, TextReporter, SUMMARY_MAX_CHARS};

use crate::model::{Finding, QueryFailure, ScanReport};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Output format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines, printed as the scan progresses
    Text,
    /// JSON report for programmatic use, printed once the scan is done
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'text' or 'json'", s)),
        }
    }
}

/// Receives scan events in the order the scan produces them.
pub trait Reporter {
    /// The lockfile held nothing recognizable; no scan follows.
    fn no_dependencies(&mut self, source: &Path) -> Result<()>;

    fn start(&mut self, source: &Path, extracted: usize) -> Result<()>;

    fn finding(&mut self, finding: &Finding) -> Result<()>;

    fn failure(&mut self, failure: &QueryFailure) -> Result<()>;

    fn finish(&mut self, report: &ScanReport) -> Result<()>;
}

pub fn reporter<'a, W: Write + 'a>(
    format: OutputFormat,
    out: W,
    summary_max_chars: usize,
) -> Box<dyn Reporter + 'a> {
    match format {
        OutputFormat::Text => Box::new(TextReporter::new(out, summary_max_chars)),
        OutputFormat::Json => Box::new(JsonReporter::new(out)),
    }
}
