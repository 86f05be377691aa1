use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{Dependency, Vulnerability};

/// A dependency with at least one advisory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub dependency: Dependency,
    pub vulnerabilities: Vec<Vulnerability>,
}

/// A dependency whose query failed; the scan continued past it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryFailure {
    pub dependency: Dependency,
    pub error: String,
}

/// Everything a single scan produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub source: PathBuf,
    pub scan_time: DateTime<Utc>,
    /// Entries extracted from the lockfile, including unqueryable ones.
    pub extracted: usize,
    pub queried: usize,
    pub ignored: usize,
    pub total_vulnerabilities: usize,
    pub findings: Vec<Finding>,
    pub failures: Vec<QueryFailure>,
}

impl ScanReport {
    pub fn new(source: impl Into<PathBuf>, extracted: usize) -> Self {
        Self {
            source: source.into(),
            scan_time: Utc::now(),
            extracted,
            queried: 0,
            ignored: 0,
            total_vulnerabilities: 0,
            findings: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.total_vulnerabilities == 0
    }

    pub(crate) fn record_finding(&mut self, finding: Finding) {
        self.total_vulnerabilities += finding.vulnerabilities.len();
        self.findings.push(finding);
    }
}
