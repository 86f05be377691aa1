//! The scan loop: one vulnerability query per extracted dependency.
//!
//! Dependencies are checked strictly one after another. A failed query is
//! reported and skipped; it never ends the scan early. Neither does a
//! failed write to the output (a closed pipe, a full disk): it is logged
//! once and the remaining dependencies are still queried.
//!
//! # Example
//!
//! ```no_run
//! use lockscan::checker::default_checker;
//! use lockscan::config::IgnoreConfig;
//! use lockscan::output::{TextReporter, SUMMARY_MAX_CHARS};
//! use lockscan::scanner::scan_lockfile;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut reporter = TextReporter::new(std::io::stdout(), SUMMARY_MAX_CHARS);
//!     let report = scan_lockfile(
//!         Path::new("package-lock.json"),
//!         &default_checker(),
//!         &IgnoreConfig::default(),
//!         &mut reporter,
//!     )
//!     .await?;
//!     println!("{} vulnerabilities", report.total_vulnerabilities);
//!     Ok(())
//! }
//! ```

use anyhow::Result;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::checker::VulnerabilityChecker;
use crate::config::IgnoreConfig;
use crate::lockfile::{extract_npm_packages, load_lockfile};
use crate::model::{Dependency, Finding, QueryFailure, ScanReport};
use crate::output::Reporter;

/// Loads a lockfile, extracts its packages and scans them.
///
/// A lockfile with no recognizable packages is not an error: the reporter
/// is told so and an empty report is returned.
///
/// # Errors
///
/// Fails only if the lockfile cannot be read or parsed.
pub async fn scan_lockfile(
    path: &Path,
    checker: &dyn VulnerabilityChecker,
    ignore: &IgnoreConfig,
    reporter: &mut dyn Reporter,
) -> Result<ScanReport> {
    let lock = load_lockfile(path)?;
    let dependencies = extract_npm_packages(&lock);

    if dependencies.is_empty() {
        warn!(path = %path.display(), "no dependencies found in lockfile");
        let mut output_failed = false;
        emit(reporter.no_dependencies(path), &mut output_failed);
        return Ok(ScanReport::new(path, 0));
    }

    scan_dependencies(path, &dependencies, checker, ignore, reporter).await
}

/// Queries `checker` for each dependency in order and feeds the outcome to
/// `reporter`.
///
/// Entries with an empty name or version are skipped without a query or a
/// message. Packages on the ignore list are skipped and counted; ignored
/// advisory ids are dropped before anything is reported.
pub async fn scan_dependencies(
    source: &Path,
    dependencies: &[Dependency],
    checker: &dyn VulnerabilityChecker,
    ignore: &IgnoreConfig,
    reporter: &mut dyn Reporter,
) -> Result<ScanReport> {
    let mut report = ScanReport::new(source, dependencies.len());
    let mut output_failed = false;
    emit(reporter.start(source, dependencies.len()), &mut output_failed);

    for dependency in dependencies {
        if !dependency.is_queryable() {
            continue;
        }

        if ignore.should_ignore_package(&dependency.name) {
            debug!(package = %dependency, "package on ignore list, skipping");
            report.ignored += 1;
            continue;
        }

        report.queried += 1;
        let vulnerabilities = match checker.query(dependency).await {
            Ok(vulns) => vulns,
            Err(e) => {
                debug!(
                    package = %dependency,
                    checker = checker.name(),
                    error = %e,
                    "query failed"
                );
                let failure = QueryFailure {
                    dependency: dependency.clone(),
                    error: e.to_string(),
                };
                emit(reporter.failure(&failure), &mut output_failed);
                report.failures.push(failure);
                continue;
            }
        };

        let vulnerabilities: Vec<_> = vulnerabilities
            .into_iter()
            .filter(|v| !ignore.should_ignore_vulnerability(&v.id))
            .collect();

        if vulnerabilities.is_empty() {
            continue;
        }

        let finding = Finding {
            dependency: dependency.clone(),
            vulnerabilities,
        };
        emit(reporter.finding(&finding), &mut output_failed);
        report.record_finding(finding);
    }

    info!(
        queried = report.queried,
        ignored = report.ignored,
        failed = report.failures.len(),
        vulnerabilities = report.total_vulnerabilities,
        "scan finished"
    );

    emit(reporter.finish(&report), &mut output_failed);
    Ok(report)
}

/// Logs the first output error of a scan; later ones are assumed to share
/// its cause.
fn emit(written: Result<()>, output_failed: &mut bool) {
    if let Err(e) = written {
        if !*output_failed {
            warn!(error = %e, "failed to write scan output, continuing scan");
        }
        *output_failed = true;
    }
}
