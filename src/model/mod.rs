//! Core data types for dependencies, vulnerabilities, and scan reports.
//!
//! - [`Dependency`] - A package name/version pair taken from a lockfile
//! - [`Vulnerability`] - An advisory returned by OSV
//! - [`Finding`] - A dependency together with its advisories
//! - [`QueryFailure`] - A dependency whose query could not be completed
//! - [`ScanReport`] - Complete scan results
//!
//! # Example
//!
//! ```
//! use lockscan::{Dependency, ScanReport};
//!
//! let dep = Dependency::new("lodash", "4.17.21");
//! let report = ScanReport::new("package-lock.json", 1);
//!
//! println!("{} from {}", dep, report.source.display());
//! ```

mod package;
mod report;
mod vulnerability;

pub use package::*;
pub use report::*;
pub use vulnerability::*;
