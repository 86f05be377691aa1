pub mod checker;
pub mod config;
pub mod error;
pub mod lockfile;
pub mod logging;
pub mod model;
pub mod output;
pub mod scanner;

pub use config::Config;
pub use model::{Dependency, Finding, QueryFailure, ScanReport, Vulnerability};
