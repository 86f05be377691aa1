//! Error types for lockfile loading and vulnerability queries.
//!
//! - [`LockfileError`] is fatal: the scan cannot start without a lockfile.
//! - [`CheckError`] is per-dependency: the scan reports it and moves on.

use std::path::PathBuf;

/// Failure to load the lockfile from disk.
#[derive(Debug, thiserror::Error)]
pub enum LockfileError {
    /// The file could not be read.
    #[error("error reading lockfile {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a single vulnerability query.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("OSV query failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("OSV returned HTTP {status}")]
    Status { status: u16 },

    #[error("bad OSV response: {0}")]
    Decode(#[from] serde_json::Error),
}
