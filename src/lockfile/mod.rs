//! Lockfile loading and dependency extraction.
//!
//! Lockfiles are decoded into a loosely typed [`serde_json::Value`] tree
//! rather than a fixed schema, so unexpected shapes degrade to "no packages"
//! instead of failing the whole scan.
//!
//! # Example
//!
//! ```no_run
//! use lockscan::lockfile::{extract_npm_packages, load_lockfile};
//!
//! let lock = load_lockfile("package-lock.json")?;
//! for dep in extract_npm_packages(&lock) {
//!     println!("{}", dep);
//! }
//! # Ok::<(), lockscan::error::LockfileError>(())
//! ```

mod npm;

pub use npm::extract_npm_packages;

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::LockfileError;

/// Reads a lockfile from disk and decodes it as JSON.
///
/// # Errors
///
/// Returns [`LockfileError::Read`] if the file cannot be read and
/// [`LockfileError::Parse`] if it is not valid JSON.
pub fn load_lockfile(path: impl AsRef<Path>) -> Result<Value, LockfileError> {
    let path = path.as_ref();

    let data = fs::read(path).map_err(|source| LockfileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = data.len(), "read lockfile");

    serde_json::from_slice(&data).map_err(|source| LockfileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
