use serde::{Deserialize, Serialize};

/// OSV ecosystem name for packages read from npm lockfiles.
pub const NPM_ECOSYSTEM: &str = "npm";

/// A resolved package as recorded in a lockfile.
///
/// Duplicates are allowed: the same name can appear once per install path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub version: String,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Entries missing either half are never sent to OSV.
    pub fn is_queryable(&self) -> bool {
        !self.name.is_empty() && !self.version.is_empty()
    }
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
