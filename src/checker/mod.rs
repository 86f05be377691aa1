mod osv;

pub use osv::{OsvChecker, OSV_QUERY_URL};

use crate::error::CheckError;
use crate::model::{Dependency, Vulnerability};
use async_trait::async_trait;

/// A source of vulnerability data, queried one dependency at a time.
#[async_trait]
pub trait VulnerabilityChecker: Send + Sync {
    fn name(&self) -> &'static str;
    async fn query(&self, dependency: &Dependency) -> Result<Vec<Vulnerability>, CheckError>;
}

pub fn default_checker() -> OsvChecker {
    OsvChecker::new()
}
