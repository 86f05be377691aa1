use crate::error::CheckError;
use crate::model::{Dependency, Vulnerability, NPM_ECOSYSTEM};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Public OSV single-package query endpoint.
pub const OSV_QUERY_URL: &str = "https://api.osv.dev/v1/query";

pub struct OsvChecker {
    client: reqwest::Client,
    endpoint: String,
}

impl OsvChecker {
    pub fn new() -> Self {
        Self::with_endpoint(OSV_QUERY_URL)
    }

    /// Points the checker at a different OSV-compatible endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for OsvChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct OsvPackage<'a> {
    ecosystem: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct OsvQuery<'a> {
    package: OsvPackage<'a>,
    version: &'a str,
}

impl<'a> OsvQuery<'a> {
    fn for_dependency(dependency: &'a Dependency) -> Self {
        Self {
            package: OsvPackage {
                ecosystem: NPM_ECOSYSTEM,
                name: &dependency.name,
            },
            version: &dependency.version,
        }
    }
}

// OSV answers `{}` when nothing matches
#[derive(Deserialize)]
struct OsvQueryResponse {
    vulns: Option<Vec<OsvVuln>>,
}

// A record missing its id still counts; it prints with an empty id
#[derive(Deserialize)]
struct OsvVuln {
    id: Option<String>,
    summary: Option<String>,
}

fn parse_response(body: &[u8]) -> Result<Vec<Vulnerability>, CheckError> {
    let response: OsvQueryResponse = serde_json::from_slice(body)?;

    Ok(response
        .vulns
        .unwrap_or_default()
        .into_iter()
        .map(|v| Vulnerability::new(v.id.unwrap_or_default(), v.summary.unwrap_or_default()))
        .collect())
}

#[async_trait]
impl super::VulnerabilityChecker for OsvChecker {
    fn name(&self) -> &'static str {
        "OSV.dev"
    }

    async fn query(&self, dependency: &Dependency) -> Result<Vec<Vulnerability>, CheckError> {
        debug!(package = %dependency, endpoint = %self.endpoint, "querying OSV");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&OsvQuery::for_dependency(dependency))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        parse_response(&body)
    }
}
