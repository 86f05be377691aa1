//! Configuration file handling.
//!
//! This module provides loading and saving of lockscan configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/lockscan/config.toml`
//! - macOS: `~/Library/Application Support/lockscan/config.toml`
//! - Windows: `%APPDATA%\lockscan\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! api_url = "https://api.osv.dev/v1/query"
//! summary_max_chars = 110
//! default_format = "text"
//!
//! [ignore]
//! packages = ["@types/*"]
//! vulnerabilities = ["GHSA-p6mc-m468-83gw"]
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::checker::OSV_QUERY_URL;
use crate::output::SUMMARY_MAX_CHARS;

/// Application configuration.
///
/// Every field has a default, so a partial file is valid.
///
/// # Example
///
/// ```no_run
/// use lockscan::Config;
///
/// let config = Config::load().unwrap();
/// println!("Querying {}", config.api_url);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OSV query endpoint.
    ///
    /// Default: `https://api.osv.dev/v1/query`
    pub api_url: String,

    /// Advisory summaries longer than this many characters are cut short.
    ///
    /// Default: 110
    pub summary_max_chars: usize,

    /// Output format when no `--format` flag is provided.
    ///
    /// Valid values: "text", "json"
    /// Default: "text"
    pub default_format: String,

    /// Ignore list configuration for suppressing known issues.
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// Configuration for ignoring specific packages or vulnerabilities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Package names that are never queried.
    ///
    /// Supports glob patterns (e.g., "lodash*", "@types/*").
    pub packages: Vec<String>,

    /// Vulnerability IDs to drop from results (e.g., "GHSA-xxxx").
    pub vulnerabilities: Vec<String>,
}

impl IgnoreConfig {
    /// Check if a package should be skipped.
    pub fn should_ignore_package(&self, name: &str) -> bool {
        self.packages.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, name)
            } else {
                pattern == name
            }
        })
    }

    /// Check if a vulnerability should be ignored.
    pub fn should_ignore_vulnerability(&self, vuln_id: &str) -> bool {
        self.vulnerabilities.iter().any(|id| id == vuln_id)
    }
}

/// Simple glob matching (supports * as wildcard).
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];

    if text.len() < first.len() + last.len() {
        return false;
    }
    if !text.starts_with(first) || !text.ends_with(last) {
        return false;
    }

    let mut remaining = &text[first.len()..text.len() - last.len()];
    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: OSV_QUERY_URL.to_string(),
            summary_max_chars: SUMMARY_MAX_CHARS,
            default_format: "text".to_string(),
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Saves the configuration to `path`.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Writes the default configuration to `path` unless a file is already
    /// there. Returns whether a file was written.
    pub fn init_at(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        Config::default().save_to(path)?;
        Ok(true)
    }

    /// Renders the configuration in effect for `path` as TOML, headed by a
    /// comment saying where it came from.
    ///
    /// A missing file renders the defaults; a malformed one is an error.
    pub fn describe_at(path: &Path) -> Result<String> {
        let origin = if path.exists() {
            format!("# {}", path.display())
        } else {
            format!("# {} (not found, showing defaults)", path.display())
        };
        let effective = toml::to_string_pretty(&Self::load_from(path)?)?;
        Ok(format!("{}\n{}", origin, effective))
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lockscan")
            .join("config.toml")
    }
}
