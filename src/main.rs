use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use lockscan::{
    checker::OsvChecker,
    config::Config,
    logging,
    output::{self, OutputFormat},
    scanner::scan_lockfile,
    ScanReport,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::warn;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const VULNERABLE: u8 = 2;
}

#[derive(Parser)]
#[command(name = "lockscan")]
#[command(
    author,
    version,
    about = "Scan npm lockfiles for known vulnerabilities using OSV"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a Node.js project (package-lock.json) for vulnerabilities
    ///
    /// Parses package-lock.json (v2/v3 style), queries the OSV API per
    /// dependency, and prints only vulnerable packages.
    Scan {
        /// Path to package-lock.json
        lockfile: PathBuf,

        /// Output format (text, json)
        #[arg(short, long)]
        format: Option<String>,

        /// OSV query endpoint
        #[arg(long)]
        api_url: Option<String>,

        /// Exit with code 2 if any vulnerability is reported
        #[arg(long)]
        fail_on_vulns: bool,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose)?;

    let config = Config::load().unwrap_or_else(|e| {
        warn!(
            path = %Config::config_path().display(),
            error = %e,
            "ignoring unreadable config file"
        );
        Config::default()
    });

    match cli.command {
        Commands::Scan {
            lockfile,
            format,
            api_url,
            fail_on_vulns,
        } => {
            let format = format.unwrap_or_else(|| config.default_format.clone());
            let api_url = api_url.unwrap_or_else(|| config.api_url.clone());

            let result = run_scan(lockfile, &format, api_url, &config).await;
            if let Err(e) = &result {
                eprintln!("❌ {}", e);
            }
            Ok(exit_code(&result, fail_on_vulns))
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

async fn run_scan(
    lockfile: PathBuf,
    format: &str,
    api_url: String,
    config: &Config,
) -> Result<ScanReport> {
    let format = OutputFormat::from_str(format).map_err(|e| anyhow::anyhow!(e))?;
    let checker = OsvChecker::with_endpoint(api_url);
    let mut reporter = output::reporter(format, std::io::stdout(), config.summary_max_chars);

    scan_lockfile(&lockfile, &checker, &config.ignore, reporter.as_mut()).await
}

/// Only fatal errors and, when asked for, reported vulnerabilities change
/// the exit code. Failed queries never do.
fn exit_code(result: &Result<ScanReport>, fail_on_vulns: bool) -> u8 {
    match result {
        Err(_) => exit_codes::ERROR,
        Ok(report) if fail_on_vulns && !report.is_clean() => exit_codes::VULNERABLE,
        Ok(_) => exit_codes::SUCCESS,
    }
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
    } else if init {
        if Config::init_at(&config_path)? {
            println!("Wrote default config to {}", config_path.display());
        } else {
            println!("Left existing config at {} untouched", config_path.display());
        }
    } else {
        print!("{}", Config::describe_at(&config_path)?);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lockscan::checker::VulnerabilityChecker;
    use lockscan::config::IgnoreConfig;
    use lockscan::error::CheckError;
    use lockscan::{Dependency, Vulnerability};
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Fails every query for `broken`, reports one advisory for anything else.
    struct FixedChecker {
        broken: &'static str,
    }

    #[async_trait]
    impl VulnerabilityChecker for FixedChecker {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn query(&self, dependency: &Dependency) -> Result<Vec<Vulnerability>, CheckError> {
            if dependency.name == self.broken {
                return Err(CheckError::Status { status: 503 });
            }
            Ok(vec![Vulnerability::new("GHSA-test", "test advisory")])
        }
    }

    async fn scan(path: &std::path::Path, broken: &'static str) -> Result<ScanReport> {
        let mut reporter = output::reporter(OutputFormat::Text, std::io::sink(), 110);
        scan_lockfile(
            path,
            &FixedChecker { broken },
            &IgnoreConfig::default(),
            reporter.as_mut(),
        )
        .await
    }

    fn lockfile(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_exit_code_unreadable_lockfile() {
        let dir = tempfile::tempdir().unwrap();
        let result = scan(&dir.path().join("package-lock.json"), "").await;

        assert_eq!(exit_code(&result, false), exit_codes::ERROR);
        assert_eq!(exit_code(&result, true), exit_codes::ERROR);
    }

    #[tokio::test]
    async fn test_exit_code_invalid_json() {
        let file = lockfile("{ \"packages\": ");
        let result = scan(file.path(), "").await;

        assert_eq!(exit_code(&result, false), exit_codes::ERROR);
    }

    #[tokio::test]
    async fn test_exit_code_no_dependencies() {
        let file = lockfile(r#"{"name":"app"}"#);
        let result = scan(file.path(), "").await;

        assert_eq!(exit_code(&result, false), exit_codes::SUCCESS);
        assert_eq!(exit_code(&result, true), exit_codes::SUCCESS);
    }

    #[tokio::test]
    async fn test_exit_code_failed_queries() {
        let file = lockfile(r#"{"packages":{"node_modules/a":{"version":"1.0.0"}}}"#);
        let result = scan(file.path(), "a").await;

        assert_eq!(result.as_ref().unwrap().failures.len(), 1);
        assert_eq!(exit_code(&result, false), exit_codes::SUCCESS);
        assert_eq!(exit_code(&result, true), exit_codes::SUCCESS);
    }

    #[tokio::test]
    async fn test_exit_code_vulnerabilities() {
        let file = lockfile(r#"{"packages":{"node_modules/a":{"version":"1.0.0"}}}"#);
        let result = scan(file.path(), "").await;

        assert_eq!(result.as_ref().unwrap().total_vulnerabilities, 1);
        assert_eq!(exit_code(&result, false), exit_codes::SUCCESS);
        assert_eq!(exit_code(&result, true), exit_codes::VULNERABLE);
    }

    #[test]
    fn test_cli_parses_scan() {
        let args = ["lockscan", "-vv", "scan", "package-lock.json", "--fail-on-vulns"];
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Scan {
                lockfile,
                fail_on_vulns,
                format,
                ..
            } => {
                assert_eq!(lockfile, PathBuf::from("package-lock.json"));
                assert!(fail_on_vulns);
                assert!(format.is_none());
            }
            Commands::Config { .. } => panic!("expected scan"),
        }
    }
}
