/*============================================================
  Synavera Project: Syn-Vercheck
  Module: synvercheck_core::main
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for Syn-Vercheck Core. Audits changed package
    recipes against the version bump policy and exposes the
    version comparator as standalone utilities.

  Security / Safety Notes:
    Operates within user privileges. Reads the changeset and
    config, writes the optional report and session log; no
    network access and no subprocesses.

  Dependencies:
    clap for CLI parsing, chrono for session stamps, tokio
    for the async runtime.

  Operational Scope:
    Invoked by CI after the changed-package collector has
    produced a changeset document, or by packagers wanting to
    compare or validate version strings locally.

  Revision History:
    2026-10-16 COD  Authored Syn-Vercheck Core runtime.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};

use synvercheck_core::audit::{enforce_package_limit, filter_packages, AuditDriver, AuditSummary};
use synvercheck_core::changeset::load_changeset;
use synvercheck_core::config::VercheckConfig;
use synvercheck_core::error::Result;
use synvercheck_core::logger::Logger;
use synvercheck_core::policy::BumpPolicyEngine;
use synvercheck_core::report::{build_report, guidance, write_report, ReportFormatter};
use synvercheck_core::vercmp;
use synvercheck_core::version::Version;

/// Command-line arguments for Syn-Vercheck-Core.
#[derive(Debug, Parser)]
#[command(
    name = "Syn-Vercheck-Core",
    version,
    author = "Synavera Systems",
    about = "Package version bump auditor for Syn-Vercheck"
)]
struct Cli {
    /// Override configuration file path.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH", global = true)]
    log: Option<PathBuf>,
    /// Enable verbose logging to stderr.
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Audit a changeset of package snapshots against the bump policy.
    Check {
        /// Changeset JSON document, or `-` for stdin.
        #[arg(long, value_name = "PATH")]
        input: PathBuf,
        /// Write a JSON report to this path.
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,
        /// Limit the audit to specific packages.
        #[arg(long = "package", value_name = "PKG", action = ArgAction::Append)]
        packages: Vec<String>,
        /// Skip the changed-package count sanity check.
        #[arg(long, action = ArgAction::SetTrue)]
        ignore_count: bool,
    },
    /// Compare two version strings and print the relation.
    Compare { left: String, right: String },
    /// Check that version strings parse.
    Validate {
        #[arg(required = true)]
        versions: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("[Syn-Vercheck-Core] {}", err);
            err.exit_code()
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let session = Session {
        config: cli.config,
        log: cli.log,
        verbose: cli.verbose,
    };

    match cli.command {
        Command::Compare { left, right } => compare(&left, &right),
        Command::Validate { versions } => Ok(validate(&versions)),
        Command::Check {
            input,
            report,
            packages,
            ignore_count,
        } => {
            let request = CheckRequest {
                input,
                report,
                packages,
                ignore_count,
            };
            check(&session, request).await
        }
    }
}

/// Global options shared by every subcommand.
struct Session {
    config: Option<PathBuf>,
    log: Option<PathBuf>,
    verbose: bool,
}

struct CheckRequest {
    input: PathBuf,
    report: Option<PathBuf>,
    packages: Vec<String>,
    ignore_count: bool,
}

async fn check(session: &Session, request: CheckRequest) -> Result<ExitCode> {
    let config = VercheckConfig::load_from_optional_path(session.config.as_deref())?;

    let session_stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let log_path = session
        .log
        .clone()
        .unwrap_or_else(|| config.log_dir().join(format!("check_{session_stamp}.log")));
    let logger = Logger::new(Some(log_path), session.verbose)?;
    logger.info("INIT", "Syn-Vercheck Core awakening.");

    let packages = load_changeset(&request.input).await?;
    logger.info(
        "CHANGESET",
        format!(
            "Loaded {} changed packages from {}",
            packages.len(),
            request.input.display()
        ),
    );

    let packages = filter_packages(packages, &request.packages, &logger);
    if packages.is_empty() {
        logger.warn("EMPTY", "No changed packages to audit; exiting");
        logger.finalize()?;
        return Ok(ExitCode::SUCCESS);
    }

    if let Err(err) = enforce_package_limit(
        packages.len(),
        config.audit.max_packages,
        request.ignore_count,
    ) {
        logger.error("LIMIT", err.to_string());
        logger.finalize()?;
        return Err(err);
    }

    let driver = AuditDriver::new(
        BumpPolicyEngine::new(config.bump_policy()),
        config.audit.max_parallel,
    );
    let assessments = driver.run(packages).await?;

    let formatter = ReportFormatter::from_config(&config.report);
    for line in formatter.render_all(&assessments) {
        println!("{line}");
    }
    for assessment in &assessments {
        logger.debug(
            "VERDICT",
            format!(
                "{} → {} violation(s)",
                assessment.package,
                assessment.verdict.violations().len()
            ),
        );
    }

    let summary = AuditSummary::from_assessments(&assessments);
    if let Some(path) = request.report.or_else(|| config.report_path()) {
        write_report(&build_report(&assessments, &summary), &path)?;
        logger.info("REPORT", format!("Report written to {}", path.display()));
    }

    logger.info(
        "SUMMARY",
        format!(
            "packages={} new={} failed={}",
            summary.total_packages, summary.new_packages, summary.failed_packages
        ),
    );
    logger.finalize()?;

    if summary.any_violation() {
        println!();
        println!("{}", guidance(&config.audit.upstream_branch));
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn compare(left: &str, right: &str) -> Result<ExitCode> {
    let ordering = vercmp::compare_str(left, right)?;
    println!("{left} {} {right}", vercmp::operator(ordering));
    Ok(ExitCode::SUCCESS)
}

fn validate(versions: &[String]) -> ExitCode {
    let mut all_valid = true;
    for raw in versions {
        match Version::parse(raw) {
            Ok(_) => println!("{raw}: valid"),
            Err(err) => {
                all_valid = false;
                eprintln!("{raw}: {err}");
            }
        }
    }
    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
