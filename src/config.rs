/*============================================================
  Synavera Project: Syn-Vercheck
  Module: synvercheck_core::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Load operator configuration for the version audit from a
    TOML file, falling back to built-in defaults.

  Security / Safety Notes:
    Reads a single operator-owned file; values are validated
    before use and never executed.

  Dependencies:
    serde + toml for parsing, dirs for XDG path discovery.

  Operational Scope:
    Consumed by the CLI entry point to build the policy
    engine, the audit driver, the report formatter, and the
    logger.

  Revision History:
    2026-10-16 COD  Authored configuration loader.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit defaults for every tunable
    - Invalid configuration fails fast with context
============================================================*/

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, VercheckError};
use crate::policy::BumpPolicy;

const APP_DIR: &str = "syn-vercheck";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct VercheckConfig {
    pub policy: PolicyConfig,
    pub audit: AuditConfig,
    pub report: ReportConfig,
    pub paths: PathsConfig,
}

/// `[policy]` table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub tracking_pkgver: String,
    pub strict_pkgver_prefixes: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let policy = BumpPolicy::default();
        Self {
            tracking_pkgver: policy.tracking_pkgver,
            strict_pkgver_prefixes: policy.strict_pkgver_prefixes,
        }
    }
}

/// `[audit]` table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Sanity limit on changed packages per run.
    pub max_packages: usize,
    pub max_parallel: usize,
    /// Branch named in remediation guidance.
    pub upstream_branch: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_packages: 10,
            max_parallel: 8,
            upstream_branch: "master".to_string(),
        }
    }
}

/// `[report]` table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub current_label: String,
    pub previous_label: String,
    /// JSON report destination; none unless set here or on the CLI.
    pub path: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            current_label: "current".to_string(),
            previous_label: "previous".to_string(),
            path: None,
        }
    }
}

/// `[paths]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub log_dir: Option<PathBuf>,
}

impl VercheckConfig {
    /// Load from an explicit path, or from the default location when present.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            VercheckError::Config(format!(
                "Failed to read configuration {}: {err}",
                path.display()
            ))
        })?;
        Self::from_toml(&text).map_err(|err| match err {
            VercheckError::Config(message) => {
                VercheckError::Config(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|err| VercheckError::Config(format!("Invalid configuration: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.policy.tracking_pkgver.trim().is_empty() {
            return Err(VercheckError::Config(
                "policy.tracking_pkgver must not be empty".into(),
            ));
        }
        if self
            .policy
            .strict_pkgver_prefixes
            .iter()
            .any(|prefix| prefix.is_empty())
        {
            return Err(VercheckError::Config(
                "policy.strict_pkgver_prefixes must not contain empty prefixes".into(),
            ));
        }
        if self.audit.max_parallel == 0 {
            return Err(VercheckError::Config(
                "audit.max_parallel must be at least 1".into(),
            ));
        }
        if self.report.current_label.is_empty() || self.report.previous_label.is_empty() {
            return Err(VercheckError::Config(
                "report labels must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn bump_policy(&self) -> BumpPolicy {
        BumpPolicy {
            tracking_pkgver: self.policy.tracking_pkgver.clone(),
            strict_pkgver_prefixes: self.policy.strict_pkgver_prefixes.clone(),
        }
    }

    /// Directory for session logs.
    pub fn log_dir(&self) -> PathBuf {
        self.paths.log_dir.clone().unwrap_or_else(|| {
            dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join("logs")
        })
    }

    pub fn report_path(&self) -> Option<PathBuf> {
        self.report.path.clone()
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DEFAULT_TRACKING_PKGVER;

    #[test]
    fn empty_document_yields_defaults() {
        let config = VercheckConfig::from_toml("").unwrap();
        assert_eq!(config, VercheckConfig::default());
        assert_eq!(config.policy.tracking_pkgver, DEFAULT_TRACKING_PKGVER);
        assert_eq!(config.audit.max_packages, 10);
        assert_eq!(config.report.previous_label, "previous");
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = VercheckConfig::from_toml(
            r#"
            [policy]
            strict_pkgver_prefixes = ["device-", "firmware-"]

            [report]
            previous_label = "upstream/master"
            "#,
        )
        .unwrap();
        assert_eq!(config.policy.tracking_pkgver, "9999");
        assert_eq!(config.bump_policy().strict_pkgver_prefixes.len(), 2);
        assert_eq!(config.report.current_label, "current");
        assert_eq!(config.report.previous_label, "upstream/master");
    }

    #[test]
    fn rejects_zero_parallelism() {
        let err = VercheckConfig::from_toml("[audit]\nmax_parallel = 0\n").unwrap_err();
        assert!(matches!(err, VercheckError::Config(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(VercheckConfig::from_toml("[policy]\ntracking = \"1\"\n").is_err());
    }

    #[test]
    fn explicit_log_dir_wins() {
        let config = VercheckConfig::from_toml("[paths]\nlog_dir = \"/tmp/vercheck\"\n").unwrap();
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/vercheck"));
    }

    #[test]
    fn missing_explicit_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = VercheckConfig::load_from_optional_path(Some(&dir.path().join("nope.toml")))
            .unwrap_err();
        assert!(matches!(err, VercheckError::Config(_)));
    }
}
