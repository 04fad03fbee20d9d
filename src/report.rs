/*============================================================
  Synavera Project: Syn-Vercheck
  Module: synvercheck_core::report
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Render audit assessments as human-readable report lines
    and as a JSON report document for CI consumers.

  Security / Safety Notes:
    The report is written to operator-controlled paths; no
    privileged operations are performed.

  Dependencies:
    serde + serde_json for the report document, chrono for
    the generation stamp.

  Operational Scope:
    Final stage of the `check` command.

  Revision History:
    2026-10-16 COD  Authored report formatter.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic ordering for reproducible reports
    - One diagnostic line per violation
============================================================*/

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::audit::AuditSummary;
use crate::config::ReportConfig;
use crate::error::{Result, VercheckError};
use crate::policy::{Assessment, Violation};
use crate::vercmp;

/// Renders one line per package plus indented violation details.
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    current_label: String,
    previous_label: String,
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

impl ReportFormatter {
    pub fn new(current_label: impl Into<String>, previous_label: impl Into<String>) -> Self {
        Self {
            current_label: current_label.into(),
            previous_label: previous_label.into(),
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.current_label.clone(), config.previous_label.clone())
    }

    /// `<package>: <current> (current) <op> <previous> (previous)`
    pub fn headline(&self, assessment: &Assessment) -> String {
        let current = format!(
            "{}: {} ({})",
            assessment.package, assessment.current_version, self.current_label
        );
        match (&assessment.previous_version, assessment.ordering) {
            (None, _) => format!("{current} (new package)"),
            (Some(previous), Some(ordering)) => format!(
                "{current} {} {previous} ({})",
                vercmp::operator(ordering),
                self.previous_label
            ),
            (Some(previous), None) => {
                format!("{current} (unparseable) {previous} ({})", self.previous_label)
            }
        }
    }

    pub fn render(&self, assessment: &Assessment) -> Vec<String> {
        let mut lines = vec![self.headline(assessment)];
        lines.extend(
            assessment
                .verdict
                .violations()
                .iter()
                .map(|violation| format!("    {}: {}", violation.kind.as_str(), violation.detail)),
        );
        lines
    }

    pub fn render_all(&self, assessments: &[Assessment]) -> Vec<String> {
        assessments
            .iter()
            .flat_map(|assessment| self.render(assessment))
            .collect()
    }
}

/// Remediation hints printed once when any package fails.
pub fn guidance(upstream_branch: &str) -> String {
    format!(
        "\
ERROR: Modified package(s) don't have an increased version, or a new
package has a nonzero pkgrel.

Your options:
a) If you changed the packages without bumping them, increase
   pkgver/pkgrel as reported above and push again.
b) If you had already bumped them, the packages were updated on
   '{upstream_branch}' in the meantime: rebase on '{upstream_branch}',
   bump the versions again and push."
    )
}

/// Full JSON report.
#[derive(Debug, Serialize)]
pub struct ReportDocument {
    pub metadata: ReportMetadata,
    pub packages: BTreeMap<String, ReportEntry>,
}

#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub generated_by: String,
    pub total_packages: usize,
    pub new_packages: usize,
    pub failed_packages: usize,
    pub compliant: bool,
}

#[derive(Debug, Serialize)]
pub struct ReportEntry {
    pub current_version: String,
    pub previous_version: Option<String>,
    pub comparison: Option<&'static str>,
    pub status: PackageStatus,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PackageStatus {
    Compliant,
    Violation,
}

pub fn build_report(assessments: &[Assessment], summary: &AuditSummary) -> ReportDocument {
    let packages = assessments
        .iter()
        .map(|assessment| {
            let status = if assessment.verdict.is_compliant() {
                PackageStatus::Compliant
            } else {
                PackageStatus::Violation
            };
            let entry = ReportEntry {
                current_version: assessment.current_version.clone(),
                previous_version: assessment.previous_version.clone(),
                comparison: assessment.ordering.map(vercmp::operator),
                status,
                violations: assessment.verdict.violations().to_vec(),
            };
            (assessment.package.clone(), entry)
        })
        .collect();

    ReportDocument {
        metadata: ReportMetadata {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            generated_by: "synvercheck_core".to_string(),
            total_packages: summary.total_packages,
            new_packages: summary.new_packages,
            failed_packages: summary.failed_packages,
            compliant: !summary.any_violation(),
        },
        packages,
    }
}

pub fn write_report(document: &ReportDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            VercheckError::Filesystem(format!(
                "Failed to create report directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    let file = File::create(path).map_err(|err| {
        VercheckError::Filesystem(format!(
            "Failed to create report file {}: {err}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, document).map_err(|err| {
        VercheckError::Serialization(format!("Failed to write report {}: {err}", path.display()))
    })
}
