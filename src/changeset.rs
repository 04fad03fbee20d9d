/*============================================================
  Synavera Project: Syn-Vercheck
  Module: synvercheck_core::changeset
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Load the list of changed packages, with their current and
    previous recipe snapshots, handed over by the upstream
    recipe-parsing collaborator.

  Security / Safety Notes:
    Reads one operator-supplied JSON document (file or stdin);
    content is validated structurally before evaluation.

  Dependencies:
    tokio for async reads, serde_json for decoding.

  Operational Scope:
    Runs before any policy evaluation; all I/O of an audit
    happens here.

  Revision History:
    2026-10-16 COD  Crafted changeset ingestion layer.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Structured parsing with clear failure modes
    - Deterministic ordering of packages
============================================================*/

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;

use crate::error::{Result, VercheckError};
use crate::snapshot::PackageSnapshot;

/// A package touched by the change under review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedPackage {
    pub current: PackageSnapshot,
    /// Absent when the package does not exist at the previous revision.
    #[serde(default)]
    pub previous: Option<PackageSnapshot>,
}

impl ChangedPackage {
    pub fn new(current: PackageSnapshot, previous: Option<PackageSnapshot>) -> Self {
        Self { current, previous }
    }

    pub fn name(&self) -> &str {
        &self.current.name
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChangesetDocument {
    packages: Vec<ChangedPackage>,
}

/// Read a changeset from `source`; `-` reads standard input.
pub async fn load_changeset(source: &Path) -> Result<Vec<ChangedPackage>> {
    let text = if source == Path::new("-") {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await?;
        buffer
    } else {
        tokio::fs::read_to_string(source).await.map_err(|err| {
            VercheckError::Filesystem(format!(
                "Failed to read changeset {}: {err}",
                source.display()
            ))
        })?
    };
    parse_changeset(&text)
}

/// Decode and validate a changeset document; packages come back sorted by name.
pub fn parse_changeset(text: &str) -> Result<Vec<ChangedPackage>> {
    let document: ChangesetDocument = serde_json::from_str(text).map_err(|err| {
        VercheckError::Serialization(format!("Failed to decode changeset: {err}"))
    })?;

    let mut seen = HashSet::new();
    for package in &document.packages {
        if package.name().is_empty() {
            return Err(VercheckError::Input("Package with empty name".into()));
        }
        if !seen.insert(package.name()) {
            return Err(VercheckError::Input(format!(
                "Package `{}` listed more than once",
                package.name()
            )));
        }
        if let Some(previous) = &package.previous {
            if previous.name != package.current.name {
                return Err(VercheckError::Input(format!(
                    "Previous snapshot `{}` does not match package `{}`",
                    previous.name,
                    package.name()
                )));
            }
        }
    }

    let mut packages = document.packages;
    packages.sort_by(|a, b| a.current.name.cmp(&b.current.name));
    Ok(packages)
}
