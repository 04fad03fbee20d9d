/*============================================================
  Synavera Project: Syn-Vercheck
  Module: synvercheck_core::snapshot
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Shared structures describing a package recipe at one
    revision, as produced by the external recipe parser.

  Security / Safety Notes:
    Pure data container; no I/O performed in this module.

  Dependencies:
    serde for the changeset document format.

  Operational Scope:
    Consumed by the bump policy engine; one instance per
    (package, revision).

  Revision History:
    2026-10-16 COD  Introduced PackageSnapshot.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Clear data contracts between modules
    - Deterministic collections for stable comparisons
============================================================*/

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::version::{Version, VersionError};

/// Recipe metadata for one package at one revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSnapshot {
    pub name: String,
    pub pkgver: String,
    pub pkgrel: u64,
    /// Source filename to checksum.
    #[serde(default)]
    pub checksums: BTreeMap<String, String>,
    /// Sources fetched from the network at build time.
    #[serde(default)]
    pub remote_sources: BTreeSet<String>,
}

impl PackageSnapshot {
    pub fn new(name: impl Into<String>, pkgver: impl Into<String>, pkgrel: u64) -> Self {
        Self {
            name: name.into(),
            pkgver: pkgver.into(),
            pkgrel,
            checksums: BTreeMap::new(),
            remote_sources: BTreeSet::new(),
        }
    }

    /// Register a source file fetched at build time.
    pub fn with_remote_source(mut self, file: impl Into<String>, checksum: impl Into<String>) -> Self {
        let file = file.into();
        self.checksums.insert(file.clone(), checksum.into());
        self.remote_sources.insert(file);
        self
    }

    /// Register a source file bundled next to the recipe.
    pub fn with_bundled_source(mut self, file: impl Into<String>, checksum: impl Into<String>) -> Self {
        self.checksums.insert(file.into(), checksum.into());
        self
    }

    /// `<pkgver>-r<pkgrel>` as written, without parsing.
    pub fn version_string(&self) -> String {
        format!("{}-r{}", self.pkgver, self.pkgrel)
    }

    pub fn version(&self) -> Result<Version, VersionError> {
        Version::from_parts(&self.pkgver, self.pkgrel)
    }

    pub fn fetches_remote_sources(&self) -> bool {
        !self.remote_sources.is_empty()
    }
}
