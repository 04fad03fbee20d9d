/*============================================================
  Synavera Project: Syn-Vercheck
  Module: synvercheck_core
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Library surface of Syn-Vercheck Core: apk-style version
    ordering and the package version bump policy.

  Security / Safety Notes:
    The policy core is pure; file and stdin access is limited
    to the changeset, config, report, and log modules.

  Dependencies:
    See individual modules.

  Operational Scope:
    Linked by the `syn-vercheck` binary and by integration
    tests.

  Revision History:
    2026-10-16 COD  Split library from the binary entry point.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Narrow public surface re-exported at the crate root
============================================================*/

pub mod audit;
pub mod changeset;
pub mod config;
pub mod error;
pub mod logger;
pub mod policy;
pub mod report;
pub mod snapshot;
pub mod vercmp;
pub mod version;

pub use audit::{AuditDriver, AuditSummary};
pub use changeset::ChangedPackage;
pub use error::{Result, VercheckError};
pub use policy::{Assessment, BumpPolicy, BumpPolicyEngine, Verdict, Violation, ViolationKind};
pub use report::ReportFormatter;
pub use snapshot::PackageSnapshot;
pub use version::{Version, VersionError};
