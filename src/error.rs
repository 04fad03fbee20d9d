/*============================================================
  Synavera Project: Syn-Vercheck
  Module: synvercheck_core::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Centralise Syn-Vercheck operational error types so the CLI
    reports consistent diagnostics and exit codes.

  Security / Safety Notes:
    Error contexts expose only paths and package names taken
    from operator input; no snapshot payloads are echoed.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Used by configuration, input loading, and the audit driver.
    Per-package policy violations are NOT errors; they travel
    as verdicts (see policy module).

  Revision History:
    2026-10-16 COD  Established shared error definitions.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - No silent failure paths
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::process::ExitCode;

use thiserror::Error;

use crate::version::VersionError;

/// Result alias for Syn-Vercheck operations.
pub type Result<T> = std::result::Result<T, VercheckError>;

/// Enumerates high-level error domains surfaced by Syn-Vercheck.
#[derive(Debug, Error)]
pub enum VercheckError {
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Input: {0}")]
    Input(String),
    #[error("Too many changed packages: {count} exceeds the limit of {limit}")]
    TooManyPackages { count: usize, limit: usize },
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error("Serialization: {0}")]
    Serialization(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error("Runtime: {0}")]
    Runtime(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl VercheckError {
    /// Map error category to a deterministic exit code.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    /// Raw status byte behind [`VercheckError::exit_code`].
    pub fn exit_status(&self) -> u8 {
        match self {
            VercheckError::Config(_) => 20,
            VercheckError::Input(_) => 21,
            VercheckError::TooManyPackages { .. } => 22,
            VercheckError::Version(_) => 23,
            VercheckError::Serialization(_) => 31,
            VercheckError::Filesystem(_) => 40,
            VercheckError::Io(_) => 41,
            VercheckError::Runtime(_) => 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(VercheckError::Config("bad".into()), 20)]
    #[case(VercheckError::Input("bad".into()), 21)]
    #[case(VercheckError::TooManyPackages { count: 11, limit: 10 }, 22)]
    #[case(VercheckError::Version(VersionError::Empty), 23)]
    #[case(VercheckError::Io(io::Error::other("stdin closed")), 41)]
    #[case(VercheckError::Runtime("join".into()), 50)]
    fn exit_status_is_stable(#[case] err: VercheckError, #[case] expected: u8) {
        assert_eq!(err.exit_status(), expected);
    }

    #[test]
    fn too_many_packages_message_names_both_numbers() {
        let err = VercheckError::TooManyPackages {
            count: 12,
            limit: 10,
        };
        assert_eq!(
            err.to_string(),
            "Too many changed packages: 12 exceeds the limit of 10"
        );
    }
}
