/*============================================================
  Synavera Project: Syn-Vercheck
  Module: synvercheck_core::audit
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Drive the bump policy engine across every changed package
    concurrently and reduce the verdicts to a run outcome.

  Security / Safety Notes:
    No I/O is performed here; snapshots are loaded before the
    driver starts.

  Dependencies:
    tokio for task scheduling and bounded parallelism.

  Operational Scope:
    Called by the `check` command between changeset loading
    and report rendering.

  Revision History:
    2026-10-16 COD  Implemented concurrent audit driver.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Bounded parallelism via semaphore
    - Order-independent aggregation
    - Sanity limits with explicit operator override
============================================================*/

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::changeset::ChangedPackage;
use crate::error::{Result, VercheckError};
use crate::logger::Logger;
use crate::policy::{Assessment, BumpPolicyEngine};

/// Evaluates changed packages in parallel.
#[derive(Clone)]
pub struct AuditDriver {
    engine: Arc<BumpPolicyEngine>,
    max_parallel: usize,
}

impl AuditDriver {
    pub fn new(engine: BumpPolicyEngine, max_parallel: usize) -> Self {
        Self {
            engine: Arc::new(engine),
            max_parallel: max_parallel.max(1),
        }
    }

    /// Assess every package; results keep the input order.
    pub async fn run(&self, packages: Vec<ChangedPackage>) -> Result<Vec<Assessment>> {
        let semaphore = Arc::new(Semaphore::new(self.max_parallel));
        let mut tasks = Vec::with_capacity(packages.len());

        for package in packages {
            let engine = self.engine.clone();
            let semaphore = semaphore.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| VercheckError::Runtime("Audit semaphore closed".into()))?;
                Ok::<_, VercheckError>(engine.assess(&package.current, package.previous.as_ref()))
            }));
        }

        let mut assessments = Vec::with_capacity(tasks.len());
        for task in tasks {
            let assessment = task
                .await
                .map_err(|err| VercheckError::Runtime(format!("Audit task failed: {err}")))??;
            assessments.push(assessment);
        }
        Ok(assessments)
    }
}

/// Aggregate outcome of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditSummary {
    pub total_packages: usize,
    pub new_packages: usize,
    pub failed_packages: usize,
}

impl AuditSummary {
    pub fn observe(assessment: &Assessment) -> Self {
        Self {
            total_packages: 1,
            new_packages: usize::from(assessment.is_new_package()),
            failed_packages: usize::from(!assessment.verdict.is_compliant()),
        }
    }

    /// Associative and commutative, so evaluation order never matters.
    pub fn merge(self, other: Self) -> Self {
        Self {
            total_packages: self.total_packages + other.total_packages,
            new_packages: self.new_packages + other.new_packages,
            failed_packages: self.failed_packages + other.failed_packages,
        }
    }

    pub fn from_assessments(assessments: &[Assessment]) -> Self {
        assessments
            .iter()
            .map(Self::observe)
            .fold(Self::default(), Self::merge)
    }

    pub fn any_violation(&self) -> bool {
        self.failed_packages > 0
    }
}

/// Keep only the requested packages, warning about names not in the changeset.
pub fn filter_packages(
    packages: Vec<ChangedPackage>,
    requested: &[String],
    logger: &Logger,
) -> Vec<ChangedPackage> {
    if requested.is_empty() {
        return packages;
    }

    let requested_set: HashSet<&str> = requested.iter().map(String::as_str).collect();
    let mut missing: Vec<&str> = requested_set
        .iter()
        .copied()
        .filter(|name| !packages.iter().any(|pkg| pkg.name() == *name))
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        logger.warn(
            "PKG404",
            format!("Requested packages not in changeset: {}", missing.join(", ")),
        );
    }

    packages
        .into_iter()
        .filter(|pkg| requested_set.contains(pkg.name()))
        .collect()
}

/// Refuse suspiciously large changesets unless the operator opted out.
pub fn enforce_package_limit(count: usize, limit: usize, ignore: bool) -> Result<()> {
    if ignore || count <= limit {
        Ok(())
    } else {
        Err(VercheckError::TooManyPackages { count, limit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::PackageSnapshot;

    fn changed(name: &str, pkgver: &str, pkgrel: u64, previous: Option<(&str, u64)>) -> ChangedPackage {
        ChangedPackage::new(
            PackageSnapshot::new(name, pkgver, pkgrel),
            previous.map(|(ver, rel)| PackageSnapshot::new(name, ver, rel)),
        )
    }

    #[tokio::test]
    async fn run_preserves_input_order() {
        let driver = AuditDriver::new(BumpPolicyEngine::default(), 2);
        let packages: Vec<ChangedPackage> = (0..16)
            .map(|idx| changed(&format!("pkg{idx:02}"), "1.0", 1, Some(("1.0", 0))))
            .collect();
        let assessments = driver.run(packages).await.unwrap();
        assert_eq!(assessments.len(), 16);
        for (idx, assessment) in assessments.iter().enumerate() {
            assert_eq!(assessment.package, format!("pkg{idx:02}"));
            assert!(assessment.verdict.is_compliant());
        }
    }

    #[tokio::test]
    async fn one_violation_does_not_stop_the_rest() {
        let driver = AuditDriver::new(BumpPolicyEngine::default(), 4);
        let assessments = driver
            .run(vec![
                changed("bad", "1.0", 0, Some(("1.0", 0))),
                changed("broken", "x", 0, Some(("1.0", 0))),
                changed("good", "1.1", 0, None),
            ])
            .await
            .unwrap();
        let summary = AuditSummary::from_assessments(&assessments);
        assert_eq!(summary.total_packages, 3);
        assert_eq!(summary.new_packages, 1);
        assert_eq!(summary.failed_packages, 2);
        assert!(summary.any_violation());
    }

    #[test]
    fn merge_is_order_independent() {
        let a = AuditSummary {
            total_packages: 2,
            new_packages: 1,
            failed_packages: 0,
        };
        let b = AuditSummary {
            total_packages: 1,
            new_packages: 0,
            failed_packages: 1,
        };
        assert_eq!(a.merge(b), b.merge(a));
        assert!(a.merge(b).any_violation());
        assert!(!AuditSummary::default().any_violation());
    }

    #[test]
    fn filter_keeps_requested_packages() {
        let logger = Logger::new(None, false).unwrap();
        let packages = vec![
            changed("a", "1", 0, None),
            changed("b", "1", 0, None),
        ];
        let kept = filter_packages(packages, &["b".to_string(), "zz".to_string()], &logger);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name(), "b");
    }

    #[test]
    fn package_limit_can_be_ignored() {
        assert!(enforce_package_limit(10, 10, false).is_ok());
        assert!(matches!(
            enforce_package_limit(11, 10, false),
            Err(VercheckError::TooManyPackages { count: 11, limit: 10 })
        ));
        assert!(enforce_package_limit(11, 10, true).is_ok());
    }
}
