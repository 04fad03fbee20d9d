/*============================================================
  Synavera Project: Syn-Vercheck
  Module: synvercheck_core::policy
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Decide whether a package's version change between two
    recipe snapshots follows the bump policy, producing a
    structured verdict with precise diagnostics.

  Security / Safety Notes:
    Pure decision function; never panics on malformed input
    and never performs I/O.

  Dependencies:
    serde for report serialization of violations.

  Operational Scope:
    Invoked once per changed package by the audit driver.

  Revision History:
    2026-10-16 COD  Authored bump policy decision table.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit decision table instead of branching chains
    - Every failed sub-condition reported, none masked
    - Diagnostics generated from structured violations
============================================================*/

use std::cmp::Ordering;

use serde::Serialize;

use crate::snapshot::PackageSnapshot;
use crate::vercmp;
use crate::version::VersionError;

/// Default `pkgver` meaning "always track latest upstream".
pub const DEFAULT_TRACKING_PKGVER: &str = "9999";

/// Category of a policy violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    ParseError,
    NewPackageNonzeroRelease,
    BumpRuleMismatch,
    VersionNotIncreased,
    InvalidPkgver,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::ParseError => "ParseError",
            ViolationKind::NewPackageNonzeroRelease => "NewPackageNonzeroRelease",
            ViolationKind::BumpRuleMismatch => "BumpRuleMismatch",
            ViolationKind::VersionNotIncreased => "VersionNotIncreased",
            ViolationKind::InvalidPkgver => "InvalidPkgver",
        }
    }
}

/// A single failed policy check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub detail: String,
}

impl Violation {
    fn new(kind: ViolationKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    fn parse_error(side: &str, err: &VersionError) -> Self {
        Self::new(ViolationKind::ParseError, format!("{side} version: {err}"))
    }
}

/// Outcome of evaluating one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Compliant,
    /// Never empty.
    Violation(Vec<Violation>),
}

impl Verdict {
    fn from_violations(violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            Verdict::Compliant
        } else {
            Verdict::Violation(violations)
        }
    }

    pub fn is_compliant(&self) -> bool {
        matches!(self, Verdict::Compliant)
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            Verdict::Compliant => &[],
            Verdict::Violation(violations) => violations,
        }
    }

    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations().iter().any(|violation| violation.kind == kind)
    }
}

/// How a package's sources moved between the two revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceChange {
    RemoteUnchanged,
    RemoteChanged,
    BundledUnchanged,
    BundledChanged,
}

impl SourceChange {
    /// Remote sources decide when the current recipe fetches any;
    /// otherwise the checksums of the bundled files do.
    pub fn classify(current: &PackageSnapshot, previous: &PackageSnapshot) -> Self {
        match (
            current.fetches_remote_sources(),
            current.remote_sources == previous.remote_sources,
            current.checksums == previous.checksums,
        ) {
            (true, true, _) => SourceChange::RemoteUnchanged,
            (true, false, _) => SourceChange::RemoteChanged,
            (false, _, true) => SourceChange::BundledUnchanged,
            (false, _, false) => SourceChange::BundledChanged,
        }
    }

    fn condition(self) -> &'static str {
        match self {
            SourceChange::RemoteUnchanged => "the remote sources did not change",
            SourceChange::RemoteChanged => "the remote sources changed",
            SourceChange::BundledUnchanged => "the bundled source checksums did not change",
            SourceChange::BundledChanged => "the bundled source checksums changed",
        }
    }
}

/// Expected shape of the new `(pkgver, pkgrel)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpRule {
    /// Same pkgver, pkgrel incremented by exactly one.
    ReleaseIncrement,
    /// Tracking pkgver kept, pkgrel incremented by exactly one.
    TrackingIncrement,
    /// Different pkgver, pkgrel reset to zero.
    UpstreamBump,
}

impl BumpRule {
    pub fn select(change: SourceChange, previous: &PackageSnapshot, policy: &BumpPolicy) -> Self {
        match change {
            SourceChange::RemoteUnchanged | SourceChange::BundledUnchanged => {
                BumpRule::ReleaseIncrement
            }
            SourceChange::RemoteChanged if previous.pkgver == policy.tracking_pkgver => {
                BumpRule::TrackingIncrement
            }
            SourceChange::RemoteChanged | SourceChange::BundledChanged => BumpRule::UpstreamBump,
        }
    }

    /// Every sub-condition of the rule that `current` fails.
    pub fn check(self, current: &PackageSnapshot, previous: &PackageSnapshot) -> Vec<Mismatch> {
        let mut mismatches = Vec::new();
        match self {
            BumpRule::ReleaseIncrement | BumpRule::TrackingIncrement => {
                let expected = previous.pkgrel.saturating_add(1);
                if current.pkgver != previous.pkgver {
                    mismatches.push(Mismatch::PkgverShouldStay {
                        expected: previous.pkgver.clone(),
                        found: current.pkgver.clone(),
                    });
                }
                if current.pkgrel != expected {
                    mismatches.push(Mismatch::PkgrelShouldBe {
                        expected,
                        found: current.pkgrel,
                    });
                }
            }
            BumpRule::UpstreamBump => {
                if current.pkgver == previous.pkgver {
                    mismatches.push(Mismatch::PkgverShouldChange {
                        pkgver: current.pkgver.clone(),
                    });
                }
                if current.pkgrel != 0 {
                    mismatches.push(Mismatch::PkgrelShouldBe {
                        expected: 0,
                        found: current.pkgrel,
                    });
                }
            }
        }
        mismatches
    }
}

/// One failed sub-condition of a [`BumpRule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    PkgverShouldStay { expected: String, found: String },
    PkgverShouldChange { pkgver: String },
    PkgrelShouldBe { expected: u64, found: u64 },
}

impl Mismatch {
    fn describe(&self, change: SourceChange, rule: BumpRule) -> String {
        let condition = match rule {
            BumpRule::TrackingIncrement => "the remote sources of a tracking package changed",
            _ => change.condition(),
        };
        match self {
            Mismatch::PkgverShouldStay { expected, found } => {
                format!("pkgver should stay `{expected}` when {condition}, found `{found}`")
            }
            Mismatch::PkgverShouldChange { pkgver } => {
                format!("pkgver should change when {condition}, still `{pkgver}`")
            }
            Mismatch::PkgrelShouldBe { expected, found } => {
                format!("pkgrel should be {expected} when {condition}, found {found}")
            }
        }
    }
}

/// Tunable parts of the bump policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpPolicy {
    /// pkgver marking packages that always follow upstream HEAD.
    pub tracking_pkgver: String,
    /// Packages whose names start with one of these need an all-digit pkgver.
    pub strict_pkgver_prefixes: Vec<String>,
}

impl Default for BumpPolicy {
    fn default() -> Self {
        Self {
            tracking_pkgver: DEFAULT_TRACKING_PKGVER.to_string(),
            strict_pkgver_prefixes: vec!["device-".to_string()],
        }
    }
}

/// Full evaluation record for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub package: String,
    pub current_version: String,
    /// `None` for packages absent from the previous revision.
    pub previous_version: Option<String>,
    /// `None` when either version failed to parse or the package is new.
    pub ordering: Option<Ordering>,
    pub verdict: Verdict,
}

impl Assessment {
    pub fn is_new_package(&self) -> bool {
        self.previous_version.is_none()
    }
}

/// Applies a [`BumpPolicy`] to snapshot pairs.
#[derive(Debug, Clone, Default)]
pub struct BumpPolicyEngine {
    policy: BumpPolicy,
}

impl BumpPolicyEngine {
    pub fn new(policy: BumpPolicy) -> Self {
        Self { policy }
    }

    pub fn evaluate(&self, current: &PackageSnapshot, previous: Option<&PackageSnapshot>) -> Verdict {
        self.assess(current, previous).verdict
    }

    pub fn assess(&self, current: &PackageSnapshot, previous: Option<&PackageSnapshot>) -> Assessment {
        let mut assessment = Assessment {
            package: current.name.clone(),
            current_version: current.version_string(),
            previous_version: previous.map(PackageSnapshot::version_string),
            ordering: None,
            verdict: Verdict::Compliant,
        };

        let current_version = match current.version() {
            Ok(version) => version,
            Err(err) => {
                assessment.verdict = Verdict::Violation(vec![Violation::parse_error("current", &err)]);
                return assessment;
            }
        };

        let Some(previous) = previous else {
            if current.pkgrel != 0 {
                assessment.verdict = Verdict::Violation(vec![Violation::new(
                    ViolationKind::NewPackageNonzeroRelease,
                    format!("a new package must start at pkgrel 0, found {}", current.pkgrel),
                )]);
            }
            return assessment;
        };

        let previous_version = match previous.version() {
            Ok(version) => version,
            Err(err) => {
                assessment.verdict =
                    Verdict::Violation(vec![Violation::parse_error("previous", &err)]);
                return assessment;
            }
        };

        let mut violations = self.check_pkgver_format(current);
        violations.extend(self.check_bump_rule(current, previous));

        let ordering = vercmp::compare(&current_version, &previous_version);
        if ordering != Ordering::Greater {
            violations.push(Violation::new(
                ViolationKind::VersionNotIncreased,
                format!(
                    "version {} must be greater than {}",
                    current_version, previous_version
                ),
            ));
        }

        assessment.ordering = Some(ordering);
        assessment.verdict = Verdict::from_violations(violations);
        assessment
    }

    fn check_bump_rule(&self, current: &PackageSnapshot, previous: &PackageSnapshot) -> Vec<Violation> {
        let change = SourceChange::classify(current, previous);
        let rule = BumpRule::select(change, previous, &self.policy);
        rule.check(current, previous)
            .iter()
            .map(|mismatch| {
                Violation::new(ViolationKind::BumpRuleMismatch, mismatch.describe(change, rule))
            })
            .collect()
    }

    fn check_pkgver_format(&self, current: &PackageSnapshot) -> Vec<Violation> {
        let all_digits =
            !current.pkgver.is_empty() && current.pkgver.bytes().all(|b| b.is_ascii_digit());
        self.policy
            .strict_pkgver_prefixes
            .iter()
            .find(|prefix| current.name.starts_with(prefix.as_str()))
            .filter(|_| !all_digits)
            .map(|prefix| {
                Violation::new(
                    ViolationKind::InvalidPkgver,
                    format!(
                        "pkgver `{}` must be all digits for `{prefix}*` packages",
                        current.pkgver
                    ),
                )
            })
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn remote(pkgver: &str, pkgrel: u64, file: &str) -> PackageSnapshot {
        PackageSnapshot::new("hello", pkgver, pkgrel).with_remote_source(file, "sum")
    }

    fn bundled(pkgver: &str, pkgrel: u64, checksum: &str) -> PackageSnapshot {
        PackageSnapshot::new("hello", pkgver, pkgrel).with_bundled_source("hello.sh", checksum)
    }

    #[test]
    fn classifies_remote_before_bundled() {
        let previous = remote("1.0", 0, "a.tar.gz");
        assert_eq!(
            SourceChange::classify(&remote("1.0", 1, "a.tar.gz"), &previous),
            SourceChange::RemoteUnchanged
        );
        assert_eq!(
            SourceChange::classify(&remote("1.1", 0, "b.tar.gz"), &previous),
            SourceChange::RemoteChanged
        );
        assert_eq!(
            SourceChange::classify(&bundled("1.0", 1, "x"), &bundled("1.0", 0, "x")),
            SourceChange::BundledUnchanged
        );
        assert_eq!(
            SourceChange::classify(&bundled("1.0", 1, "y"), &bundled("1.0", 0, "x")),
            SourceChange::BundledChanged
        );
    }

    #[rstest]
    #[case(SourceChange::RemoteUnchanged, "1.0", BumpRule::ReleaseIncrement)]
    #[case(SourceChange::BundledUnchanged, "9999", BumpRule::ReleaseIncrement)]
    #[case(SourceChange::RemoteChanged, "9999", BumpRule::TrackingIncrement)]
    #[case(SourceChange::RemoteChanged, "1.0", BumpRule::UpstreamBump)]
    #[case(SourceChange::BundledChanged, "9999", BumpRule::UpstreamBump)]
    fn decision_table(
        #[case] change: SourceChange,
        #[case] previous_pkgver: &str,
        #[case] expected: BumpRule,
    ) {
        let previous = PackageSnapshot::new("hello", previous_pkgver, 2);
        assert_eq!(
            BumpRule::select(change, &previous, &BumpPolicy::default()),
            expected
        );
    }

    #[test]
    fn release_increment_reports_each_sub_condition() {
        let previous = PackageSnapshot::new("hello", "1.0", 2);
        let current = PackageSnapshot::new("hello", "1.1", 5);
        let mismatches = BumpRule::ReleaseIncrement.check(&current, &previous);
        assert_eq!(
            mismatches,
            vec![
                Mismatch::PkgverShouldStay {
                    expected: "1.0".into(),
                    found: "1.1".into()
                },
                Mismatch::PkgrelShouldBe {
                    expected: 3,
                    found: 5
                },
            ]
        );
    }

    #[test]
    fn upstream_bump_reports_each_sub_condition() {
        let previous = PackageSnapshot::new("hello", "1.0", 2);
        let current = PackageSnapshot::new("hello", "1.0", 3);
        let mismatches = BumpRule::UpstreamBump.check(&current, &previous);
        assert_eq!(mismatches.len(), 2);
        assert!(BumpRule::UpstreamBump
            .check(&PackageSnapshot::new("hello", "1.1", 0), &previous)
            .is_empty());
    }

    #[test]
    fn pkgrel_overflow_does_not_panic() {
        let previous = PackageSnapshot::new("hello", "1.0", u64::MAX);
        let current = PackageSnapshot::new("hello", "1.0", u64::MAX);
        assert!(BumpRule::ReleaseIncrement.check(&current, &previous).is_empty());
        let verdict = BumpPolicyEngine::default().evaluate(&current, Some(&previous));
        assert!(verdict.has(ViolationKind::VersionNotIncreased));
    }

    #[test]
    fn new_package_must_start_at_zero() {
        let engine = BumpPolicyEngine::default();
        assert!(engine
            .evaluate(&PackageSnapshot::new("hello", "1.0", 0), None)
            .is_compliant());
        let verdict = engine.evaluate(&PackageSnapshot::new("hello", "1.0", 1), None);
        assert_eq!(verdict.violations().len(), 1);
        assert!(verdict.has(ViolationKind::NewPackageNonzeroRelease));
    }

    #[test]
    fn unparseable_current_stops_evaluation() {
        let engine = BumpPolicyEngine::default();
        let assessment = engine.assess(
            &PackageSnapshot::new("hello", "1.0_bogus", 0),
            Some(&PackageSnapshot::new("hello", "1.0", 0)),
        );
        assert_eq!(assessment.ordering, None);
        assert_eq!(assessment.verdict.violations().len(), 1);
        assert!(assessment.verdict.has(ViolationKind::ParseError));
        assert!(assessment.verdict.violations()[0]
            .detail
            .starts_with("current version"));
    }

    #[test]
    fn unparseable_previous_stops_evaluation() {
        let engine = BumpPolicyEngine::default();
        let verdict = engine.evaluate(
            &PackageSnapshot::new("hello", "1.1", 0),
            Some(&PackageSnapshot::new("hello", "v1.0", 0)),
        );
        assert_eq!(
            verdict.violations()[0].detail,
            "previous version: Version `v1.0-r0` must start with a digit"
        );
    }

    #[test]
    fn strict_prefix_requires_digit_pkgver() {
        let engine = BumpPolicyEngine::default();
        let previous = PackageSnapshot::new("device-foo", "1", 0);
        let verdict = engine.evaluate(&PackageSnapshot::new("device-foo", "1.1", 0), Some(&previous));
        assert!(verdict.has(ViolationKind::InvalidPkgver));
        let verdict = engine.evaluate(&PackageSnapshot::new("device-foo", "1", 1), Some(&previous));
        assert!(verdict.is_compliant());
    }

    #[test]
    fn mismatch_detail_names_the_rule() {
        let engine = BumpPolicyEngine::default();
        let verdict = engine.evaluate(&remote("1.0", 1, "b.tar.gz"), Some(&remote("1.0", 0, "a.tar.gz")));
        let details: Vec<&str> = verdict
            .violations()
            .iter()
            .filter(|v| v.kind == ViolationKind::BumpRuleMismatch)
            .map(|v| v.detail.as_str())
            .collect();
        assert_eq!(
            details,
            vec![
                "pkgver should change when the remote sources changed, still `1.0`",
                "pkgrel should be 0 when the remote sources changed, found 1",
            ]
        );
    }
}
