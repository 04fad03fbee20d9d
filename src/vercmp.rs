/*============================================================
  Synavera Project: Syn-Vercheck
  Module: synvercheck_core::vercmp
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Native, stateless replacement for shelling out to a
    package manager's version comparison utility.

  Security / Safety Notes:
    Pure computation; no processes are spawned.

  Dependencies:
    None beyond std and the version module.

  Operational Scope:
    Backs `Ord for Version`, the bump policy engine, and the
    `compare` CLI utility.

  Revision History:
    2026-10-16 COD  Ported version comparison in-process.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic total ordering
    - Stage-by-stage comparison, first difference wins
============================================================*/

use std::cmp::Ordering;

use crate::version::{CoreSegment, SuffixGroup, Version, VersionError, RELEASE_RANK};

/// Compare two versions: core segments, then suffix groups, then revision.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    compare_core(a.core(), b.core())
        .then_with(|| compare_suffixes(a.suffixes(), b.suffixes()))
        .then_with(|| a.revision().cmp(&b.revision()))
}

/// Parse and compare two raw version strings.
pub fn compare_str(a: &str, b: &str) -> Result<Ordering, VersionError> {
    let left = Version::parse(a)?;
    let right = Version::parse(b)?;
    Ok(compare(&left, &right))
}

/// Operator used in report lines for a comparison result.
pub fn operator(ordering: Ordering) -> &'static str {
    match ordering {
        Ordering::Less => "<",
        Ordering::Equal => "==",
        Ordering::Greater => ">",
    }
}

// Both sides are stored without trailing zero padding, so plain
// lexicographic order already treats `1.0` and `1` as equal.
fn compare_core(a: &[CoreSegment], b: &[CoreSegment]) -> Ordering {
    a.cmp(b)
}

fn compare_suffixes(a: &[SuffixGroup], b: &[SuffixGroup]) -> Ordering {
    for idx in 0..a.len().max(b.len()) {
        let (left, right) = (a.get(idx), b.get(idx));
        let ordering = suffix_rank(left).cmp(&suffix_rank(right)).then_with(|| {
            match (left, right) {
                (Some(left), Some(right)) => left.counter.cmp(&right.counter),
                // Equal rank with a missing side means both are missing.
                _ => Ordering::Equal,
            }
        });
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn suffix_rank(group: Option<&SuffixGroup>) -> i8 {
    group.map_or(RELEASE_RANK, |group| group.kind.rank())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn cmp(a: &str, b: &str) -> Ordering {
        compare_str(a, b).unwrap()
    }

    #[rstest]
    // padding
    #[case("1.0", "1", Ordering::Equal)]
    #[case("1.0.0.0", "1", Ordering::Equal)]
    #[case("1.0.1", "1.1", Ordering::Less)]
    #[case("1", "1.0.1", Ordering::Less)]
    #[case("1.10", "1.9", Ordering::Greater)]
    #[case("1.010", "1.10", Ordering::Equal)]
    #[case("123456789012345678901234567890", "123456789012345678901234567891", Ordering::Less)]
    // letter tier
    #[case("1.0a", "1.0", Ordering::Greater)]
    #[case("1.0a", "1.1", Ordering::Less)]
    #[case("1.0a", "1.0b", Ordering::Less)]
    #[case("1.0a", "1.0.0", Ordering::Greater)]
    // suffix precedence
    #[case("1.0_alpha", "1.0_beta", Ordering::Less)]
    #[case("1.0_beta", "1.0_pre", Ordering::Less)]
    #[case("1.0_pre", "1.0_rc", Ordering::Less)]
    #[case("1.0_rc1", "1.0_rc2", Ordering::Less)]
    #[case("1.0_rc2", "1.0", Ordering::Less)]
    #[case("1.0_rc", "1.0_rc0", Ordering::Equal)]
    #[case("1.0", "1.0_cvs", Ordering::Less)]
    #[case("1.0_cvs", "1.0_svn", Ordering::Less)]
    #[case("1.0_svn", "1.0_git", Ordering::Less)]
    #[case("1.0", "1.0_git20240101", Ordering::Less)]
    #[case("1.0_git", "1.0_hg", Ordering::Less)]
    #[case("1.0_hg", "1.0_p", Ordering::Less)]
    #[case("1.0_p1_rc1", "1.0_p1", Ordering::Less)]
    #[case("1.0_p1_git1", "1.0_p1", Ordering::Greater)]
    #[case("2.0rc1", "2.0_rc1", Ordering::Equal)]
    #[case("1.0_rc9", "1.0.1_alpha", Ordering::Less)]
    // revision
    #[case("1.0-r1", "1.0-r2", Ordering::Less)]
    #[case("1.0", "1.0-r0", Ordering::Equal)]
    #[case("1.1-r0", "1.0-r9", Ordering::Greater)]
    #[case("1.0_rc1-r9", "1.0-r0", Ordering::Less)]
    // build marker
    #[case("1.0~abc", "1.0", Ordering::Equal)]
    #[case("1.0_git1~abc-r1", "1.0_git1~def-r1", Ordering::Equal)]
    fn orders_versions(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(cmp(a, b), expected, "{a} vs {b}");
        assert_eq!(cmp(b, a), expected.reverse(), "{b} vs {a}");
    }

    #[test]
    fn compare_is_reflexive() {
        for raw in ["1", "1.0a_rc2-r3", "0", "9999-r12"] {
            assert_eq!(cmp(raw, raw), Ordering::Equal);
        }
    }

    #[test]
    fn compare_str_propagates_parse_errors() {
        assert!(compare_str("1.0", "1.0_bogus").is_err());
        assert!(compare_str("x", "1.0").is_err());
    }

    #[test]
    fn sorting_uses_the_total_order() {
        let mut versions: Vec<Version> = ["1.0-r1", "1.0_rc1", "1.0_p1", "1.0", "0.9", "1.0a"]
            .iter()
            .map(|raw| Version::parse(raw).unwrap())
            .collect();
        versions.sort();
        let sorted: Vec<&str> = versions.iter().map(Version::raw).collect();
        assert_eq!(
            sorted,
            vec!["0.9", "1.0_rc1", "1.0", "1.0-r1", "1.0_p1", "1.0a"]
        );
    }

    #[rstest]
    #[case(Ordering::Less, "<")]
    #[case(Ordering::Equal, "==")]
    #[case(Ordering::Greater, ">")]
    fn operator_symbols(#[case] ordering: Ordering, #[case] symbol: &str) {
        assert_eq!(operator(ordering), symbol);
    }
}
