use std::fs;

use serde_json::json;
use synvercheck_core::changeset::load_changeset;
use synvercheck_core::{AuditDriver, AuditSummary, BumpPolicyEngine, VercheckError};
use tempfile::TempDir;

fn write_changeset(dir: &TempDir, value: serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join("changeset.json");
    fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    path
}

#[tokio::test]
async fn loads_and_audits_a_changeset_file() {
    let dir = TempDir::new().unwrap();
    let path = write_changeset(
        &dir,
        json!({
            "packages": [
                {
                    "current": {
                        "name": "hello-world",
                        "pkgver": "1",
                        "pkgrel": 5,
                        "checksums": {"main.c": "c1", "Makefile": "m1"}
                    },
                    "previous": {
                        "name": "hello-world",
                        "pkgver": "1",
                        "pkgrel": 4,
                        "checksums": {"main.c": "c1", "Makefile": "m1"}
                    }
                },
                {
                    "current": {
                        "name": "device-example",
                        "pkgver": "3",
                        "pkgrel": 0,
                        "checksums": {"deviceinfo": "d2"}
                    },
                    "previous": {
                        "name": "device-example",
                        "pkgver": "2",
                        "pkgrel": 7,
                        "checksums": {"deviceinfo": "d1"}
                    }
                }
            ]
        }),
    );

    let packages = load_changeset(&path).await.unwrap();
    assert_eq!(packages[0].name(), "device-example");

    let assessments = AuditDriver::new(BumpPolicyEngine::default(), 2)
        .run(packages)
        .await
        .unwrap();
    let summary = AuditSummary::from_assessments(&assessments);
    assert_eq!(summary.total_packages, 2);
    assert!(!summary.any_violation(), "{assessments:?}");
}

#[tokio::test]
async fn missing_file_is_a_filesystem_error() {
    let dir = TempDir::new().unwrap();
    let err = load_changeset(&dir.path().join("absent.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, VercheckError::Filesystem(_)));
    assert_eq!(err.exit_status(), 40);
}

#[tokio::test]
async fn unknown_top_level_keys_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_changeset(&dir, json!({"packages": [], "branch": "master"}));
    let err = load_changeset(&path).await.unwrap_err();
    assert!(matches!(err, VercheckError::Serialization(_)));
}

#[tokio::test]
async fn empty_changeset_is_valid() {
    let dir = TempDir::new().unwrap();
    let path = write_changeset(&dir, json!({"packages": []}));
    assert!(load_changeset(&path).await.unwrap().is_empty());
}
