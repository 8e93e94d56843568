//! Integration test: lookup, algorithm check and verification against a
//! shadow file on disk.

use rpctest_shadow::{check_algorithm, verify_password, CryptAlgorithm, ShadowDb, ShadowError};
use tempfile::TempDir;

fn write_shadow(dir: &TempDir, lines: &[String]) -> ShadowDb {
    let path = dir.path().join("shadow");
    std::fs::write(&path, lines.join("\n") + "\n").unwrap();
    ShadowDb::new(path)
}

#[test]
fn verifies_user_from_file() {
    let dir = TempDir::new().unwrap();
    let hash = pwhash::sha256_crypt::hash("correct horse").unwrap();
    let db = write_shadow(
        &dir,
        &[
            "root:*:19000:0:99999:7:::".to_string(),
            format!("tester:{hash}:19000:0:99999:7:::"),
        ],
    );

    let entry = db.lookup("tester").unwrap();
    let algorithm = check_algorithm(&entry, Some("SHA256")).unwrap();
    assert_eq!(algorithm, CryptAlgorithm::Sha256);
    verify_password(&entry, "correct horse").unwrap();
    assert!(matches!(
        verify_password(&entry, "battery staple"),
        Err(ShadowError::Mismatch)
    ));
}

#[test]
fn des_hash_is_recognised_and_verified() {
    let dir = TempDir::new().unwrap();
    let hash = pwhash::unix_crypt::hash("abc123").unwrap();
    let db = write_shadow(&dir, &[format!("legacy:{hash}:1::::::")]);

    let entry = db.lookup("legacy").unwrap();
    assert_eq!(check_algorithm(&entry, None).unwrap(), CryptAlgorithm::Des);
    verify_password(&entry, "abc123").unwrap();
}
