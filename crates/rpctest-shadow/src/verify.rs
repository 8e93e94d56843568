//! Algorithm checks and password verification.

use tracing::debug;

use crate::algorithm::CryptAlgorithm;
use crate::error::ShadowError;
use crate::shadow::ShadowEntry;

/// Work out the entry's hash algorithm and, if the caller names one,
/// insist on it.
///
/// `expected` is compared by name, so a name no algorithm answers to is
/// simply a mismatch.
pub fn check_algorithm(
    entry: &ShadowEntry,
    expected: Option<&str>,
) -> Result<CryptAlgorithm, ShadowError> {
    let actual = CryptAlgorithm::detect(&entry.hash)
        .ok_or_else(|| ShadowError::UnknownAlgorithm(entry.name.clone()))?;

    match expected {
        Some(expected) if !actual.matches(expected) => Err(ShadowError::AlgorithmMismatch {
            actual,
            expected: expected.to_string(),
        }),
        _ => Ok(actual),
    }
}

/// Hash `password` with the entry's salt and compare with the stored hash.
pub fn verify_password(entry: &ShadowEntry, password: &str) -> Result<(), ShadowError> {
    if pwhash::unix::verify(password, &entry.hash) {
        debug!(user = %entry.name, "password verified");
        Ok(())
    } else {
        Err(ShadowError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(hash: String) -> ShadowEntry {
        ShadowEntry {
            name: "alice".to_string(),
            hash,
        }
    }

    #[test]
    fn sha512_roundtrip() {
        let alice = entry(pwhash::sha512_crypt::hash("hunter2").unwrap());
        assert_eq!(check_algorithm(&alice, None).unwrap(), CryptAlgorithm::Sha512);
        verify_password(&alice, "hunter2").unwrap();
        assert!(matches!(verify_password(&alice, "hunter3"), Err(ShadowError::Mismatch)));
    }

    #[test]
    fn md5_and_sha256_verify() {
        let md5 = entry(pwhash::md5_crypt::hash("s3cret").unwrap());
        assert_eq!(check_algorithm(&md5, None).unwrap(), CryptAlgorithm::Md5);
        verify_password(&md5, "s3cret").unwrap();

        let sha256 = entry(pwhash::sha256_crypt::hash("s3cret").unwrap());
        assert_eq!(check_algorithm(&sha256, None).unwrap(), CryptAlgorithm::Sha256);
        verify_password(&sha256, "s3cret").unwrap();
    }

    #[test]
    fn expected_algorithm_must_match() {
        let alice = entry(pwhash::md5_crypt::hash("pw").unwrap());
        assert!(check_algorithm(&alice, Some("MD5")).is_ok());

        let err = check_algorithm(&alice, Some("sha512")).unwrap_err();
        assert_eq!(err.to_string(), "User password is hashed using md5 (expected sha512)");
    }

    #[test]
    fn unknown_expected_name_is_a_mismatch() {
        let alice = entry(pwhash::sha512_crypt::hash("pw").unwrap());
        let err = check_algorithm(&alice, Some("blowfish")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "User password is hashed using sha512 (expected blowfish)"
        );
    }

    #[test]
    fn undetectable_algorithm() {
        let alice = entry("$2b$10$abcdefghijklmnopqrstuv".to_string());
        let err = check_algorithm(&alice, None).unwrap_err();
        assert_eq!(err.to_string(), "Unable to guess crypt algorithm for password of alice");
    }

    #[test]
    fn locked_account_never_matches() {
        let locked = entry("!".to_string());
        assert!(verify_password(&locked, "").is_err());
        assert!(verify_password(&locked, "!").is_err());
    }
}
