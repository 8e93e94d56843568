//! Password verification errors.

use thiserror::Error;

use crate::algorithm::CryptAlgorithm;

#[derive(Debug, Error)]
pub enum ShadowError {
    #[error("Unable to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown user {0}")]
    UnknownUser(String),

    #[error("Unable to guess crypt algorithm for password of {0}")]
    UnknownAlgorithm(String),

    #[error("User password is hashed using {actual} (expected {expected})")]
    AlgorithmMismatch {
        actual: CryptAlgorithm,
        expected: String,
    },

    #[error("Passwords do not match")]
    Mismatch,
}
