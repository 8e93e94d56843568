//! Password verification against a shadow-format database.
//!
//! Looks up a user's stored hash, works out which crypt algorithm produced
//! it, and checks a candidate password against it.

pub mod algorithm;
pub mod error;
pub mod shadow;
pub mod verify;

pub use algorithm::CryptAlgorithm;
pub use error::ShadowError;
pub use shadow::{ShadowDb, ShadowEntry, DEFAULT_SHADOW_PATH};
pub use verify::{check_algorithm, verify_password};
