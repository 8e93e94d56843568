//! Crypt algorithm detection from the hash prefix.

/// Algorithm a stored crypt hash was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CryptAlgorithm {
    Des,
    Md5,
    Sha256,
    Sha512,
}

impl CryptAlgorithm {
    /// Work out the algorithm from a stored hash.
    ///
    /// Hashes without a `$` prefix, including empty and locked ones, are
    /// treated as traditional DES. Prefixed hashes
    /// must have a single-character id (`$1$`, `$5$`, `$6$`); anything else
    /// is not recognised.
    pub fn detect(hash: &str) -> Option<Self> {
        let bytes = hash.as_bytes();
        if bytes.first() != Some(&b'$') {
            return Some(Self::Des);
        }
        match (bytes.get(1), bytes.get(2)) {
            (Some(b'1'), Some(b'$')) => Some(Self::Md5),
            (Some(b'5'), Some(b'$')) => Some(Self::Sha256),
            (Some(b'6'), Some(b'$')) => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Whether `name` names this algorithm, ignoring ASCII case.
    pub fn matches(self, name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Des => "des",
            Self::Md5 => "md5",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl std::fmt::Display for CryptAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_prefixes() {
        assert_eq!(CryptAlgorithm::detect("$1$salt$hash"), Some(CryptAlgorithm::Md5));
        assert_eq!(CryptAlgorithm::detect("$5$salt$hash"), Some(CryptAlgorithm::Sha256));
        assert_eq!(CryptAlgorithm::detect("$6$salt$hash"), Some(CryptAlgorithm::Sha512));
        assert_eq!(CryptAlgorithm::detect("abJnggxhB/yWI"), Some(CryptAlgorithm::Des));
        assert_eq!(CryptAlgorithm::detect("!"), Some(CryptAlgorithm::Des));
        assert_eq!(CryptAlgorithm::detect(""), Some(CryptAlgorithm::Des));
    }

    #[test]
    fn unrecognised_prefixes() {
        assert_eq!(CryptAlgorithm::detect("$2b$10$abc"), None);
        assert_eq!(CryptAlgorithm::detect("$y$j9T$abc"), None);
        assert_eq!(CryptAlgorithm::detect("$7"), None);
        assert_eq!(CryptAlgorithm::detect("$"), None);
    }

    #[test]
    fn names_match_case_insensitively() {
        assert!(CryptAlgorithm::Sha512.matches("SHA512"));
        assert!(CryptAlgorithm::Md5.matches("Md5"));
        assert!(!CryptAlgorithm::Sha512.matches("sha256"));
        assert!(!CryptAlgorithm::Des.matches("blowfish"));
    }
}
