//! Shadow database lookup.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ShadowError;

/// System shadow database.
pub const DEFAULT_SHADOW_PATH: &str = "/etc/shadow";

/// One user's record: the login name and the stored crypt hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowEntry {
    pub name: String,
    pub hash: String,
}

impl ShadowEntry {
    /// Parse a `name:hash:...` line. Fields after the hash are ignored.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split(':');
        let name = fields.next().filter(|n| !n.is_empty())?;
        let hash = fields.next()?;
        Some(Self {
            name: name.to_string(),
            hash: hash.to_string(),
        })
    }
}

/// A shadow-format file.
#[derive(Debug, Clone)]
pub struct ShadowDb {
    path: PathBuf,
}

impl Default for ShadowDb {
    fn default() -> Self {
        Self::new(DEFAULT_SHADOW_PATH)
    }
}

impl ShadowDb {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Find the entry for `user`. The first matching line wins.
    pub fn lookup(&self, user: &str) -> Result<ShadowEntry, ShadowError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| ShadowError::Read {
            path: self.path.display().to_string(),
            source,
        })?;

        let entry = content
            .lines()
            .filter_map(ShadowEntry::parse)
            .find(|entry| entry.name == user)
            .ok_or_else(|| ShadowError::UnknownUser(user.to_string()))?;
        debug!(user, path = %self.path.display(), "found shadow entry");
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SHADOW: &str = "\
root:!:19000:0:99999:7:::
alice:$6$salt$abcdef:19000:0:99999:7:::
broken
:nameless:1
bob::19000::::::
";

    fn db(dir: &TempDir) -> ShadowDb {
        let path = dir.path().join("shadow");
        std::fs::write(&path, SHADOW).unwrap();
        ShadowDb::new(path)
    }

    #[test]
    fn finds_user_entry() {
        let dir = TempDir::new().unwrap();
        let entry = db(&dir).lookup("alice").unwrap();
        assert_eq!(entry.hash, "$6$salt$abcdef");

        let entry = db(&dir).lookup("bob").unwrap();
        assert_eq!(entry.hash, "");
    }

    #[test]
    fn unknown_user() {
        let dir = TempDir::new().unwrap();
        let err = db(&dir).lookup("mallory").unwrap_err();
        assert_eq!(err.to_string(), "Unknown user mallory");
        assert!(db(&dir).lookup("broken").is_err());
        assert!(db(&dir).lookup("").is_err());
    }

    #[test]
    fn unreadable_database() {
        let dir = TempDir::new().unwrap();
        let err = ShadowDb::new(dir.path().join("absent")).lookup("root").unwrap_err();
        assert!(matches!(err, ShadowError::Read { .. }));
    }
}
