//! API credentials and the on-disk credential layout
//!
//! The dyndns deployment keeps the key and the secret in two files next to each other:
//! `<dir>/<name>.key` and `<dir>/<name>.secret`.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ApiError, Result};

/// API key and secret. Immutable for the lifetime of a client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("api_secret", &"***")
            .finish()
    }
}

/// Loads [`Credentials`] from a `.key`/`.secret` file pair.
#[derive(Debug, Clone)]
pub struct FileCredentialSource {
    dir: PathBuf,
    name: String,
}

impl FileCredentialSource {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    pub fn key_path(&self) -> PathBuf {
        self.dir.join(format!("{}.key", self.name))
    }

    pub fn secret_path(&self) -> PathBuf {
        self.dir.join(format!("{}.secret", self.name))
    }

    /// Read both files, trimming surrounding whitespace.
    pub fn load(&self) -> Result<Credentials> {
        let api_key = read_trimmed(&self.key_path())?;
        let api_secret = read_trimmed(&self.secret_path())?;
        log::debug!("Loaded API credentials from {}", self.dir.display());
        Ok(Credentials::new(api_key, api_secret))
    }
}

fn read_trimmed(path: &Path) -> Result<String> {
    let missing = || ApiError::MissingCredential {
        path: path.display().to_string(),
    };
    let content = std::fs::read_to_string(path).map_err(|e| {
        log::error!("Failed to read {}: {e}", path.display());
        missing()
    })?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(missing());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, file: &str, content: &str) {
        std::fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn debug_redacts_both_values() {
        let creds = Credentials::new("my-key", "my-secret");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("my-key"));
        assert!(!debug.contains("my-secret"));
    }

    #[test]
    fn paths_follow_name() {
        let source = FileCredentialSource::new("/tmp", "myra");
        assert_eq!(source.key_path(), PathBuf::from("/tmp/myra.key"));
        assert_eq!(source.secret_path(), PathBuf::from("/tmp/myra.secret"));
    }

    #[test]
    fn load_trims_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "myra.key", "  abc123\n");
        write(dir.path(), "myra.secret", "s3cr3t\r\n");

        let creds = FileCredentialSource::new(dir.path(), "myra").load().unwrap();
        assert_eq!(creds.api_key(), "abc123");
        assert_eq!(creds.api_secret(), "s3cr3t");
    }

    #[test]
    fn missing_secret_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "myra.key", "abc123");

        let err = FileCredentialSource::new(dir.path(), "myra")
            .load()
            .unwrap_err();
        match err {
            ApiError::MissingCredential { path } => assert!(path.ends_with("myra.secret")),
            other => panic!("expected MissingCredential, got {other:?}"),
        }
    }

    #[test]
    fn blank_key_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ops.key", " \n");
        write(dir.path(), "ops.secret", "s3cr3t");

        let err = FileCredentialSource::new(dir.path(), "ops").load().unwrap_err();
        assert!(matches!(err, ApiError::MissingCredential { path } if path.ends_with("ops.key")));
    }
}
