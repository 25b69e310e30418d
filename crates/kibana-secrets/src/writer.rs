//! Working-directory file writer

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::catalog::is_relative_file_name;
use crate::{Error, Result};

/// Writes credential files relative to a working directory
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FileWriter: Send + Sync {
    /// Write `bytes` to `relative`, replacing any existing content
    async fn write_file(&self, relative: &str, bytes: &[u8]) -> Result<()>;
}

/// [`FileWriter`] rooted at a directory on the local filesystem
#[derive(Debug, Clone)]
pub struct WorkingDir {
    root: PathBuf,
}

impl WorkingDir {
    /// Create a writer rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory files are written into
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl FileWriter for WorkingDir {
    async fn write_file(&self, relative: &str, bytes: &[u8]) -> Result<()> {
        let path = self.root.join(relative);
        if !is_relative_file_name(relative) {
            return Err(Error::Write {
                path,
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("{} escapes {}", relative, self.root.display()),
                ),
            });
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| Error::Write {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), len = bytes.len(), "wrote credential file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = WorkingDir::new(dir.path());

        writer.write_file("ca.crt", b"first-and-longer").await.unwrap();
        writer.write_file("ca.crt", b"second").await.unwrap();

        let content = std::fs::read(dir.path().join("ca.crt")).unwrap();
        assert_eq!(content, b"second");
    }

    #[tokio::test]
    async fn write_failure_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let writer = WorkingDir::new(dir.path().join("missing"));

        let err = writer.write_file("ca.crt", b"AAA").await.unwrap_err();
        match err {
            Error::Write { path, .. } => assert!(path.ends_with("missing/ca.crt")),
            other => panic!("expected write error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refuses_paths_outside_root() {
        let outside = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let writer = WorkingDir::new(work.path());
        let absolute = outside.path().join("ca.crt");

        let err = writer
            .write_file(&absolute.to_string_lossy(), b"AAA")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Write { ref source, .. }
            if source.kind() == std::io::ErrorKind::InvalidInput));
        assert!(!absolute.exists());

        assert!(writer.write_file("../ca.crt", b"AAA").await.is_err());
        assert!(!work.path().parent().unwrap().join("ca.crt").exists());
        assert_eq!(writer.root(), work.path());
    }
}
