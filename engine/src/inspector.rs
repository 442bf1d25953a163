use async_trait::async_trait;
use std::io;
use std::path::Path;

/// Determines whether a file is empty.
///
/// This is the only I/O on the decoration path. Errors are returned as-is;
/// the provider decides how to degrade.
#[async_trait]
pub trait FileInspector: Send + Sync {
    /// `true` when the file's size is zero bytes.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be statted (deleted mid-query, permission
    /// denied, transient I/O failure).
    async fn is_empty(&self, path: &Path) -> io::Result<bool>;
}

/// Inspector backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsInspector;

#[async_trait]
impl FileInspector for FsInspector {
    async fn is_empty(&self, path: &Path) -> io::Result<bool> {
        let metadata = tokio::fs::metadata(path).await?;
        Ok(metadata.len() == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_empty_and_non_empty_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let empty = dir.path().join("__init__.py");
        std::fs::File::create(&empty).expect("create empty file");

        let full = dir.path().join("full.py");
        let mut file = std::fs::File::create(&full).expect("create file");
        writeln!(file, "import os").expect("write file");

        let inspector = FsInspector;
        assert!(inspector.is_empty(&empty).await.expect("stat empty"));
        assert!(!inspector.is_empty(&full).await.expect("stat full"));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = FsInspector.is_empty(&dir.path().join("gone.py")).await;
        assert_eq!(result.map_err(|e| e.kind()).err(), Some(io::ErrorKind::NotFound));
    }
}
