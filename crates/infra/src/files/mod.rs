//! Media file storage.
//!
//! Uploads are written to an external WebDAV share. The trait exists so the
//! API layer can run against [`InMemoryMediaStore`] in tests, and every write
//! is awaited and checked before the caller's request completes: a failed
//! upload surfaces as an error, never as a dangling URL.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

mod webdav;

pub use webdav::{WebdavClient, WebdavConfig};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("invalid media path: {0}")]
    InvalidPath(String),

    #[error("media backend failure: {0}")]
    Upstream(String),
}

impl MediaError {
    pub(crate) fn upstream(operation: &str, err: impl core::fmt::Display) -> Self {
        tracing::error!(operation, error = %err, "media backend failure");
        Self::Upstream(format!("{operation}: {err}"))
    }
}

/// Relative paths only, no traversal, no absolute paths.
pub(crate) fn validate_path(path: &str) -> Result<(), MediaError> {
    if path.trim().is_empty() {
        return Err(MediaError::InvalidPath("empty path".into()));
    }
    if path.starts_with('/') || path.starts_with('\\') {
        return Err(MediaError::InvalidPath(format!(
            "absolute path not allowed: {path:?}"
        )));
    }
    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(MediaError::InvalidPath(format!(
            "path traversal not allowed: {path:?}"
        )));
    }
    Ok(())
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `bytes` at `path` (relative, forward-slash separated) and return
    /// the public URL of the stored file.
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<String, MediaError>;

    async fn delete(&self, path: &str) -> Result<(), MediaError>;
}

/// Test double that keeps uploads in a map.
#[derive(Debug, Default)]
pub struct InMemoryMediaStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
    fail_next: Mutex<bool>,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `put` fail, for testing upload-failure propagation.
    pub fn fail_next_put(&self) {
        *self.fail_next.lock().unwrap_or_else(|p| p.into_inner()) = true;
    }

    pub fn stored(&self, path: &str) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(path)
            .cloned()
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> Result<String, MediaError> {
        validate_path(path)?;
        {
            let mut fail = self.fail_next.lock().unwrap_or_else(|p| p.into_inner());
            if *fail {
                *fail = false;
                return Err(MediaError::Upstream("injected failure".into()));
            }
        }
        self.files
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(path.to_string(), bytes);
        Ok(format!("memory://{path}"))
    }

    async fn delete(&self, path: &str) -> Result<(), MediaError> {
        validate_path(path)?;
        let removed = self
            .files
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(path);
        match removed {
            Some(_) => Ok(()),
            None => Err(MediaError::Upstream(format!("no such file: {path}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_traversal_and_absolute_paths() {
        assert!(validate_path("products/mug.png").is_ok());
        assert!(validate_path("").is_err());
        assert!(validate_path("/etc/passwd").is_err());
        assert!(validate_path("a/../b.png").is_err());
        assert!(validate_path("..").is_err());
    }

    #[tokio::test]
    async fn put_then_delete_roundtrip() {
        let store = InMemoryMediaStore::new();
        let url = store.put("hero/1.png", vec![1, 2, 3]).await.unwrap();
        assert_eq!(url, "memory://hero/1.png");
        assert_eq!(store.stored("hero/1.png"), Some(vec![1, 2, 3]));
        store.delete("hero/1.png").await.unwrap();
        assert!(store.stored("hero/1.png").is_none());
    }

    #[tokio::test]
    async fn injected_failure_surfaces_to_caller() {
        let store = InMemoryMediaStore::new();
        store.fail_next_put();
        let err = store.put("hero/1.png", vec![0]).await.unwrap_err();
        assert!(matches!(err, MediaError::Upstream(_)));
        assert!(store.stored("hero/1.png").is_none());
    }
}
