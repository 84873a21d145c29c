use async_trait::async_trait;
use std::{path::PathBuf, sync::Arc};
use thiserror::Error;

/// StorageError
///
/// Failure writing an uploaded asset. Logged in full, reported to the client generically.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to prepare {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("simulated storage failure")]
    Simulated,
}

// 1. StorageService Contract
/// StorageService
///
/// Defines the abstract contract for persisting uploaded images. Handlers only
/// see this trait, so tests swap the disk-backed [`LocalDiskStorage`] for the
/// in-memory [`MockStorageService`].
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ensures the target location exists. Called at startup and before each write.
    async fn ensure_ready(&self) -> Result<(), StorageError>;

    /// Stores `bytes` under `filename` and returns the public URL path of the stored file.
    ///
    /// # Arguments
    /// * `filename`: The final, already-generated file name. Path components are stripped.
    /// * `bytes`: The exact uploaded content; nothing is re-encoded.
    async fn put_object(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError>;
}

// 2. The Real Implementation (local public directory)
/// LocalDiskStorage
///
/// Writes uploads into a directory that the router also serves statically
/// under `url_prefix`.
#[derive(Clone)]
pub struct LocalDiskStorage {
    root: PathBuf,
    url_prefix: String,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StorageService for LocalDiskStorage {
    /// ensure_ready
    ///
    /// `create_dir_all` is idempotent, so this is safe on every write.
    async fn ensure_ready(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: self.root.display().to_string(),
                source,
            })
    }

    async fn put_object(&self, filename: &str, bytes: &[u8]) -> Result<String, StorageError> {
        self.ensure_ready().await?;

        let filename = sanitize_filename(filename);
        let path = self.root.join(&filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StorageError::Write {
                path: path.display().to_string(),
                source,
            })?;

        tracing::info!(path = %path.display(), size = bytes.len(), "stored upload");
        Ok(format!("{}/{}", self.url_prefix, filename))
    }
}

/// sanitize_filename
///
/// Reduces a name to its final path segment so nothing can be written outside
/// the upload directory (`..`, `.`, and separators are dropped).
fn sanitize_filename(name: &str) -> String {
    name.split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .last()
        .unwrap_or("upload")
        .to_string()
}

// 3. The Mock Implementation (For Unit Tests)
/// MockStorageService
///
/// A mock implementation of `StorageService` used for handler tests. It keeps
/// nothing and returns a deterministic URL, or fails on demand.
#[derive(Clone)]
pub struct MockStorageService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
    pub url_prefix: String,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self {
            should_fail: false,
            url_prefix: crate::config::DEFAULT_UPLOAD_URL_PREFIX.to_string(),
        }
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }
}

impl Default for MockStorageService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_ready(&self) -> Result<(), StorageError> {
        // No-op in mock environment.
        Ok(())
    }

    async fn put_object(&self, filename: &str, _bytes: &[u8]) -> Result<String, StorageError> {
        if self.should_fail {
            return Err(StorageError::Simulated);
        }
        Ok(format!("{}/{}", self.url_prefix, sanitize_filename(filename)))
    }
}

/// StorageState
///
/// The concrete type used to share the storage service across the application state.
pub type StorageState = Arc<dyn StorageService>;
