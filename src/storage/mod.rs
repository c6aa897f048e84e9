use std::path::PathBuf;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Durable object store for generated assets. `put` has overwrite
/// semantics: re-uploading to the same path replaces the prior object.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Writes `data` at `path` and returns the public URL of the object.
    async fn put(&self, path: &str, data: &[u8]) -> Result<String>;
}

/// Storage path for a registration's certificate image. Fixed per event
/// and registration, so a retry overwrites rather than duplicates.
pub fn certificate_object_path(event_id: Uuid, registration_id: Uuid) -> String {
    format!("event-certificates/{}/{}.png", event_id, registration_id)
}

/// Filesystem-backed storage: objects live under `root` and are served
/// from `public_base_url`.
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        let mut public_base_url = public_base_url.into();
        while public_base_url.ends_with('/') {
            public_base_url.pop();
        }
        Self {
            root: root.into(),
            public_base_url,
        }
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(&self, path: &str, data: &[u8]) -> Result<String> {
        // Keep object paths inside the storage root.
        if path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
            return Err(AppError::Storage(format!("Invalid object path: {}", path)));
        }

        let file_path = self.root.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!("Failed to create object directory: {}", e))
            })?;
        }

        let mut file = fs::File::create(&file_path).await.map_err(|e| {
            AppError::Storage(format!("Failed to create object: {}", e))
        })?;

        file.write_all(data).await.map_err(|e| {
            AppError::Storage(format!("Failed to write object: {}", e))
        })?;

        Ok(format!("{}/{}", self.public_base_url, path))
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod fake {
    use std::sync::Mutex;
    use super::*;

    /// In-memory store keyed by path; overwrites like the real thing.
    pub struct FakeObjectStorage {
        pub fail: bool,
        pub objects: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl FakeObjectStorage {
        pub fn new() -> Self {
            Self { fail: false, objects: Mutex::new(Vec::new()) }
        }

        pub fn failing() -> Self {
            Self { fail: true, objects: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl ObjectStorage for FakeObjectStorage {
        async fn put(&self, path: &str, data: &[u8]) -> Result<String> {
            if self.fail {
                return Err(AppError::Storage("disk full".to_string()));
            }
            let mut objects = self.objects.lock().unwrap();
            objects.retain(|(p, _)| p != path);
            objects.push((path.to_string(), data.to_vec()));
            Ok(format!("https://storage.test/{}", path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_path_is_keyed_by_event_and_registration() {
        let event_id = Uuid::new_v4();
        let registration_id = Uuid::new_v4();
        let path = certificate_object_path(event_id, registration_id);
        assert_eq!(
            path,
            format!("event-certificates/{}/{}.png", event_id, registration_id)
        );
    }

    #[tokio::test]
    async fn put_rejects_path_traversal() {
        let storage = LocalObjectStorage::new(
            std::env::temp_dir().join("clubdesk-storage-test"),
            "http://localhost/uploads/",
        );
        let err = storage.put("../escape.png", b"x").await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn put_overwrites_and_returns_public_url() {
        let root = std::env::temp_dir().join(format!("clubdesk-storage-{}", Uuid::new_v4()));
        let storage = LocalObjectStorage::new(&root, "http://localhost/uploads");

        let url = storage.put("a/b.png", b"first").await.unwrap();
        assert_eq!(url, "http://localhost/uploads/a/b.png");

        storage.put("a/b.png", b"second").await.unwrap();
        let contents = tokio::fs::read(root.join("a/b.png")).await.unwrap();
        assert_eq!(contents, b"second");
    }
}
