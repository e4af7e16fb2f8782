//! Durable storage for generated documents, keyed by filename.

use std::path::PathBuf;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

/// Blob store for rendered documents. The filename is the stable reference
/// recorded on the application row.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    async fn put(&self, filename: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), AppError>;
    async fn get(&self, filename: &str) -> Result<Bytes, AppError>;
    async fn delete(&self, filename: &str) -> Result<(), AppError>;
}

/// Filenames are generated server-side; anything with a path component is rejected.
fn check_filename(filename: &str) -> Result<(), AppError> {
    if filename.is_empty()
        || filename.contains(['/', '\\'])
        || filename.starts_with('.')
    {
        return Err(AppError::Validation(format!("Invalid document name '{filename}'")));
    }
    Ok(())
}

/// S3 / MinIO bucket, objects under `resumes/`.
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    fn key(filename: &str) -> String {
        format!("resumes/{filename}")
    }
}

#[async_trait]
impl DocumentStorage for S3Storage {
    async fn put(&self, filename: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        check_filename(filename)?;
        let key = Self::key(filename);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded document to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn get(&self, filename: &str) -> Result<Bytes, AppError> {
        check_filename(filename)?;
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(Self::key(filename))
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().map(|se| se.is_no_such_key()) == Some(true) {
                    AppError::NotFound(format!("Document {filename} not found"))
                } else {
                    AppError::Storage(format!("S3 download failed: {e}"))
                }
            })?;

        let data = object
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("S3 body read failed: {e}")))?;
        Ok(data.into_bytes())
    }

    async fn delete(&self, filename: &str) -> Result<(), AppError> {
        check_filename(filename)?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(Self::key(filename))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete failed: {e}")))?;
        Ok(())
    }
}

/// Plain directory on the local filesystem.
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DocumentStorage for LocalStorage {
    async fn put(&self, filename: &str, bytes: Vec<u8>, _content_type: &str) -> Result<(), AppError> {
        check_filename(filename)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Storage(format!("Cannot create {}: {e}", self.dir.display())))?;

        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Storage(format!("Cannot write {}: {e}", path.display())))?;

        info!("Wrote document to {}", path.display());
        Ok(())
    }

    async fn get(&self, filename: &str) -> Result<Bytes, AppError> {
        check_filename(filename)?;
        let path = self.dir.join(filename);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("Document {filename} not found")))
            }
            Err(e) => Err(AppError::Storage(format!("Cannot read {}: {e}", path.display()))),
        }
    }

    async fn delete(&self, filename: &str) -> Result<(), AppError> {
        check_filename(filename)?;
        let path = self.dir.join(filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Cannot delete {}: {e}", path.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("uploads"));

        storage
            .put("cv_test.pdf", b"%PDF-1.5".to_vec(), "application/pdf")
            .await
            .unwrap();
        assert_eq!(storage.get("cv_test.pdf").await.unwrap().as_ref(), b"%PDF-1.5");

        storage.delete("cv_test.pdf").await.unwrap();
        assert!(matches!(
            storage.get("cv_test.pdf").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_local_delete_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage.delete("cv_missing.docx").await.unwrap();
    }

    #[tokio::test]
    async fn test_path_components_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        for name in ["../etc/passwd", "a/b.pdf", "", ".hidden"] {
            assert!(
                matches!(storage.get(name).await, Err(AppError::Validation(_))),
                "{name:?} accepted"
            );
        }
    }
}
