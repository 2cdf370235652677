use actix_web::web::{self, Bytes};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;

/// Disk-backed file storage. Callers only ever see the returned URI.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_base_url: String,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Stores `bytes` under a generated name and returns its public URI.
    pub async fn save(&self, original_name: &str, bytes: Bytes) -> Result<String, ApiError> {
        if bytes.is_empty() {
            return Err(ApiError::invalid_input("No file"));
        }

        let file_name = stored_name(original_name);
        let dir = self.dir.clone();
        let path = dir.join(&file_name);

        web::block(move || {
            std::fs::create_dir_all(&dir)?;
            std::fs::write(&path, &bytes)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("upload worker failed: {e}")))?
        .map_err(|e| ApiError::Internal(format!("failed to store upload: {e}")))?;

        debug!(file = %file_name, "Stored upload");
        Ok(format!("{}/uploads/{}", self.public_base_url, file_name))
    }
}

/// `<millis>-<uuid>[.ext]`, keeping only a short alphanumeric extension.
fn stored_name(original_name: &str) -> String {
    let stem = format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().to_simple()
    );

    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()));

    match ext {
        Some(ext) => format!("{stem}.{}", ext.to_ascii_lowercase()),
        None => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_safe_extensions_only() {
        assert!(stored_name("cv.PDF").ends_with(".pdf"));
        assert!(!stored_name("../../etc/passwd").contains('/'));
        assert!(!stored_name("x.sh;rm -rf").contains('.'));
    }

    #[actix_web::test]
    async fn saves_file_and_returns_public_uri() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), "http://localhost:5000/");

        let uri = store.save("me.png", Bytes::from_static(b"png")).await.unwrap();
        assert!(uri.starts_with("http://localhost:5000/uploads/"));

        let name = uri.rsplit('/').next().unwrap();
        assert_eq!(std::fs::read(dir.path().join(name)).unwrap(), b"png");
    }

    #[actix_web::test]
    async fn empty_body_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path(), "http://localhost:5000");
        let err = store.save("me.png", Bytes::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
}
