use std::path::{Path, PathBuf};

use anyhow::Result;
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{error, info, warn};

use suq_types::api::{Claims, UploadRequest, UploadResponse};

use crate::auth::AppState;

/// Upper bound on decoded upload size. Covers product photos, chat images,
/// and payment-proof screenshots.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Request-body ceiling for the upload route. Must exceed the base64
/// encoding of a maximum-size upload plus the JSON envelope, otherwise the
/// framework's default body limit rejects uploads before the handler's own
/// size check can run.
pub const MAX_UPLOAD_BODY_BYTES: usize = MAX_UPLOAD_BYTES / 3 * 4 + 64 * 1024;

/// On-disk object store for uploaded images.
///
/// Files are content-addressed: the name is the SHA-256 of the bytes plus an
/// extension derived from the declared content type, so re-uploading the
/// same image yields the same URL without a second write.
pub struct MediaStore {
    dir: PathBuf,
}

impl MediaStore {
    pub async fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).await?;
        info!("Media storage directory: {}", dir.display());
        Ok(Self { dir })
    }

    /// Directory served under `/media/`.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store bytes and return the file name they are served under.
    pub async fn store(&self, bytes: &[u8], content_type: &str) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let name = format!(
            "{}.{}",
            hex::encode(hasher.finalize()),
            extension_for(content_type)
        );

        let path = self.dir.join(&name);
        if fs::try_exists(&path).await? {
            return Ok(name);
        }
        fs::write(&path, bytes).await?;
        Ok(name)
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}

/// upload(bytes) -> URL. The caller treats the returned URL as opaque.
pub async fn upload(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<UploadRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let bytes = B64.decode(&req.data).map_err(|_| StatusCode::BAD_REQUEST)?;

    if bytes.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        warn!("Rejected {} byte upload", bytes.len());
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }

    let name = state
        .media
        .store(&bytes, &req.content_type)
        .await
        .map_err(|e| { error!("Media write failed: {}", e); StatusCode::INTERNAL_SERVER_ERROR })?;

    let url = format!(
        "{}/media/{}",
        state.config.public_url.trim_end_matches('/'),
        name
    );

    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_limit_admits_a_maximum_size_upload() {
        // base64 expands every 3 bytes to 4; the route's body limit must
        // leave room for that plus the JSON fields around the data.
        let encoded_len = MAX_UPLOAD_BYTES.div_ceil(3) * 4;
        assert!(MAX_UPLOAD_BODY_BYTES > encoded_len + 1024);
    }

    #[tokio::test]
    async fn store_is_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path().join("media")).await.unwrap();

        let name1 = store.store(b"image bytes", "image/png").await.unwrap();
        let name2 = store.store(b"image bytes", "image/png").await.unwrap();
        assert_eq!(name1, name2);
        assert!(name1.ends_with(".png"));

        let other = store.store(b"different bytes", "image/jpeg").await.unwrap();
        assert_ne!(name1, other);
        assert!(other.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn stored_bytes_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path().join("media")).await.unwrap();

        let name = store.store(b"payment proof", "application/pdf").await.unwrap();
        assert!(name.ends_with(".bin"));

        let on_disk = fs::read(store.dir().join(&name)).await.unwrap();
        assert_eq!(on_disk, b"payment proof");
    }
}
