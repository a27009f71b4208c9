//! Image uploads for inventory items.
//!
//! Files are written to `<upload_dir>/inventory/` under a generated name
//! (`<unix millis>-<random 9 digits><ext>`) and served back from
//! `/uploads/inventory/<name>`.

use std::path::{Path, PathBuf};

use axum::http::{HeaderMap, header};
use chrono::Utc;
use rand::Rng;

use crate::error::AppError;

/// Largest accepted image, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Sub-directory (and URL segment) for inventory images.
pub const INVENTORY_SUBDIR: &str = "inventory";

/// Only `image/*` content types are accepted.
pub fn is_image(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false)
}

/// Extension of the client's file name, including the dot (`.png`).
///
/// Anything that is not a short alphanumeric extension is dropped so the
/// generated name never carries path separators or odd characters.
fn extension(original_name: Option<&str>) -> String {
    original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 10)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Build a fresh stored file name.
pub fn stored_file_name(original_name: Option<&str>) -> String {
    let millis = Utc::now().timestamp_millis();
    let unique: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("{millis}-{unique}{}", extension(original_name))
}

/// Write an inventory image to disk and return its stored file name.
///
/// # Errors
///
/// - `InvalidRequest`: not an image, or empty
/// - `PayloadTooLarge`: larger than [`MAX_UPLOAD_BYTES`]
/// - `Io`: directory creation or write failed
pub async fn save_inventory_image(
    upload_root: &Path,
    original_name: Option<&str>,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<String, AppError> {
    if !is_image(content_type) {
        return Err(AppError::invalid("Only image uploads are allowed"));
    }
    if bytes.is_empty() {
        return Err(AppError::invalid("No file uploaded"));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::PayloadTooLarge);
    }

    let dir = inventory_dir(upload_root);
    tokio::fs::create_dir_all(&dir).await?;

    let filename = stored_file_name(original_name);
    tokio::fs::write(dir.join(&filename), bytes).await?;

    tracing::info!("Stored inventory image {} ({} bytes)", filename, bytes.len());
    Ok(filename)
}

pub fn inventory_dir(upload_root: &Path) -> PathBuf {
    upload_root.join(INVENTORY_SUBDIR)
}

/// Absolute URL of a stored inventory image, as seen by the caller.
///
/// Scheme comes from `X-Forwarded-Proto` (default `http`), host from `Host`.
pub fn public_url(headers: &HeaderMap, filename: &str) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    format!("{scheme}://{host}/uploads/{INVENTORY_SUBDIR}/{filename}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn only_images_pass() {
        assert!(is_image(Some("image/png")));
        assert!(is_image(Some("IMAGE/JPEG")));
        assert!(!is_image(Some("application/pdf")));
        assert!(!is_image(Some("text/plain")));
        assert!(!is_image(None));
    }

    #[test]
    fn extension_is_sanitised() {
        assert_eq!(extension(Some("photo.PNG")), ".png");
        assert_eq!(extension(Some("archive.tar.gz")), ".gz");
        assert_eq!(extension(Some("noext")), "");
        assert_eq!(extension(Some("evil.p/hp")), "");
        assert_eq!(extension(Some("weird.jp g")), "");
        assert_eq!(extension(None), "");
    }

    #[test]
    fn stored_name_shape() {
        let name = stored_file_name(Some("truck.jpg"));
        let (stem, ext) = name.split_once('.').unwrap();
        assert_eq!(ext, "jpg");

        let (millis, unique) = stem.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert!(unique.parse::<u32>().unwrap() < 1_000_000_000);
    }

    #[test]
    fn url_uses_forwarded_proto_and_host() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("api.example.com"));
        assert_eq!(
            public_url(&headers, "1-2.png"),
            "http://api.example.com/uploads/inventory/1-2.png"
        );

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));
        assert_eq!(
            public_url(&headers, "1-2.png"),
            "https://api.example.com/uploads/inventory/1-2.png"
        );
    }

    #[tokio::test]
    async fn writes_file_under_inventory_dir() {
        let dir_name = format!("truck-stop-upload-{}", stored_file_name(None));
        let root = std::env::temp_dir().join(dir_name);

        let filename = save_inventory_image(&root, Some("a.png"), Some("image/png"), b"\x89PNG")
            .await
            .unwrap();

        let written = tokio::fs::read(inventory_dir(&root).join(&filename)).await.unwrap();
        assert_eq!(written, b"\x89PNG");

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_non_images_and_empty_files() {
        let root = std::env::temp_dir().join("truck-stop-upload-rejected");

        let err = save_inventory_image(&root, Some("a.pdf"), Some("application/pdf"), b"%PDF")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let err = save_inventory_image(&root, Some("a.png"), Some("image/png"), b"")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn rejects_files_over_the_limit() {
        let root = std::env::temp_dir().join("truck-stop-upload-too-large");
        let bytes = vec![0u8; MAX_UPLOAD_BYTES + 1];

        let err = save_inventory_image(&root, Some("big.png"), Some("image/png"), &bytes)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge));
        assert!(!inventory_dir(&root).exists());
    }
}
