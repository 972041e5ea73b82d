//! Object storage for uploaded photos and avatars.
//!
//! Objects are addressed by `(bucket, key)` and exposed to clients as `/{bucket}/{key}`.
//! Handlers prefix every key with the tenant database name so one tenant can never read
//! another tenant's files through `/api/images`.

pub mod local;

use async_trait::async_trait;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

pub use local::LocalObjectStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Storage backend seam. The server ships with the local filesystem implementation.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject, StorageError>;

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError>;

    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, StorageError> {
        match self.get(bucket, key).await {
            Ok(_) => Ok(true),
            Err(StorageError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Process-wide store built from `config().storage`
pub fn store() -> Arc<dyn ObjectStore> {
    static STORE: OnceLock<Arc<dyn ObjectStore>> = OnceLock::new();
    STORE
        .get_or_init(|| {
            let settings = &config::config().storage;
            tracing::info!("Using local object storage at {}", settings.root);
            Arc::new(LocalObjectStore::new(&settings.root))
        })
        .clone()
}

/// Spaces and slashes would break the key layout, everything else is kept.
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .trim()
        .chars()
        .map(|c| if c == ' ' || c == '/' || c == '\\' { '_' } else { c })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// `{prefix}/{owner}/{unix_ts}-{object_id}-{sanitized filename}`
///
/// `object_id` keeps same-named uploads in the same second from overwriting each other.
pub fn object_key(prefix: &str, owner: &str, unix_ts: i64, object_id: Uuid, filename: &str) -> String {
    format!("{}/{}/{}-{}-{}", prefix, owner, unix_ts, object_id.simple(), sanitize_filename(filename))
}

pub fn object_url(bucket: &str, key: &str) -> String {
    format!("/{}/{}", bucket, key)
}

/// Split `bucket/key/with/segments` as received on `/api/images/*path`.
pub fn split_object_path(path: &str) -> Option<(&str, &str)> {
    let path = path.trim_start_matches('/');
    let (bucket, key) = path.split_once('/')?;
    if bucket.is_empty() || key.is_empty() {
        return None;
    }
    Some((bucket, key))
}

pub fn is_image(content_type: Option<&str>) -> bool {
    content_type.map(|ct| ct.starts_with("image/")).unwrap_or(false)
}

pub fn content_type_for(key: &str) -> &'static str {
    let ext = key.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Keys are relative, non-empty and free of `.`/`..` segments.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_keys_and_urls() {
        let id = Uuid::nil();
        let key = object_key("tenant_abc/work-confirmations", "u1", 1700000000, id, "my photo.png");
        assert_eq!(
            key,
            "tenant_abc/work-confirmations/u1/1700000000-00000000000000000000000000000000-my_photo.png"
        );
        assert_eq!(object_url("images", &key), format!("/images/{}", key));
    }

    #[test]
    fn same_name_same_second_gets_distinct_keys() {
        let a = object_key("tenant_abc/work-confirmations", "u1", 1700000000, Uuid::new_v4(), "image.png");
        let b = object_key("tenant_abc/work-confirmations", "u1", 1700000000, Uuid::new_v4(), "image.png");
        assert_ne!(a, b);
        assert!(a.ends_with("-image.png") && b.ends_with("-image.png"));
    }

    #[test]
    fn sanitizes_separators() {
        assert_eq!(sanitize_filename("a/b c.jpg"), "a_b_c.jpg");
        assert_eq!(sanitize_filename("   "), "upload");
    }

    #[test]
    fn splits_image_paths() {
        assert_eq!(split_object_path("images/avatars/u/1-a.png"), Some(("images", "avatars/u/1-a.png")));
        assert_eq!(split_object_path("/images/a.png"), Some(("images", "a.png")));
        assert_eq!(split_object_path("images"), None);
        assert_eq!(split_object_path("images/"), None);
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for("a/b.PNG"), "image/png");
        assert_eq!(content_type_for("a/b.gif"), "image/gif");
        assert_eq!(content_type_for("a/b.webp"), "image/webp");
        assert_eq!(content_type_for("a/b.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a/noext"), "image/jpeg");
    }

    #[test]
    fn image_detection() {
        assert!(is_image(Some("image/png")));
        assert!(!is_image(Some("application/pdf")));
        assert!(!is_image(None));
    }

    #[test]
    fn rejects_traversal_keys() {
        assert!(validate_key("tenant_a/avatars/u/1-a.png").is_ok());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("/abs").is_err());
        assert!(validate_key("a//b").is_err());
        assert!(validate_key("a/./b").is_err());
        assert!(validate_key("").is_err());
    }
}
