// handlers/utils.rs - Request parsing shared by the protected handlers

use axum::body::Bytes;
use axum::extract::Multipart;
use chrono::{NaiveDate, NaiveTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::config;
use crate::database::models::Photo;
use crate::error::ApiError;
use crate::middleware::ValidatedTenant;
use crate::storage::{self, ObjectStore};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Path ids are UUIDs; anything else is a client error, not a missing row
pub fn parse_uuid(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request("Invalid ID"))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ApiError::invalid_field("date", "Invalid date format, expected YYYY-MM-DD"))
}

/// Parse `HH:MM` and return it in canonical form
pub fn parse_time(field: &str, raw: &str) -> Result<String, ApiError> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT)
        .map(|t| t.format(TIME_FORMAT).to_string())
        .map_err(|_| ApiError::invalid_field(field, "Invalid time format, expected HH:MM"))
}

/// Both values must already be in `HH:MM` form
pub fn ensure_time_order(start: &str, end: &str) -> Result<(), ApiError> {
    let start = NaiveTime::parse_from_str(start, TIME_FORMAT);
    let end = NaiveTime::parse_from_str(end, TIME_FORMAT);
    match (start, end) {
        (Ok(start), Ok(end)) if end > start => Ok(()),
        (Ok(_), Ok(_)) => Err(ApiError::invalid_field("end_time", "End time must be after start time")),
        _ => Err(ApiError::bad_request("Invalid time format, expected HH:MM")),
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn is_image(&self) -> bool {
        storage::is_image(self.content_type.as_deref())
    }
}

/// A fully buffered multipart body: text parts by name plus every file part.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    form.files.push(UploadedFile {
                        field: name,
                        filename,
                        content_type,
                        bytes,
                    });
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed text value, `None` when missing or blank
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    pub fn files<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a UploadedFile> + 'a {
        self.files.iter().filter(move |f| f.field == name)
    }

    pub fn has_files(&self, name: &str) -> bool {
        self.files(name).next().is_some()
    }
}

/// Upload image parts under `{tenant_db}/{folder}/{owner}/`.
///
/// Non-image parts and failed writes are logged and skipped, so the result may be shorter than
/// the input or empty.
pub async fn upload_images<'a>(
    tenant: &ValidatedTenant,
    folder: &str,
    owner: Uuid,
    files: impl IntoIterator<Item = &'a UploadedFile>,
) -> Vec<Photo> {
    let store = storage::store();
    let bucket = &config::config().storage.bucket;
    let prefix = format!("{}/{}", tenant.database, folder);
    store_images(store.as_ref(), bucket, &prefix, owner, files).await
}

pub(crate) async fn store_images<'a>(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
    owner: Uuid,
    files: impl IntoIterator<Item = &'a UploadedFile>,
) -> Vec<Photo> {
    let mut photos = Vec::new();

    for file in files {
        if !file.is_image() {
            tracing::warn!("Skipping non-image upload {} ({:?})", file.filename, file.content_type);
            continue;
        }

        let now = Utc::now();
        let key = storage::object_key(prefix, &owner.to_string(), now.timestamp(), Uuid::new_v4(), &file.filename);
        if let Err(e) = store.put(bucket, &key, &file.bytes).await {
            tracing::error!("Failed to store {} in {}: {}", key, store.name(), e);
            continue;
        }

        photos.push(Photo {
            url: storage::object_url(bucket, &key),
            filename: storage::sanitize_filename(&file.filename),
            uploaded_at: now,
        });
    }

    photos
}

/// Best-effort removal of objects written by [`upload_images`] that ended up unreferenced
pub async fn discard_images(photos: &[Photo]) {
    remove_images(storage::store().as_ref(), photos).await
}

pub(crate) async fn remove_images(store: &dyn ObjectStore, photos: &[Photo]) {
    for photo in photos {
        let Some((bucket, key)) = storage::split_object_path(&photo.url) else {
            continue;
        };
        if let Err(e) = store.delete(bucket, key).await {
            tracing::warn!("Could not remove orphaned upload {}: {}", photo.url, e);
        }
    }
}
