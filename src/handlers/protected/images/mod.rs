// handlers/protected/images/mod.rs - GET /api/images/*path

use axum::extract::{Extension, Path};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::middleware::ValidatedTenant;
use crate::storage::{self, StorageError};

const CACHE_CONTROL: &str = "public, max-age=31536000";

/**
 * GET /api/images/{bucket}/{key...} - Stream a stored image
 *
 * The path is the `url` recorded on photos and avatars without its leading slash. Keys are
 * written under the tenant database name, so a key outside the caller's tenant is reported as
 * missing rather than forbidden.
 */
pub async fn image_get(
    Extension(tenant): Extension<ValidatedTenant>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let (bucket, key) = storage::split_object_path(&path).ok_or_else(|| ApiError::bad_request("Invalid image path"))?;

    let tenant_prefix = format!("{}/", tenant.database);
    if !key.starts_with(&tenant_prefix) {
        tracing::warn!("Tenant '{}' requested foreign image {}", tenant.name, path);
        return Err(StorageError::NotFound(key.to_string()).into());
    }

    let object = storage::store().get(bucket, key).await?;

    Ok((
        [
            (header::CONTENT_TYPE, object.content_type),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        object.bytes,
    )
        .into_response())
}
