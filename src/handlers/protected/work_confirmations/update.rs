// handlers/protected/work_confirmations/update.rs - PUT /api/work-confirmations/:id

use axum::extract::{Extension, Multipart, Path};

use super::{find_or_404, PHOTO_FOLDER};
use crate::database::models::WorkConfirmation;
use crate::error::ApiError;
use crate::handlers::utils::{
    discard_images, ensure_time_order, parse_date, parse_time, parse_uuid, upload_images, MultipartForm,
};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool, ValidatedTenant};
use crate::services::{WorkConfirmationChanges, WorkConfirmationService};
use crate::workflow::{self, WorkflowError};

/**
 * PUT /api/work-confirmations/:id - Edit a pending work confirmation
 *
 * Only the creator may edit, and only while the form is pending. Every multipart field is
 * optional; blank fields keep their stored value. New photos replace the old list only when at
 * least one of them uploads.
 */
pub async fn update_put(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(tenant): Extension<ValidatedTenant>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<WorkConfirmation> {
    let id = parse_uuid(&id)?;
    let service = WorkConfirmationService::new(pool);
    let record = find_or_404(&service, id).await?;

    if record.created_by != user.id {
        return Err(ApiError::forbidden("Only creator can update"));
    }
    if !workflow::is_editable(record.status) {
        return Err(WorkflowError::NotEditable.into());
    }

    let form = MultipartForm::read(multipart).await?;
    let mut changes = WorkConfirmationChanges::default();

    if let Some(raw) = form.text("date") {
        changes.date = Some(parse_date(raw)?);
    }
    if let Some(raw) = form.text("start_time") {
        changes.start_time = Some(parse_time("start_time", raw)?);
    }
    if let Some(raw) = form.text("end_time") {
        changes.end_time = Some(parse_time("end_time", raw)?);
    }
    if changes.start_time.is_some() || changes.end_time.is_some() {
        let start = changes.start_time.as_deref().unwrap_or(record.start_time.as_str());
        let end = changes.end_time.as_deref().unwrap_or(record.end_time.as_str());
        ensure_time_order(start, end)?;
    }
    if let Some(content) = form.text("content") {
        changes.content = Some(content.to_string());
    }

    if form.has_files("photos") {
        let photos = upload_images(&tenant, PHOTO_FOLDER, user.id, form.files("photos")).await;
        if photos.is_empty() {
            tracing::warn!("No replacement photo stored for work confirmation {}, keeping the old ones", id);
        } else {
            changes.photos = Some(photos);
        }
    }

    let uploaded = changes.photos.clone().unwrap_or_default();

    // The row may have been approved or rejected since it was read
    let updated = match service.update(id, changes).await {
        Ok(Some(updated)) => updated,
        outcome => {
            discard_images(&uploaded).await;
            return Err(match outcome {
                Err(e) => e.into(),
                _ => WorkflowError::StaleStatus.into(),
            });
        }
    };

    tracing::info!("Work confirmation {} updated by {}", id, user.id);
    Ok(ApiResponse::success(updated))
}
