// handlers/protected/work_confirmations/create.rs - POST /api/work-confirmations

use axum::extract::{Extension, Multipart};

use super::PHOTO_FOLDER;
use crate::database::models::WorkConfirmation;
use crate::error::ApiError;
use crate::handlers::utils::{discard_images, ensure_time_order, parse_date, parse_time, upload_images, MultipartForm};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, TenantPool, ValidatedTenant};
use crate::services::{NewWorkConfirmation, WorkConfirmationService};
use crate::workflow;

/**
 * POST /api/work-confirmations - Submit a work confirmation
 *
 * Multipart fields:
 * - `date`        YYYY-MM-DD
 * - `start_time`  HH:MM
 * - `end_time`    HH:MM, after `start_time`
 * - `content`     free text
 * - `photos`      one or more image files
 *
 * Non-image parts are dropped. The creator's role decides the starting status: managers go
 * straight to `pending_leader`, everybody else starts at `pending_manager`.
 */
pub async fn create_post(
    Extension(TenantPool(pool)): Extension<TenantPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Extension(tenant): Extension<ValidatedTenant>,
    multipart: Multipart,
) -> ApiResult<WorkConfirmation> {
    let form = MultipartForm::read(multipart).await?;

    let date = form
        .text("date")
        .ok_or_else(|| ApiError::invalid_field("date", "date is required"))
        .and_then(parse_date)?;
    let start_time = form
        .text("start_time")
        .ok_or_else(|| ApiError::invalid_field("start_time", "start_time is required"))
        .and_then(|raw| parse_time("start_time", raw))?;
    let end_time = form
        .text("end_time")
        .ok_or_else(|| ApiError::invalid_field("end_time", "end_time is required"))
        .and_then(|raw| parse_time("end_time", raw))?;
    ensure_time_order(&start_time, &end_time)?;

    let content = form
        .text("content")
        .ok_or_else(|| ApiError::invalid_field("content", "Content is required"))?
        .to_string();

    if !form.has_files("photos") {
        return Err(ApiError::invalid_field("photos", "At least one photo is required"));
    }

    let photos = upload_images(&tenant, PHOTO_FOLDER, user.id, form.files("photos")).await;
    if photos.is_empty() {
        return Err(ApiError::internal_server_error("Failed to upload photos"));
    }

    let status = workflow::initial_status(user.role);
    let created = WorkConfirmationService::new(pool)
        .create(NewWorkConfirmation {
            created_by: user.id,
            creator_role: user.role,
            date,
            start_time,
            end_time,
            content,
            photos: photos.clone(),
            status,
        })
        .await;

    let record = match created {
        Ok(record) => record,
        Err(e) => {
            discard_images(&photos).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        "Work confirmation {} created by {} ({}) in tenant '{}' as {}",
        record.id,
        user.id,
        user.role,
        tenant.name,
        record.status
    );

    Ok(ApiResponse::created(record))
}
