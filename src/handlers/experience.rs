use axum::{
    Json,
    extract::{Path, State},
};

use super::invalid;
use crate::{
    AppState,
    auth::AdminSession,
    error::{ApiError, AppJson},
    models::{CreateExperienceRequest, Experience, SuccessResponse, UpdateExperienceRequest},
};

/// list_experiences
///
/// [Public Route] Visible experience entries in display order.
#[utoipa::path(
    get,
    path = "/experience",
    responses((status = 200, description = "Visible experience", body = [Experience]))
)]
pub async fn list_experiences(
    State(state): State<AppState>,
) -> Result<Json<Vec<Experience>>, ApiError> {
    Ok(Json(state.repo.list_experiences(true).await?))
}

#[utoipa::path(
    get,
    path = "/experience/{id}",
    params(("id" = String, Path, description = "Experience ID")),
    responses(
        (status = 200, description = "Found", body = Experience),
        (status = 404, description = "Not found or hidden")
    )
)]
pub async fn get_experience(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Experience>, ApiError> {
    match state.repo.get_experience(&id).await? {
        Some(experience) if experience.is_visible => Ok(Json(experience)),
        _ => Err(ApiError::not_found("Experience")),
    }
}

#[utoipa::path(
    get,
    path = "/admin/experience",
    responses((status = 200, description = "All experience", body = [Experience]))
)]
pub async fn admin_list_experiences(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<Experience>>, ApiError> {
    Ok(Json(state.repo.list_experiences(false).await?))
}

#[utoipa::path(
    get,
    path = "/admin/experience/{id}",
    params(("id" = String, Path, description = "Experience ID")),
    responses((status = 200, description = "Found", body = Experience))
)]
pub async fn admin_get_experience(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Experience>, ApiError> {
    state
        .repo
        .get_experience(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Experience"))
}

/// create_experience
///
/// [Admin Route] Rejects a current entry that also carries an end date, and an
/// end date before the start date.
#[utoipa::path(
    post,
    path = "/experience",
    request_body = CreateExperienceRequest,
    responses(
        (status = 200, description = "Created", body = Experience),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn create_experience(
    _admin: AdminSession,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateExperienceRequest>,
) -> Result<Json<Experience>, ApiError> {
    let payload = payload.validate().map_err(invalid)?;
    let experience = state.repo.create_experience(payload).await?;
    tracing::info!(id = %experience.id, order = experience.order, "experience created");
    Ok(Json(experience))
}

/// update_experience
///
/// [Admin Route] Sparse update. `isCurrent: true` clears the stored end date;
/// an end date on its own clears `isCurrent`.
#[utoipa::path(
    put,
    path = "/experience/{id}",
    request_body = UpdateExperienceRequest,
    params(("id" = String, Path, description = "Experience ID")),
    responses(
        (status = 200, description = "Updated", body = Experience),
        (status = 400, description = "isCurrent with endDate, endDate before startDate, or order out of range"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_experience(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateExperienceRequest>,
) -> Result<Json<Experience>, ApiError> {
    let payload = payload.validate().map_err(invalid)?;
    state
        .repo
        .update_experience(&id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Experience"))
}

#[utoipa::path(
    delete,
    path = "/experience/{id}",
    params(("id" = String, Path, description = "Experience ID")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_experience(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if state.repo.delete_experience(&id).await? {
        tracing::info!(%id, "experience deleted");
        Ok(Json(SuccessResponse::ok()))
    } else {
        Err(ApiError::not_found("Experience"))
    }
}
