use axum::{
    Json,
    extract::{Path, State},
};

use super::invalid;
use crate::{
    AppState,
    auth::AdminSession,
    error::{ApiError, AppJson},
    models::{CreateSkillRequest, Skill, SuccessResponse, UpdateSkillRequest},
};

/// list_skills
///
/// [Public Route] Visible skills, grouped by category then ordered within it.
#[utoipa::path(
    get,
    path = "/skills",
    responses((status = 200, description = "Visible skills", body = [Skill]))
)]
pub async fn list_skills(State(state): State<AppState>) -> Result<Json<Vec<Skill>>, ApiError> {
    Ok(Json(state.repo.list_skills(true).await?))
}

#[utoipa::path(
    get,
    path = "/skills/{id}",
    params(("id" = String, Path, description = "Skill ID")),
    responses(
        (status = 200, description = "Found", body = Skill),
        (status = 404, description = "Not found or hidden")
    )
)]
pub async fn get_skill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Skill>, ApiError> {
    match state.repo.get_skill(&id).await? {
        Some(skill) if skill.is_visible => Ok(Json(skill)),
        _ => Err(ApiError::not_found("Skill")),
    }
}

#[utoipa::path(
    get,
    path = "/admin/skills",
    responses((status = 200, description = "All skills", body = [Skill]))
)]
pub async fn admin_list_skills(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<Skill>>, ApiError> {
    Ok(Json(state.repo.list_skills(false).await?))
}

#[utoipa::path(
    get,
    path = "/admin/skills/{id}",
    params(("id" = String, Path, description = "Skill ID")),
    responses((status = 200, description = "Found", body = Skill))
)]
pub async fn admin_get_skill(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Skill>, ApiError> {
    state
        .repo
        .get_skill(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Skill"))
}

/// create_skill
///
/// [Admin Route] Appends a skill to the end of its category.
#[utoipa::path(
    post,
    path = "/skills",
    request_body = CreateSkillRequest,
    responses(
        (status = 200, description = "Created", body = Skill),
        (status = 400, description = "Invalid payload or unknown category")
    )
)]
pub async fn create_skill(
    _admin: AdminSession,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSkillRequest>,
) -> Result<Json<Skill>, ApiError> {
    let payload = payload.validate().map_err(invalid)?;
    let skill = state.repo.create_skill(payload).await?;
    tracing::info!(id = %skill.id, category = %skill.category, order = skill.order, "skill created");
    Ok(Json(skill))
}

/// update_skill
///
/// [Admin Route] Sparse update. Moving a skill to another category without
/// an explicit `order` places it last in that category.
#[utoipa::path(
    put,
    path = "/skills/{id}",
    request_body = UpdateSkillRequest,
    params(("id" = String, Path, description = "Skill ID")),
    responses(
        (status = 200, description = "Updated", body = Skill),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_skill(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateSkillRequest>,
) -> Result<Json<Skill>, ApiError> {
    let payload = payload.validate().map_err(invalid)?;
    state
        .repo
        .update_skill(&id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Skill"))
}

#[utoipa::path(
    delete,
    path = "/skills/{id}",
    params(("id" = String, Path, description = "Skill ID")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_skill(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if state.repo.delete_skill(&id).await? {
        tracing::info!(%id, "skill deleted");
        Ok(Json(SuccessResponse::ok()))
    } else {
        Err(ApiError::not_found("Skill"))
    }
}
