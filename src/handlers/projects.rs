use axum::{
    Json,
    extract::{Path, State},
};

use super::invalid;
use crate::{
    AppState,
    auth::AdminSession,
    error::{ApiError, AppJson},
    models::{CreateProjectRequest, Project, SuccessResponse, UpdateProjectRequest},
};

/// list_projects
///
/// [Public Route] Visible projects in display order.
#[utoipa::path(
    get,
    path = "/projects",
    responses((status = 200, description = "Visible projects", body = [Project]))
)]
pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.repo.list_projects(true).await?))
}

/// get_project
///
/// [Public Route] A single project. Hidden projects are reported as missing.
#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Found", body = Project),
        (status = 404, description = "Not found or hidden")
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    match state.repo.get_project(&id).await? {
        Some(project) if project.is_visible => Ok(Json(project)),
        _ => Err(ApiError::not_found("Project")),
    }
}

/// admin_list_projects
///
/// [Admin Route] Every project, hidden ones included.
#[utoipa::path(
    get,
    path = "/admin/projects",
    responses(
        (status = 200, description = "All projects", body = [Project]),
        (status = 401, description = "No admin session")
    )
)]
pub async fn admin_list_projects(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.repo.list_projects(false).await?))
}

#[utoipa::path(
    get,
    path = "/admin/projects/{id}",
    params(("id" = String, Path, description = "Project ID")),
    responses((status = 200, description = "Found", body = Project))
)]
pub async fn admin_get_project(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    state
        .repo
        .get_project(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Project"))
}

/// create_project
///
/// [Admin Route] Appends a project; `order` becomes max+1.
#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Created", body = Project),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "No admin session")
    )
)]
pub async fn create_project(
    _admin: AdminSession,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    let payload = payload.validate().map_err(invalid)?;
    let project = state.repo.create_project(payload).await?;
    tracing::info!(id = %project.id, order = project.order, "project created");
    Ok(Json(project))
}

/// update_project
///
/// [Admin Route] Sparse update: only supplied fields change.
#[utoipa::path(
    put,
    path = "/projects/{id}",
    request_body = UpdateProjectRequest,
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Updated", body = Project),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_project(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    let payload = payload.validate().map_err(invalid)?;
    state
        .repo
        .update_project(&id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Project"))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_project(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    if state.repo.delete_project(&id).await? {
        tracing::info!(%id, "project deleted");
        Ok(Json(SuccessResponse::ok()))
    } else {
        Err(ApiError::not_found("Project"))
    }
}
