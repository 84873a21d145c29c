use axum::{Json, extract::State};

use crate::{
    AppState,
    auth::AdminSession,
    error::ApiError,
    models::{AdminDashboardStats, Portfolio},
};

/// get_portfolio
///
/// [Public Route] Everything the public page renders in one response. The five
/// reads run concurrently; any failure fails the whole call.
#[utoipa::path(
    get,
    path = "/portfolio",
    responses((status = 200, description = "Public portfolio", body = Portfolio))
)]
pub async fn get_portfolio(State(state): State<AppState>) -> Result<Json<Portfolio>, ApiError> {
    let repo = &state.repo;
    let (settings, about, skills, projects, experiences) = tokio::try_join!(
        repo.get_settings(),
        repo.get_about(),
        repo.list_skills(true),
        repo.list_projects(true),
        repo.list_experiences(true),
    )?;

    Ok(Json(Portfolio {
        settings,
        about,
        skills,
        projects,
        experiences,
    }))
}

/// get_admin_stats
///
/// [Admin Route] Dashboard quick stats, hidden records included.
#[utoipa::path(
    get,
    path = "/admin/stats",
    responses(
        (status = 200, description = "Dashboard counts", body = AdminDashboardStats),
        (status = 401, description = "No admin session")
    )
)]
pub async fn get_admin_stats(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<AdminDashboardStats>, ApiError> {
    Ok(Json(state.repo.get_stats().await?))
}
