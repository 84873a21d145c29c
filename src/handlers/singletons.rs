//! The About and SiteSettings singletons: one record each, read publicly,
//! written by upsert.

use axum::{Json, extract::State};

use crate::{
    AppState,
    auth::AdminSession,
    error::{ApiError, AppJson},
    models::{About, SiteSettings, UpsertAboutRequest, UpsertSettingsRequest},
};

/// get_about
///
/// [Public Route] `null` until the first upsert.
#[utoipa::path(
    get,
    path = "/about",
    responses((status = 200, description = "About record or null", body = Option<About>))
)]
pub async fn get_about(State(state): State<AppState>) -> Result<Json<Option<About>>, ApiError> {
    Ok(Json(state.repo.get_about().await?))
}

/// upsert_about
///
/// [Admin Route] Creates the record on first call, then updates it in place.
#[utoipa::path(
    put,
    path = "/about",
    request_body = UpsertAboutRequest,
    responses((status = 200, description = "Stored record", body = About))
)]
pub async fn upsert_about(
    _admin: AdminSession,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpsertAboutRequest>,
) -> Result<Json<About>, ApiError> {
    let about = state.repo.upsert_about(payload).await?;
    tracing::info!(id = %about.id, "about upserted");
    Ok(Json(about))
}

#[utoipa::path(
    get,
    path = "/settings",
    responses((status = 200, description = "Settings record or null", body = Option<SiteSettings>))
)]
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<Option<SiteSettings>>, ApiError> {
    Ok(Json(state.repo.get_settings().await?))
}

#[utoipa::path(
    put,
    path = "/settings",
    request_body = UpsertSettingsRequest,
    responses((status = 200, description = "Stored record", body = SiteSettings))
)]
pub async fn upsert_settings(
    _admin: AdminSession,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpsertSettingsRequest>,
) -> Result<Json<SiteSettings>, ApiError> {
    let settings = state.repo.upsert_settings(payload).await?;
    tracing::info!(id = %settings.id, "site settings upserted");
    Ok(Json(settings))
}
