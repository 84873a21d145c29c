use axum::{Json, extract::State, http::HeaderMap};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    auth::{clear_session_cookie, create_token, is_authenticated, session_cookie, verify_password},
    config::AppConfig,
    error::{ApiError, AppJson},
    models::{LoginRequest, SessionStatus, SuccessResponse},
};

/// login
///
/// [Public Route] Exchanges the admin password for a 24h session cookie.
/// A wrong password gets a 401 and no cookie.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued; `admin-token` cookie set", body = SuccessResponse),
        (status = 401, description = "Invalid password")
    )
)]
pub async fn login(
    State(config): State<AppConfig>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    if !verify_password(&config.admin_password, &payload.password) {
        tracing::warn!("admin login rejected");
        return Err(ApiError::InvalidPassword);
    }

    let token = create_token(&config.jwt_secret)
        .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))?;
    tracing::info!("admin session issued");

    let jar = CookieJar::new().add(session_cookie(&token, config.secure_cookies()));
    Ok((jar, Json(SuccessResponse::ok())))
}

/// logout
///
/// [Public Route] Expires the session cookie. Always succeeds; the token
/// itself stays valid until `exp` since sessions are stateless.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Cookie cleared", body = SuccessResponse))
)]
pub async fn logout(State(config): State<AppConfig>) -> (CookieJar, Json<SuccessResponse>) {
    let jar = CookieJar::new().add(clear_session_cookie(config.secure_cookies()));
    (jar, Json(SuccessResponse::ok()))
}

/// session_status
///
/// [Public Route] Reports whether the caller holds a valid admin session.
#[utoipa::path(
    get,
    path = "/auth/session",
    responses((status = 200, description = "Session state", body = SessionStatus))
)]
pub async fn session_status(
    State(config): State<AppConfig>,
    headers: HeaderMap,
) -> Json<SessionStatus> {
    Json(SessionStatus {
        is_admin: is_authenticated(&config, &headers),
    })
}
