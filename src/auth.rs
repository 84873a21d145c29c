use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::{config::AppConfig, error::ApiError};

/// Name of the cookie carrying the admin session token.
pub const SESSION_COOKIE: &str = "admin-token";
/// Sessions are valid for 24 hours from issuance; there is no refresh.
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24;

/// Claims
///
/// Payload of the session JWT. A token carries a single privilege claim.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    /// Issued At (iat).
    pub iat: usize,
    /// Expiration Time (exp), enforced on every verification.
    pub exp: usize,
}

/// Session
///
/// The verified content of a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub is_admin: bool,
}

/// SessionError
///
/// Why a presented token was refused. Only ever logged; callers see `None`
/// or a generic 401 whatever the reason.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("no session token presented")]
    Missing,
    #[error("session token expired")]
    Expired,
    #[error("session token signature mismatch")]
    BadSignature,
    #[error("malformed session token")]
    Malformed,
    #[error("session token lacks the admin claim")]
    NotAdmin,
}

// --- Credential Gate ---

/// verify_password
///
/// Compares the submitted password with the configured secret. Both sides are
/// hashed first so the comparison always walks 32 bytes regardless of where the
/// inputs differ or how long they are.
pub fn verify_password(expected: &str, candidate: &str) -> bool {
    let expected = Sha256::digest(expected.as_bytes());
    let candidate = Sha256::digest(candidate.as_bytes());
    expected
        .iter()
        .zip(candidate.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// create_token
///
/// Issues an HS256 token carrying `isAdmin: true`, expiring [`SESSION_TTL_SECS`] from now.
pub fn create_token(secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        is_admin: true,
        iat: now as usize,
        exp: (now + SESSION_TTL_SECS) as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

// --- Session Verifier ---

/// decode_session
///
/// Verifies signature and expiry, and keeps the specific failure reason.
pub fn decode_session(secret: &str, token: &str) -> Result<Session, SessionError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Issuer and verifier share one clock.
    validation.leeway = 0;
    validation.validate_exp = true;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => SessionError::Expired,
        ErrorKind::InvalidSignature => SessionError::BadSignature,
        _ => SessionError::Malformed,
    })?;

    if !data.claims.is_admin {
        return Err(SessionError::NotAdmin);
    }
    Ok(Session { is_admin: true })
}

/// verify_token
///
/// The external contract of the verifier: a session or nothing. Every failure
/// collapses to `None`; the reason is logged at debug level only.
pub fn verify_token(secret: &str, token: &str) -> Option<Session> {
    match decode_session(secret, token) {
        Ok(session) => Some(session),
        Err(reason) => {
            tracing::debug!(%reason, "session rejected");
            None
        }
    }
}

/// token_from_headers
///
/// Extracts the session token from the `admin-token` cookie, falling back to
/// an `Authorization: Bearer` header for non-browser clients.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// get_session
///
/// Resolves the session presented with a request, if any.
pub fn get_session(config: &AppConfig, headers: &HeaderMap) -> Option<Session> {
    let token = token_from_headers(headers)?;
    verify_token(&config.jwt_secret, &token)
}

/// is_authenticated
///
/// Boolean reduction of [`get_session`] used by route guards.
pub fn is_authenticated(config: &AppConfig, headers: &HeaderMap) -> bool {
    get_session(config, headers).is_some_and(|s| s.is_admin)
}

/// session_cookie
///
/// Cookie carrying a freshly issued token.
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_owned()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(SESSION_TTL_SECS))
        .secure(secure)
        .build()
}

/// clear_session_cookie
///
/// Removal cookie that makes the browser drop the session. It keeps the
/// attributes of the issued cookie so the browser matches it.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie("", secure);
    cookie.make_removal();
    cookie
}

/// AdminSession Extractor
///
/// Taking `AdminSession` as a handler argument is the session gate: the request
/// is rejected with 401 before the handler body (and therefore any persisted
/// state) is touched unless a valid admin token is presented.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let Some(token) = token_from_headers(&parts.headers) else {
            tracing::debug!(reason = %SessionError::Missing, "session rejected");
            return Err(ApiError::Unauthorized);
        };

        match verify_token(&config.jwt_secret, &token) {
            Some(Session { is_admin: true }) => Ok(AdminSession),
            _ => Err(ApiError::Unauthorized),
        }
    }
}
