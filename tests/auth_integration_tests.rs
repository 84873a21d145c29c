use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, Method, Request, Uri, header, request::Parts},
};
use axum_extra::extract::cookie::SameSite;
use jsonwebtoken::{EncodingKey, Header, encode};
use portfolio_cms::{
    ApiError, AppState, InMemoryRepository, MockStorageService,
    auth::{
        AdminSession, Claims, SESSION_COOKIE, SESSION_TTL_SECS, Session, SessionError,
        clear_session_cookie, create_token, decode_session, get_session, is_authenticated,
        session_cookie, token_from_headers, verify_password, verify_token,
    },
    config::{AppConfig, Env},
};
use std::{sync::Arc, time::SystemTime};

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

fn now() -> usize {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

/// Signs arbitrary claims, so tests can build expired or non-admin tokens.
fn sign(claims: &Claims, secret: &str) -> String {
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &key).unwrap()
}

fn create_app_state(env: Env) -> AppState {
    let mut config = AppConfig::default();
    config.env = env;
    config.jwt_secret = TEST_JWT_SECRET.to_string();

    AppState {
        repo: Arc::new(InMemoryRepository::new()),
        storage: Arc::new(MockStorageService::new()),
        config,
    }
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn cookie_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={token}")).unwrap(),
    );
    headers
}

// --- Credential Gate ---

#[test]
fn test_verify_password_exact_match_only() {
    assert!(verify_password("correct horse", "correct horse"));
    assert!(!verify_password("correct horse", "correct hors"));
    assert!(!verify_password("correct horse", "correct horse "));
    assert!(!verify_password("correct horse", ""));
    assert!(!verify_password("correct horse", "CORRECT HORSE"));
}

// --- Session Verifier ---

#[test]
fn test_issued_token_verifies() {
    let token = create_token(TEST_JWT_SECRET).unwrap();

    assert_eq!(
        verify_token(TEST_JWT_SECRET, &token),
        Some(Session { is_admin: true })
    );
}

#[test]
fn test_issued_token_expires_after_a_day() {
    let token = create_token(TEST_JWT_SECRET).unwrap();
    let data = jsonwebtoken::decode::<Claims>(
        &token,
        &jsonwebtoken::DecodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        &jsonwebtoken::Validation::default(),
    )
    .unwrap();

    assert!(data.claims.is_admin);
    assert_eq!(data.claims.exp - data.claims.iat, SESSION_TTL_SECS as usize);
}

#[test]
fn test_expired_token_is_rejected() {
    let issued = now() - 2 * SESSION_TTL_SECS as usize;
    let token = sign(
        &Claims {
            is_admin: true,
            iat: issued,
            exp: issued + SESSION_TTL_SECS as usize,
        },
        TEST_JWT_SECRET,
    );

    assert_eq!(
        decode_session(TEST_JWT_SECRET, &token),
        Err(SessionError::Expired)
    );
    assert_eq!(verify_token(TEST_JWT_SECRET, &token), None);
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let token = create_token("some-other-secret").unwrap();

    assert_eq!(
        decode_session(TEST_JWT_SECRET, &token),
        Err(SessionError::BadSignature)
    );
}

#[test]
fn test_garbage_token_is_malformed() {
    assert_eq!(
        decode_session(TEST_JWT_SECRET, "not-a-jwt"),
        Err(SessionError::Malformed)
    );
    assert_eq!(verify_token(TEST_JWT_SECRET, ""), None);
}

#[test]
fn test_token_without_admin_claim_is_rejected() {
    let token = sign(
        &Claims {
            is_admin: false,
            iat: now(),
            exp: now() + 60,
        },
        TEST_JWT_SECRET,
    );

    assert_eq!(
        decode_session(TEST_JWT_SECRET, &token),
        Err(SessionError::NotAdmin)
    );
}

// --- Token transport ---

#[test]
fn test_token_read_from_cookie_among_others() {
    let headers = cookie_headers("abc.def.ghi");
    assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
}

#[test]
fn test_token_falls_back_to_bearer_header() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_static("Bearer abc.def.ghi"),
    );
    assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
    assert_eq!(token_from_headers(&headers), None);
}

#[test]
fn test_get_session_and_is_authenticated() {
    let config = create_app_state(Env::Local).config;
    let token = create_token(TEST_JWT_SECRET).unwrap();

    assert!(get_session(&config, &cookie_headers(&token)).is_some());
    assert!(is_authenticated(&config, &cookie_headers(&token)));
    assert!(!is_authenticated(&config, &HeaderMap::new()));
    assert!(!is_authenticated(&config, &cookie_headers("tampered")));
}

#[test]
fn test_session_cookie_attributes() {
    let local = session_cookie("tok", false);
    assert_eq!(local.name(), SESSION_COOKIE);
    assert_eq!(local.value(), "tok");
    assert_eq!(local.http_only(), Some(true));
    assert_eq!(local.same_site(), Some(SameSite::Lax));
    assert_eq!(local.path(), Some("/"));
    assert_eq!(local.max_age(), Some(time::Duration::seconds(SESSION_TTL_SECS)));
    assert!(!local.to_string().contains("Secure"));

    let rendered = local.to_string();
    assert!(rendered.starts_with("admin-token=tok;"));
    assert!(rendered.contains("Max-Age=86400"));

    assert_eq!(session_cookie("tok", true).secure(), Some(true));
    assert!(session_cookie("tok", true).to_string().contains("; Secure"));
}

#[test]
fn test_clear_cookie_expires_immediately() {
    let cleared = clear_session_cookie(false);
    assert_eq!(cleared.name(), SESSION_COOKIE);
    assert_eq!(cleared.value(), "");
    assert_eq!(cleared.path(), Some("/"));
    assert_eq!(cleared.max_age(), Some(time::Duration::ZERO));
    assert!(cleared.to_string().contains("Max-Age=0"));
}

// --- AdminSession extractor ---

#[tokio::test]
async fn test_extractor_accepts_cookie_session() {
    let app_state = create_app_state(Env::Production);
    let token = create_token(TEST_JWT_SECRET).unwrap();

    let mut parts = get_request_parts(Method::POST, "/projects".parse().unwrap());
    parts.headers = cookie_headers(&token);

    let session = AdminSession::from_request_parts(&mut parts, &app_state).await;
    assert!(session.is_ok());
}

#[tokio::test]
async fn test_extractor_accepts_bearer_session() {
    let app_state = create_app_state(Env::Local);
    let token = create_token(TEST_JWT_SECRET).unwrap();

    let mut parts = get_request_parts(Method::GET, "/admin/stats".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );

    let session = AdminSession::from_request_parts(&mut parts, &app_state).await;
    assert!(session.is_ok());
}

#[tokio::test]
async fn test_extractor_rejects_missing_token() {
    let app_state = create_app_state(Env::Production);
    let mut parts = get_request_parts(Method::DELETE, "/projects/x".parse().unwrap());

    let session = AdminSession::from_request_parts(&mut parts, &app_state).await;
    assert!(matches!(session, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn test_extractor_rejects_forged_token() {
    let app_state = create_app_state(Env::Production);
    let token = create_token("attacker-chosen-secret").unwrap();

    let mut parts = get_request_parts(Method::PUT, "/settings".parse().unwrap());
    parts.headers = cookie_headers(&token);

    let session = AdminSession::from_request_parts(&mut parts, &app_state).await;
    assert!(matches!(session, Err(ApiError::Unauthorized)));
}
