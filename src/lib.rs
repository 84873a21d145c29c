use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod codec;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod storage;
pub mod upload;

// Routers split by access level (public, authenticated, admin).
pub mod routes;
use auth::AdminSession;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::ApiError;
pub use repository::{InMemoryRepository, PostgresRepository, RepositoryState};
pub use storage::{LocalDiskStorage, MockStorageService, StorageState};

/// ApiDoc
///
/// OpenAPI document for every route, served at `/api-docs/openapi.json` with
/// a Swagger UI at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login, handlers::auth::logout, handlers::auth::session_status,
        handlers::portfolio::get_portfolio, handlers::portfolio::get_admin_stats,
        handlers::projects::list_projects, handlers::projects::get_project,
        handlers::projects::admin_list_projects, handlers::projects::admin_get_project,
        handlers::projects::create_project, handlers::projects::update_project,
        handlers::projects::delete_project,
        handlers::skills::list_skills, handlers::skills::get_skill,
        handlers::skills::admin_list_skills, handlers::skills::admin_get_skill,
        handlers::skills::create_skill, handlers::skills::update_skill,
        handlers::skills::delete_skill,
        handlers::experience::list_experiences, handlers::experience::get_experience,
        handlers::experience::admin_list_experiences, handlers::experience::admin_get_experience,
        handlers::experience::create_experience, handlers::experience::update_experience,
        handlers::experience::delete_experience,
        handlers::singletons::get_about, handlers::singletons::upsert_about,
        handlers::singletons::get_settings, handlers::singletons::upsert_settings,
        handlers::upload::upload_image,
    ),
    components(
        schemas(
            models::Project, models::CreateProjectRequest, models::UpdateProjectRequest,
            models::Skill, models::SkillCategory, models::CreateSkillRequest, models::UpdateSkillRequest,
            models::Experience, models::CreateExperienceRequest, models::UpdateExperienceRequest,
            models::About, models::UpsertAboutRequest, models::SiteSettings, models::UpsertSettingsRequest,
            models::LoginRequest, models::SessionStatus, models::SuccessResponse,
            models::UploadResponse, models::AdminDashboardStats, models::Portfolio,
            handlers::upload::UploadForm,
        )
    ),
    tags(
        (name = "portfolio-cms", description = "Portfolio content management API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The shared, cheaply cloneable container for every service a handler needs.
#[derive(Clone)]
pub struct AppState {
    /// Content store (Postgres in production, in-memory in tests).
    pub repo: RepositoryState,
    /// Destination for uploaded images.
    pub storage: StorageState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Session gate for whole routers. Extracting `AdminSession` rejects the
/// request with 401 before the handler runs when no valid admin token is
/// presented.
async fn auth_middleware(_admin: AdminSession, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing tree, scoped auth layers, static upload serving and
/// the observability stack.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // Uploaded images are served straight from the upload directory.
    let uploads = ServeDir::new(&state.config.upload_dir);
    let upload_prefix = state.config.upload_url_prefix.clone();

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .nest(
            "/admin",
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .nest_service(&upload_prefix, uploads)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: method, URI and the request id, so every log
/// line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
