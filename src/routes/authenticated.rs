use crate::{AppState, handlers, upload::MAX_UPLOAD_BYTES};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{post, put},
};

/// Headroom over the image limit for multipart boundaries and headers.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES * 2;

/// Authenticated Router Module
///
/// Every route that changes persisted state. The router is wrapped in the
/// admin session layer in `create_router`; the handlers also take
/// `AdminSession`, so an unauthenticated request is refused before any
/// repository or storage call.
///
/// The paths overlap with the public GET routes; axum merges the method
/// routers, so `GET /projects` stays public while `POST /projects` is gated.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/projects", post(handlers::projects::create_project))
        .route(
            "/projects/{id}",
            put(handlers::projects::update_project).delete(handlers::projects::delete_project),
        )
        .route("/skills", post(handlers::skills::create_skill))
        .route(
            "/skills/{id}",
            put(handlers::skills::update_skill).delete(handlers::skills::delete_skill),
        )
        .route("/experience", post(handlers::experience::create_experience))
        .route(
            "/experience/{id}",
            put(handlers::experience::update_experience)
                .delete(handlers::experience::delete_experience),
        )
        // Singletons are upserted, never created or deleted directly.
        .route("/about", put(handlers::singletons::upsert_about))
        .route("/settings", put(handlers::singletons::upsert_settings))
        // POST /upload
        // The default 2 MB body limit would cut off a 5 MB image before the
        // validator could name the problem.
        .route(
            "/upload",
            post(handlers::upload::upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}
