use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints open to anonymous visitors. Collection and detail reads go through
/// the visible-only repository path; hidden records answer 404 here.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // --- Session ---
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        // Never fails: an absent or bad token simply reports `isAdmin: false`.
        .route("/auth/session", get(handlers::auth::session_status))
        // GET /portfolio
        // The whole public page (settings, about, skills, projects, experience) in one call.
        .route("/portfolio", get(handlers::portfolio::get_portfolio))
        // --- Content reads ---
        .route("/projects", get(handlers::projects::list_projects))
        .route("/projects/{id}", get(handlers::projects::get_project))
        .route("/skills", get(handlers::skills::list_skills))
        .route("/skills/{id}", get(handlers::skills::get_skill))
        .route("/experience", get(handlers::experience::list_experiences))
        .route("/experience/{id}", get(handlers::experience::get_experience))
        .route("/about", get(handlers::singletons::get_about))
        .route("/settings", get(handlers::singletons::get_settings))
}
