use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Dashboard reads, nested under `/admin`. Unlike the public reads these
/// include hidden records, so the whole router sits behind the admin session layer.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/stats
        // Quick counts for the dashboard header.
        .route("/stats", get(handlers::portfolio::get_admin_stats))
        .route("/projects", get(handlers::projects::admin_list_projects))
        .route("/projects/{id}", get(handlers::projects::admin_get_project))
        .route("/skills", get(handlers::skills::admin_list_skills))
        .route("/skills/{id}", get(handlers::skills::admin_get_skill))
        .route("/experience", get(handlers::experience::admin_list_experiences))
        .route("/experience/{id}", get(handlers::experience::admin_get_experience))
}
