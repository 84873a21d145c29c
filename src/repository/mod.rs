use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    About, AdminDashboardStats, CreateExperienceRequest, CreateProjectRequest,
    CreateSkillRequest, Experience, Project, SiteSettings, Skill, UpdateExperienceRequest,
    UpdateProjectRequest, UpdateSkillRequest, UpsertAboutRequest, UpsertSettingsRequest,
};

mod memory;
mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;

/// RepoError
///
/// Failure of the persistence layer. `Invalid` surfaces as a 400; everything
/// else as a generic 500.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A stored value no longer maps onto the domain type (e.g. unknown skill category).
    #[error("corrupt row: {0}")]
    Corrupt(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The change would leave the stored record breaking a domain rule.
    #[error("{0}")]
    Invalid(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository Trait
///
/// The Resource Store contract. Every content entity exposes the same shape:
/// ordered list, get-by-id, create (order assigned as max+1 within the entity's
/// ordering scope), sparse update and delete. The singletons (`About`,
/// `SiteSettings`) replace create/update/delete with a find-first-or-create upsert.
///
/// Lookups return `Ok(None)` and deletes `Ok(false)` for unknown ids; the
/// handlers translate those into 404s.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Projects ---
    // Ordered by `order`. `visible_only` is set on the public read path.
    async fn list_projects(&self, visible_only: bool) -> RepoResult<Vec<Project>>;
    async fn get_project(&self, id: &str) -> RepoResult<Option<Project>>;
    async fn create_project(&self, req: CreateProjectRequest) -> RepoResult<Project>;
    async fn update_project(
        &self,
        id: &str,
        req: UpdateProjectRequest,
    ) -> RepoResult<Option<Project>>;
    async fn delete_project(&self, id: &str) -> RepoResult<bool>;

    // --- Skills ---
    // Ordered by category, then by the per-category `order`.
    async fn list_skills(&self, visible_only: bool) -> RepoResult<Vec<Skill>>;
    async fn get_skill(&self, id: &str) -> RepoResult<Option<Skill>>;
    async fn create_skill(&self, req: CreateSkillRequest) -> RepoResult<Skill>;
    async fn update_skill(&self, id: &str, req: UpdateSkillRequest) -> RepoResult<Option<Skill>>;
    async fn delete_skill(&self, id: &str) -> RepoResult<bool>;

    // --- Experience ---
    async fn list_experiences(&self, visible_only: bool) -> RepoResult<Vec<Experience>>;
    async fn get_experience(&self, id: &str) -> RepoResult<Option<Experience>>;
    async fn create_experience(&self, req: CreateExperienceRequest) -> RepoResult<Experience>;
    async fn update_experience(
        &self,
        id: &str,
        req: UpdateExperienceRequest,
    ) -> RepoResult<Option<Experience>>;
    async fn delete_experience(&self, id: &str) -> RepoResult<bool>;

    // --- Singletons ---
    async fn get_about(&self) -> RepoResult<Option<About>>;
    async fn upsert_about(&self, req: UpsertAboutRequest) -> RepoResult<About>;
    async fn get_settings(&self) -> RepoResult<Option<SiteSettings>>;
    async fn upsert_settings(&self, req: UpsertSettingsRequest) -> RepoResult<SiteSettings>;

    // --- Dashboard ---
    async fn get_stats(&self) -> RepoResult<AdminDashboardStats>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// Generates the primary key for a new collection record.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
