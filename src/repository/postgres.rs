use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, query_builder::QueryBuilder};

use super::{RepoError, RepoResult, Repository, new_id};
use crate::{
    codec::{decode_list, encode_list},
    models::{
        ABOUT_ID, About, AdminDashboardStats, CreateExperienceRequest, CreateProjectRequest,
        CreateSkillRequest, Experience, Project, SETTINGS_ID, SiteSettings, Skill,
        UpdateExperienceRequest, UpdateProjectRequest, UpdateSkillRequest, UpsertAboutRequest,
        UpsertSettingsRequest,
    },
};

const PROJECT_COLUMNS: &str = "id, title, short_description, overview, role, features, \
     tech_stack, screenshots, github_url, live_url, sort_order, is_visible, created_at, updated_at";
const SKILL_COLUMNS: &str =
    "id, name, category, description, icon, sort_order, is_visible, created_at, updated_at";
const EXPERIENCE_COLUMNS: &str = "id, title, company, description, start_date, end_date, \
     is_current, sort_order, is_visible, created_at, updated_at";
const ABOUT_COLUMNS: &str =
    "id, summary, education, focus_areas, internship, created_at, updated_at";
const SETTINGS_COLUMNS: &str = "id, hero_title, hero_subtitle, hero_description, email, \
     github, linkedin, whatsapp, created_at, updated_at";

// --- Row types ---
// List-valued columns come back as raw TEXT and go through the shared codec.

#[derive(FromRow)]
struct ProjectRow {
    id: String,
    title: String,
    short_description: String,
    overview: String,
    role: String,
    features: Option<String>,
    tech_stack: Option<String>,
    screenshots: Option<String>,
    github_url: Option<String>,
    live_url: Option<String>,
    sort_order: i32,
    is_visible: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            title: row.title,
            short_description: row.short_description,
            overview: row.overview,
            role: row.role,
            features: decode_list(row.features.as_deref()),
            tech_stack: decode_list(row.tech_stack.as_deref()),
            screenshots: decode_list(row.screenshots.as_deref()),
            github_url: row.github_url,
            live_url: row.live_url,
            order: row.sort_order,
            is_visible: row.is_visible,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct SkillRow {
    id: String,
    name: String,
    category: String,
    description: Option<String>,
    icon: Option<String>,
    sort_order: i32,
    is_visible: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SkillRow> for Skill {
    type Error = RepoError;

    fn try_from(row: SkillRow) -> Result<Self, Self::Error> {
        Ok(Skill {
            category: row.category.parse().map_err(RepoError::Corrupt)?,
            id: row.id,
            name: row.name,
            description: row.description,
            icon: row.icon,
            order: row.sort_order,
            is_visible: row.is_visible,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ExperienceRow {
    id: String,
    title: String,
    company: String,
    description: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    is_current: bool,
    sort_order: i32,
    is_visible: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ExperienceRow> for Experience {
    fn from(row: ExperienceRow) -> Self {
        Experience {
            id: row.id,
            title: row.title,
            company: row.company,
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
            is_current: row.is_current,
            order: row.sort_order,
            is_visible: row.is_visible,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct AboutRow {
    id: String,
    summary: String,
    education: String,
    focus_areas: Option<String>,
    internship: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AboutRow> for About {
    fn from(row: AboutRow) -> Self {
        About {
            id: row.id,
            summary: row.summary,
            education: row.education,
            focus_areas: decode_list(row.focus_areas.as_deref()),
            internship: row.internship,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct SettingsRow {
    id: String,
    hero_title: String,
    hero_subtitle: String,
    hero_description: String,
    email: String,
    github: String,
    linkedin: String,
    whatsapp: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SettingsRow> for SiteSettings {
    fn from(row: SettingsRow) -> Self {
        SiteSettings {
            id: row.id,
            hero_title: row.hero_title,
            hero_subtitle: row.hero_subtitle,
            hero_description: row.hero_description,
            email: row.email,
            github: row.github,
            linkedin: row.linkedin,
            whatsapp: row.whatsapp,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// lock_scope
///
/// Serializes writers of one ordering scope (or one singleton) for the rest of
/// the surrounding transaction. Concurrent creates therefore observe each
/// other's `MAX(sort_order)` and can never be handed the same position.
async fn lock_scope(conn: &mut PgConnection, scope: &str) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(scope)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

fn visibility_clause(visible_only: bool) -> &'static str {
    if visible_only { " WHERE is_visible = true" } else { "" }
}

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- PROJECTS ---

    async fn list_projects(&self, visible_only: bool) -> RepoResult<Vec<Project>> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects{} ORDER BY sort_order ASC, created_at ASC",
            visibility_clause(visible_only)
        );
        let rows = sqlx::query_as::<_, ProjectRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn get_project(&self, id: &str) -> RepoResult<Option<Project>> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Project::from))
    }

    /// create_project
    ///
    /// Appends the project at `MAX(sort_order) + 1` under the `projects` scope lock.
    async fn create_project(&self, req: CreateProjectRequest) -> RepoResult<Project> {
        let mut tx = self.pool.begin().await?;
        lock_scope(&mut tx, "projects").await?;

        let sql = format!(
            r#"
            INSERT INTO projects (
                id, title, short_description, overview, role,
                features, tech_stack, screenshots, github_url, live_url,
                sort_order, is_visible, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM projects),
                $11, NOW(), NOW()
            )
            RETURNING {PROJECT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(new_id())
            .bind(req.title)
            .bind(req.short_description)
            .bind(req.overview)
            .bind(req.role)
            .bind(encode_list(&req.features))
            .bind(encode_list(&req.tech_stack))
            .bind(encode_list(&req.screenshots))
            .bind(req.github_url)
            .bind(req.live_url)
            .bind(req.is_visible.unwrap_or(true))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    /// update_project
    ///
    /// Builds the SET list from the fields present in the request only, so
    /// untouched columns are never rewritten.
    async fn update_project(
        &self,
        id: &str,
        req: UpdateProjectRequest,
    ) -> RepoResult<Option<Project>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE projects SET updated_at = NOW()");

        if let Some(title) = req.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(short_description) = req.short_description {
            builder.push(", short_description = ").push_bind(short_description);
        }
        if let Some(overview) = req.overview {
            builder.push(", overview = ").push_bind(overview);
        }
        if let Some(role) = req.role {
            builder.push(", role = ").push_bind(role);
        }
        if let Some(features) = req.features {
            builder.push(", features = ").push_bind(encode_list(&features));
        }
        if let Some(tech_stack) = req.tech_stack {
            builder.push(", tech_stack = ").push_bind(encode_list(&tech_stack));
        }
        if let Some(screenshots) = req.screenshots {
            builder.push(", screenshots = ").push_bind(encode_list(&screenshots));
        }
        if let Some(github_url) = req.github_url {
            builder.push(", github_url = ").push_bind(github_url);
        }
        if let Some(live_url) = req.live_url {
            builder.push(", live_url = ").push_bind(live_url);
        }
        if let Some(order) = req.order {
            builder.push(", sort_order = ").push_bind(order);
        }
        if let Some(is_visible) = req.is_visible {
            builder.push(", is_visible = ").push_bind(is_visible);
        }

        builder.push(" WHERE id = ").push_bind(id.to_string());
        builder.push(format!(" RETURNING {PROJECT_COLUMNS}"));

        let row = builder
            .build_query_as::<ProjectRow>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Project::from))
    }

    async fn delete_project(&self, id: &str) -> RepoResult<bool> {
        let res = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- SKILLS ---

    async fn list_skills(&self, visible_only: bool) -> RepoResult<Vec<Skill>> {
        let sql = format!(
            "SELECT {SKILL_COLUMNS} FROM skills{} ORDER BY category ASC, sort_order ASC, created_at ASC",
            visibility_clause(visible_only)
        );
        sqlx::query_as::<_, SkillRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Skill::try_from)
            .collect()
    }

    async fn get_skill(&self, id: &str) -> RepoResult<Option<Skill>> {
        let sql = format!("SELECT {SKILL_COLUMNS} FROM skills WHERE id = $1");
        sqlx::query_as::<_, SkillRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Skill::try_from)
            .transpose()
    }

    /// create_skill
    ///
    /// Skill order is scoped per category, so the lock key includes the category.
    async fn create_skill(&self, req: CreateSkillRequest) -> RepoResult<Skill> {
        let category = req.category.as_str();
        let mut tx = self.pool.begin().await?;
        lock_scope(&mut tx, &format!("skills:{category}")).await?;

        let sql = format!(
            r#"
            INSERT INTO skills (
                id, name, category, description, icon,
                sort_order, is_visible, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5,
                (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM skills WHERE category = $3),
                $6, NOW(), NOW()
            )
            RETURNING {SKILL_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, SkillRow>(&sql)
            .bind(new_id())
            .bind(req.name)
            .bind(category)
            .bind(req.description)
            .bind(req.icon)
            .bind(req.is_visible.unwrap_or(true))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        row.try_into()
    }

    /// update_skill
    ///
    /// A category change without an explicit `order` appends the skill to the
    /// end of its new category, under that category's scope lock.
    async fn update_skill(&self, id: &str, req: UpdateSkillRequest) -> RepoResult<Option<Skill>> {
        let mut tx = self.pool.begin().await?;
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE skills SET updated_at = NOW()");

        if let Some(category) = req.category {
            let current: Option<String> =
                sqlx::query_scalar("SELECT category FROM skills WHERE id = $1 FOR UPDATE")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;
            let Some(current) = current else {
                return Ok(None);
            };

            let target = category.as_str();
            builder.push(", category = ").push_bind(target);
            if current != target && req.order.is_none() {
                lock_scope(&mut tx, &format!("skills:{target}")).await?;
                builder
                    .push(", sort_order = (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM skills WHERE category = ")
                    .push_bind(target)
                    .push(")");
            }
        }
        if let Some(name) = req.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(description) = req.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(icon) = req.icon {
            builder.push(", icon = ").push_bind(icon);
        }
        if let Some(order) = req.order {
            builder.push(", sort_order = ").push_bind(order);
        }
        if let Some(is_visible) = req.is_visible {
            builder.push(", is_visible = ").push_bind(is_visible);
        }

        builder.push(" WHERE id = ").push_bind(id.to_string());
        builder.push(format!(" RETURNING {SKILL_COLUMNS}"));

        let row = builder
            .build_query_as::<SkillRow>()
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;

        row.map(Skill::try_from).transpose()
    }

    async fn delete_skill(&self, id: &str) -> RepoResult<bool> {
        let res = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- EXPERIENCE ---

    async fn list_experiences(&self, visible_only: bool) -> RepoResult<Vec<Experience>> {
        let sql = format!(
            "SELECT {EXPERIENCE_COLUMNS} FROM experiences{} ORDER BY sort_order ASC, created_at ASC",
            visibility_clause(visible_only)
        );
        let rows = sqlx::query_as::<_, ExperienceRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Experience::from).collect())
    }

    async fn get_experience(&self, id: &str) -> RepoResult<Option<Experience>> {
        let sql = format!("SELECT {EXPERIENCE_COLUMNS} FROM experiences WHERE id = $1");
        let row = sqlx::query_as::<_, ExperienceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Experience::from))
    }

    async fn create_experience(&self, req: CreateExperienceRequest) -> RepoResult<Experience> {
        let mut tx = self.pool.begin().await?;
        lock_scope(&mut tx, "experiences").await?;

        let sql = format!(
            r#"
            INSERT INTO experiences (
                id, title, company, description, start_date, end_date, is_current,
                sort_order, is_visible, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7,
                (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM experiences),
                $8, NOW(), NOW()
            )
            RETURNING {EXPERIENCE_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ExperienceRow>(&sql)
            .bind(new_id())
            .bind(req.title)
            .bind(req.company)
            .bind(req.description)
            .bind(req.start_date)
            .bind(req.end_date)
            .bind(req.is_current)
            .bind(req.is_visible.unwrap_or(true))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn update_experience(
        &self,
        id: &str,
        req: UpdateExperienceRequest,
    ) -> RepoResult<Option<Experience>> {
        let mut tx = self.pool.begin().await?;

        // The date range is checked against the merged record, with the row
        // locked until the update lands.
        let dates: Option<(NaiveDate, Option<NaiveDate>)> = sqlx::query_as(
            "SELECT start_date, end_date FROM experiences WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((start_date, end_date)) = dates else {
            return Ok(None);
        };
        req.check_dates(start_date, end_date)
            .map_err(RepoError::Invalid)?;

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE experiences SET updated_at = NOW()");

        if let Some(title) = req.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(company) = req.company {
            builder.push(", company = ").push_bind(company);
        }
        if let Some(description) = req.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(start_date) = req.start_date {
            builder.push(", start_date = ").push_bind(start_date);
        }
        if let Some(end_date) = req.end_date {
            builder.push(", end_date = ").push_bind(end_date);
        }
        if let Some(is_current) = req.is_current {
            builder.push(", is_current = ").push_bind(is_current);
        }
        if let Some(order) = req.order {
            builder.push(", sort_order = ").push_bind(order);
        }
        if let Some(is_visible) = req.is_visible {
            builder.push(", is_visible = ").push_bind(is_visible);
        }

        builder.push(" WHERE id = ").push_bind(id.to_string());
        builder.push(format!(" RETURNING {EXPERIENCE_COLUMNS}"));

        let row = builder
            .build_query_as::<ExperienceRow>()
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(row.map(Experience::from))
    }

    async fn delete_experience(&self, id: &str) -> RepoResult<bool> {
        let res = sqlx::query("DELETE FROM experiences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- SINGLETONS ---

    async fn get_about(&self) -> RepoResult<Option<About>> {
        let sql = format!("SELECT {ABOUT_COLUMNS} FROM about ORDER BY created_at ASC, id ASC LIMIT 1");
        let row = sqlx::query_as::<_, AboutRow>(&sql)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(About::from))
    }

    /// upsert_about
    ///
    /// Updates the first existing row; creates `main-about` when the table is empty.
    async fn upsert_about(&self, req: UpsertAboutRequest) -> RepoResult<About> {
        let focus_areas = req.focus_areas.as_deref().map(encode_list);

        let mut tx = self.pool.begin().await?;
        lock_scope(&mut tx, "about").await?;

        let existing: Option<String> =
            sqlx::query_scalar("SELECT id FROM about ORDER BY created_at ASC, id ASC LIMIT 1")
                .fetch_optional(&mut *tx)
                .await?;

        let row = match existing {
            Some(id) => {
                let sql = format!(
                    r#"
                    UPDATE about
                    SET summary = COALESCE($2, summary),
                        education = COALESCE($3, education),
                        focus_areas = COALESCE($4, focus_areas),
                        internship = COALESCE($5, internship),
                        updated_at = NOW()
                    WHERE id = $1
                    RETURNING {ABOUT_COLUMNS}
                    "#
                );
                sqlx::query_as::<_, AboutRow>(&sql)
                    .bind(id)
                    .bind(req.summary)
                    .bind(req.education)
                    .bind(focus_areas)
                    .bind(req.internship)
                    .fetch_one(&mut *tx)
                    .await?
            }
            None => {
                let sql = format!(
                    r#"
                    INSERT INTO about (id, summary, education, focus_areas, internship, created_at, updated_at)
                    VALUES ($1, COALESCE($2, ''), COALESCE($3, ''), COALESCE($4, '[]'), COALESCE($5, ''), NOW(), NOW())
                    RETURNING {ABOUT_COLUMNS}
                    "#
                );
                sqlx::query_as::<_, AboutRow>(&sql)
                    .bind(ABOUT_ID)
                    .bind(req.summary)
                    .bind(req.education)
                    .bind(focus_areas)
                    .bind(req.internship)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(row.into())
    }

    async fn get_settings(&self) -> RepoResult<Option<SiteSettings>> {
        let sql = format!(
            "SELECT {SETTINGS_COLUMNS} FROM site_settings ORDER BY created_at ASC, id ASC LIMIT 1"
        );
        let row = sqlx::query_as::<_, SettingsRow>(&sql)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(SiteSettings::from))
    }

    /// upsert_settings
    ///
    /// Same find-first-or-create semantics as `upsert_about`, keyed on `main-settings`.
    async fn upsert_settings(&self, req: UpsertSettingsRequest) -> RepoResult<SiteSettings> {
        let mut tx = self.pool.begin().await?;
        lock_scope(&mut tx, "site_settings").await?;

        let existing: Option<String> = sqlx::query_scalar(
            "SELECT id FROM site_settings ORDER BY created_at ASC, id ASC LIMIT 1",
        )
        .fetch_optional(&mut *tx)
        .await?;

        let sql = match existing {
            Some(_) => format!(
                r#"
                UPDATE site_settings
                SET hero_title = COALESCE($2, hero_title),
                    hero_subtitle = COALESCE($3, hero_subtitle),
                    hero_description = COALESCE($4, hero_description),
                    email = COALESCE($5, email),
                    github = COALESCE($6, github),
                    linkedin = COALESCE($7, linkedin),
                    whatsapp = COALESCE($8, whatsapp),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING {SETTINGS_COLUMNS}
                "#
            ),
            None => format!(
                r#"
                INSERT INTO site_settings (
                    id, hero_title, hero_subtitle, hero_description,
                    email, github, linkedin, whatsapp, created_at, updated_at
                )
                VALUES (
                    $1, COALESCE($2, ''), COALESCE($3, ''), COALESCE($4, ''),
                    COALESCE($5, ''), COALESCE($6, ''), COALESCE($7, ''), COALESCE($8, ''),
                    NOW(), NOW()
                )
                RETURNING {SETTINGS_COLUMNS}
                "#
            ),
        };

        let row = sqlx::query_as::<_, SettingsRow>(&sql)
            .bind(existing.unwrap_or_else(|| SETTINGS_ID.to_string()))
            .bind(req.hero_title)
            .bind(req.hero_subtitle)
            .bind(req.hero_description)
            .bind(req.email)
            .bind(req.github)
            .bind(req.linkedin)
            .bind(req.whatsapp)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    /// get_stats
    ///
    /// Compiles the dashboard counters in a single round trip.
    async fn get_stats(&self) -> RepoResult<AdminDashboardStats> {
        let (projects, skills, experiences, skill_categories): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM projects),
                    (SELECT COUNT(*) FROM skills),
                    (SELECT COUNT(*) FROM experiences),
                    (SELECT COUNT(DISTINCT category) FROM skills)
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(AdminDashboardStats {
            projects,
            skills,
            experiences,
            skill_categories,
        })
    }
}
