use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// Fixed identifier of the single `SiteSettings` row.
pub const SETTINGS_ID: &str = "main-settings";
/// Fixed identifier of the single `About` row.
pub const ABOUT_ID: &str = "main-about";

// --- Content Entities (Mapped to Database) ---

/// Project
///
/// A portfolio project. The first screenshot doubles as the cover image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub short_description: String,
    pub overview: String,
    pub role: String,
    pub features: Vec<String>,
    pub tech_stack: Vec<String>,
    pub screenshots: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    // Display position; assigned as max+1 on create.
    pub order: i32,
    pub is_visible: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn cover_image(&self) -> Option<&str> {
        self.screenshots.first().map(String::as_str)
    }
}

/// SkillCategory
///
/// The closed set of groups the skills section is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub enum SkillCategory {
    #[default]
    Frontend,
    Backend,
    Database,
    #[serde(rename = "System & Tools")]
    SystemAndTools,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 4] = [
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Database,
        SkillCategory::SystemAndTools,
    ];

    /// The stored and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "Frontend",
            SkillCategory::Backend => "Backend",
            SkillCategory::Database => "Database",
            SkillCategory::SystemAndTools => "System & Tools",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown skill category: {s}"))
    }
}

/// Skill
///
/// One entry of the skills grid. `order` is scoped to the category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub category: SkillCategory,
    pub description: Option<String>,
    // Icon identifier understood by the front-end icon set.
    pub icon: Option<String>,
    pub order: i32,
    pub is_visible: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Experience
///
/// A timeline entry. `is_current` and `end_date` are never both set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Experience {
    pub id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub order: i32,
    pub is_visible: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// About
///
/// Singleton backing the "about me" section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct About {
    pub id: String,
    pub summary: String,
    pub education: String,
    pub focus_areas: Vec<String>,
    pub internship: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// SiteSettings
///
/// Singleton holding the hero copy and contact handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SiteSettings {
    pub id: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_description: String,
    pub email: String,
    pub github: String,
    pub linkedin: String,
    pub whatsapp: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// --- Request Payloads (Input Schemas) ---

/// CreateProjectRequest
///
/// Input payload for `POST /projects`. `order` is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl CreateProjectRequest {
    /// Checks required fields and folds `""` URLs into `None`.
    pub fn validate(mut self) -> Result<Self, String> {
        require_text("title", &self.title)?;
        self.github_url = blank_to_none(self.github_url);
        self.live_url = blank_to_none(self.live_url);
        Ok(self)
    }
}

/// UpdateProjectRequest
///
/// Sparse update for `PUT /projects/{id}`. Absent fields are left untouched;
/// for the nullable URLs an explicit `null` (or `""`) clears the value.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateProjectRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshots: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub github_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub live_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl UpdateProjectRequest {
    pub fn validate(mut self) -> Result<Self, String> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        check_order(self.order)?;
        self.github_url = self.github_url.map(blank_to_none);
        self.live_url = self.live_url.map(blank_to_none);
        Ok(self)
    }
}

/// CreateSkillRequest
///
/// Input payload for `POST /skills`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateSkillRequest {
    pub name: String,
    pub category: SkillCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl CreateSkillRequest {
    pub fn validate(mut self) -> Result<Self, String> {
        require_text("name", &self.name)?;
        self.description = blank_to_none(self.description);
        self.icon = blank_to_none(self.icon);
        Ok(self)
    }
}

/// UpdateSkillRequest
///
/// Sparse update for `PUT /skills/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateSkillRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<SkillCategory>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub icon: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl UpdateSkillRequest {
    pub fn validate(mut self) -> Result<Self, String> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        check_order(self.order)?;
        self.description = self.description.map(blank_to_none);
        self.icon = self.icon.map(blank_to_none);
        Ok(self)
    }
}

/// CreateExperienceRequest
///
/// Input payload for `POST /experience`. Dates are `YYYY-MM-DD`; an empty
/// `endDate` is treated as absent.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateExperienceRequest {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "date_required")]
    pub start_date: NaiveDate,
    #[serde(default, deserialize_with = "date_optional", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl CreateExperienceRequest {
    pub fn validate(self) -> Result<Self, String> {
        require_text("title", &self.title)?;
        require_text("company", &self.company)?;
        if self.is_current && self.end_date.is_some() {
            return Err(CURRENT_WITH_END_DATE.to_string());
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(END_BEFORE_START.to_string());
            }
        }
        Ok(self)
    }
}

/// UpdateExperienceRequest
///
/// Sparse update for `PUT /experience/{id}`.
///
/// The current/end-date exclusivity is kept at the store level: `isCurrent: true`
/// clears the stored end date, and a non-null `endDate` on its own clears `isCurrent`.
/// Sending both in one payload is rejected.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateExperienceRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "date_optional", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "date_nullable", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<NaiveDate>)]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_current: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl UpdateExperienceRequest {
    /// Validates the payload and resolves the current/end-date rule into
    /// explicit column changes.
    pub fn validate(mut self) -> Result<Self, String> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(company) = &self.company {
            require_text("company", company)?;
        }
        check_order(self.order)?;

        match (self.is_current, self.end_date) {
            (Some(true), Some(Some(_))) => return Err(CURRENT_WITH_END_DATE.to_string()),
            (Some(true), _) => self.end_date = Some(None),
            (None, Some(Some(_))) => self.is_current = Some(false),
            _ => {}
        }
        Ok(self)
    }

    /// Checks the date range the stored record would hold once this update is
    /// applied to `start_date`/`end_date`.
    pub fn check_dates(
        &self,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<(), String> {
        let start = self.start_date.unwrap_or(start_date);
        let end = self.end_date.unwrap_or(end_date);
        match end {
            Some(end) if end < start => Err(END_BEFORE_START.to_string()),
            _ => Ok(()),
        }
    }
}

const CURRENT_WITH_END_DATE: &str = "An experience marked as current cannot have an end date";
const END_BEFORE_START: &str = "endDate must not be before startDate";

/// UpsertAboutRequest
///
/// Payload for `PUT /about`. Absent fields keep their stored value (or default
/// to empty when the singleton is created by this call).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpsertAboutRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_areas: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internship: Option<String>,
}

/// UpsertSettingsRequest
///
/// Payload for `PUT /settings`, same sparse semantics as [`UpsertAboutRequest`].
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpsertSettingsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
}

/// LoginRequest
///
/// Input payload for `POST /auth/login`. The password is compared and dropped, never logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub password: String,
}

// --- Output Schemas ---

/// SessionStatus
///
/// Output of `GET /auth/session`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionStatus {
    pub is_admin: bool,
}

/// SuccessResponse
///
/// Acknowledgement body for login, logout and delete.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// UploadResponse
///
/// Output of `POST /upload`: the public URL of the stored image and its generated name.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
}

/// AdminDashboardStats
///
/// Output schema for the dashboard quick stats (`GET /admin/stats`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdminDashboardStats {
    pub projects: i64,
    pub skills: i64,
    pub experiences: i64,
    /// Distinct skill categories currently in use.
    pub skill_categories: i64,
}

/// Portfolio
///
/// Everything the public page renders, fetched in one call (`GET /portfolio`).
/// Collections contain visible records only, in display order.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Portfolio {
    pub settings: Option<SiteSettings>,
    pub about: Option<About>,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
    pub experiences: Vec<Experience>,
}

// --- Payload helpers ---

/// Highest `order` a client may set. Appends in the same scope take
/// `MAX(order) + 1`, which must still fit in an `i32`.
pub const MAX_ORDER: i32 = i32::MAX - 1;

fn check_order(order: Option<i32>) -> Result<(), String> {
    match order {
        Some(order) if !(1..=MAX_ORDER).contains(&order) => {
            Err(format!("order must be between 1 and {MAX_ORDER}"))
        }
        _ => Ok(()),
    }
}

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} is required"))
    } else {
        Ok(())
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`,
/// via `#[serde(default)]`).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (the date part is kept).
fn parse_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Some(dt.date_naive()))
        .map_err(|_| format!("invalid date: {raw}"))
}

fn date_required<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw)
        .map_err(serde::de::Error::custom)?
        .ok_or_else(|| serde::de::Error::custom("date is required"))
}

fn date_optional<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_date(&raw).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn date_nullable<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    date_optional(deserializer).map(Some)
}
