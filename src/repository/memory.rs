use std::{
    collections::HashSet,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::Utc;

use super::{RepoError, RepoResult, Repository, new_id};
use crate::models::{
    ABOUT_ID, About, AdminDashboardStats, CreateExperienceRequest, CreateProjectRequest,
    CreateSkillRequest, Experience, Project, SETTINGS_ID, SiteSettings, Skill,
    UpdateExperienceRequest, UpdateProjectRequest, UpdateSkillRequest, UpsertAboutRequest,
    UpsertSettingsRequest,
};

#[derive(Default)]
struct MemoryState {
    projects: Vec<Project>,
    skills: Vec<Skill>,
    experiences: Vec<Experience>,
    about: Option<About>,
    settings: Option<SiteSettings>,
}

/// InMemoryRepository
///
/// A `Repository` held entirely in process memory, used by the test-suite and
/// for running the API without a database. All state sits behind one mutex, so
/// order assignment is atomic here as well.
#[derive(Default)]
pub struct InMemoryRepository {
    state: Mutex<MemoryState>,
    /// When true, every operation fails as if the database were down.
    pub should_fail: bool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    fn state(&self) -> RepoResult<MutexGuard<'_, MemoryState>> {
        if self.should_fail {
            return Err(RepoError::Unavailable(
                "simulated storage failure".to_string(),
            ));
        }
        self.state
            .lock()
            .map_err(|_| RepoError::Unavailable("state lock poisoned".to_string()))
    }
}

fn next_order<'a>(orders: impl Iterator<Item = &'a i32>) -> RepoResult<i32> {
    let max = orders.max().copied().unwrap_or(0);
    max.checked_add(1)
        .ok_or_else(|| RepoError::Corrupt(format!("no order left after {max}")))
}

fn remove_by_id<T>(items: &mut Vec<T>, id: &str, key: impl Fn(&T) -> &str) -> bool {
    let before = items.len();
    items.retain(|item| key(item) != id);
    items.len() != before
}

#[async_trait]
impl Repository for InMemoryRepository {
    // --- PROJECTS ---

    async fn list_projects(&self, visible_only: bool) -> RepoResult<Vec<Project>> {
        let state = self.state()?;
        let mut projects: Vec<Project> = state
            .projects
            .iter()
            .filter(|p| !visible_only || p.is_visible)
            .cloned()
            .collect();
        projects.sort_by(|a, b| a.order.cmp(&b.order).then(a.created_at.cmp(&b.created_at)));
        Ok(projects)
    }

    async fn get_project(&self, id: &str) -> RepoResult<Option<Project>> {
        let state = self.state()?;
        Ok(state.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn create_project(&self, req: CreateProjectRequest) -> RepoResult<Project> {
        let mut state = self.state()?;
        let now = Utc::now();
        let project = Project {
            id: new_id(),
            title: req.title,
            short_description: req.short_description,
            overview: req.overview,
            role: req.role,
            features: req.features,
            tech_stack: req.tech_stack,
            screenshots: req.screenshots,
            github_url: req.github_url,
            live_url: req.live_url,
            order: next_order(state.projects.iter().map(|p| &p.order))?,
            is_visible: req.is_visible.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: &str,
        req: UpdateProjectRequest,
    ) -> RepoResult<Option<Project>> {
        let mut state = self.state()?;
        let Some(project) = state.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(title) = req.title {
            project.title = title;
        }
        if let Some(short_description) = req.short_description {
            project.short_description = short_description;
        }
        if let Some(overview) = req.overview {
            project.overview = overview;
        }
        if let Some(role) = req.role {
            project.role = role;
        }
        if let Some(features) = req.features {
            project.features = features;
        }
        if let Some(tech_stack) = req.tech_stack {
            project.tech_stack = tech_stack;
        }
        if let Some(screenshots) = req.screenshots {
            project.screenshots = screenshots;
        }
        if let Some(github_url) = req.github_url {
            project.github_url = github_url;
        }
        if let Some(live_url) = req.live_url {
            project.live_url = live_url;
        }
        if let Some(order) = req.order {
            project.order = order;
        }
        if let Some(is_visible) = req.is_visible {
            project.is_visible = is_visible;
        }
        project.updated_at = Utc::now();

        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: &str) -> RepoResult<bool> {
        let mut state = self.state()?;
        Ok(remove_by_id(&mut state.projects, id, |p| p.id.as_str()))
    }

    // --- SKILLS ---

    async fn list_skills(&self, visible_only: bool) -> RepoResult<Vec<Skill>> {
        let state = self.state()?;
        let mut skills: Vec<Skill> = state
            .skills
            .iter()
            .filter(|s| !visible_only || s.is_visible)
            .cloned()
            .collect();
        skills.sort_by(|a, b| {
            a.category
                .as_str()
                .cmp(b.category.as_str())
                .then(a.order.cmp(&b.order))
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(skills)
    }

    async fn get_skill(&self, id: &str) -> RepoResult<Option<Skill>> {
        let state = self.state()?;
        Ok(state.skills.iter().find(|s| s.id == id).cloned())
    }

    async fn create_skill(&self, req: CreateSkillRequest) -> RepoResult<Skill> {
        let mut state = self.state()?;
        let now = Utc::now();
        let order = next_order(
            state
                .skills
                .iter()
                .filter(|s| s.category == req.category)
                .map(|s| &s.order),
        )?;
        let skill = Skill {
            id: new_id(),
            name: req.name,
            category: req.category,
            description: req.description,
            icon: req.icon,
            order,
            is_visible: req.is_visible.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        state.skills.push(skill.clone());
        Ok(skill)
    }

    async fn update_skill(&self, id: &str, req: UpdateSkillRequest) -> RepoResult<Option<Skill>> {
        let mut state = self.state()?;
        let Some(current) = state.skills.iter().find(|s| s.id == id).map(|s| s.category) else {
            return Ok(None);
        };

        // Moving category appends to the end of the target category.
        let moved_order = match req.category {
            Some(category) if category != current && req.order.is_none() => Some(next_order(
                state
                    .skills
                    .iter()
                    .filter(|s| s.category == category)
                    .map(|s| &s.order),
            )?),
            _ => None,
        };

        let Some(skill) = state.skills.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        if let Some(name) = req.name {
            skill.name = name;
        }
        if let Some(category) = req.category {
            skill.category = category;
        }
        if let Some(description) = req.description {
            skill.description = description;
        }
        if let Some(icon) = req.icon {
            skill.icon = icon;
        }
        if let Some(order) = req.order.or(moved_order) {
            skill.order = order;
        }
        if let Some(is_visible) = req.is_visible {
            skill.is_visible = is_visible;
        }
        skill.updated_at = Utc::now();

        Ok(Some(skill.clone()))
    }

    async fn delete_skill(&self, id: &str) -> RepoResult<bool> {
        let mut state = self.state()?;
        Ok(remove_by_id(&mut state.skills, id, |s| s.id.as_str()))
    }

    // --- EXPERIENCE ---

    async fn list_experiences(&self, visible_only: bool) -> RepoResult<Vec<Experience>> {
        let state = self.state()?;
        let mut experiences: Vec<Experience> = state
            .experiences
            .iter()
            .filter(|e| !visible_only || e.is_visible)
            .cloned()
            .collect();
        experiences.sort_by(|a, b| a.order.cmp(&b.order).then(a.created_at.cmp(&b.created_at)));
        Ok(experiences)
    }

    async fn get_experience(&self, id: &str) -> RepoResult<Option<Experience>> {
        let state = self.state()?;
        Ok(state.experiences.iter().find(|e| e.id == id).cloned())
    }

    async fn create_experience(&self, req: CreateExperienceRequest) -> RepoResult<Experience> {
        let mut state = self.state()?;
        let now = Utc::now();
        let experience = Experience {
            id: new_id(),
            title: req.title,
            company: req.company,
            description: req.description,
            start_date: req.start_date,
            end_date: req.end_date,
            is_current: req.is_current,
            order: next_order(state.experiences.iter().map(|e| &e.order))?,
            is_visible: req.is_visible.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        state.experiences.push(experience.clone());
        Ok(experience)
    }

    async fn update_experience(
        &self,
        id: &str,
        req: UpdateExperienceRequest,
    ) -> RepoResult<Option<Experience>> {
        let mut state = self.state()?;
        let Some(experience) = state.experiences.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        req.check_dates(experience.start_date, experience.end_date)
            .map_err(RepoError::Invalid)?;

        if let Some(title) = req.title {
            experience.title = title;
        }
        if let Some(company) = req.company {
            experience.company = company;
        }
        if let Some(description) = req.description {
            experience.description = description;
        }
        if let Some(start_date) = req.start_date {
            experience.start_date = start_date;
        }
        if let Some(end_date) = req.end_date {
            experience.end_date = end_date;
        }
        if let Some(is_current) = req.is_current {
            experience.is_current = is_current;
        }
        if let Some(order) = req.order {
            experience.order = order;
        }
        if let Some(is_visible) = req.is_visible {
            experience.is_visible = is_visible;
        }
        experience.updated_at = Utc::now();

        Ok(Some(experience.clone()))
    }

    async fn delete_experience(&self, id: &str) -> RepoResult<bool> {
        let mut state = self.state()?;
        Ok(remove_by_id(&mut state.experiences, id, |e| e.id.as_str()))
    }

    // --- SINGLETONS ---

    async fn get_about(&self) -> RepoResult<Option<About>> {
        Ok(self.state()?.about.clone())
    }

    async fn upsert_about(&self, req: UpsertAboutRequest) -> RepoResult<About> {
        let mut state = self.state()?;
        let now = Utc::now();
        let about = state.about.get_or_insert_with(|| About {
            id: ABOUT_ID.to_string(),
            created_at: now,
            ..About::default()
        });

        if let Some(summary) = req.summary {
            about.summary = summary;
        }
        if let Some(education) = req.education {
            about.education = education;
        }
        if let Some(focus_areas) = req.focus_areas {
            about.focus_areas = focus_areas;
        }
        if let Some(internship) = req.internship {
            about.internship = internship;
        }
        about.updated_at = now;

        Ok(about.clone())
    }

    async fn get_settings(&self) -> RepoResult<Option<SiteSettings>> {
        Ok(self.state()?.settings.clone())
    }

    async fn upsert_settings(&self, req: UpsertSettingsRequest) -> RepoResult<SiteSettings> {
        let mut state = self.state()?;
        let now = Utc::now();
        let settings = state.settings.get_or_insert_with(|| SiteSettings {
            id: SETTINGS_ID.to_string(),
            created_at: now,
            ..SiteSettings::default()
        });

        let fields = [
            (req.hero_title, &mut settings.hero_title),
            (req.hero_subtitle, &mut settings.hero_subtitle),
            (req.hero_description, &mut settings.hero_description),
            (req.email, &mut settings.email),
            (req.github, &mut settings.github),
            (req.linkedin, &mut settings.linkedin),
            (req.whatsapp, &mut settings.whatsapp),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        settings.updated_at = now;

        Ok(settings.clone())
    }

    async fn get_stats(&self) -> RepoResult<AdminDashboardStats> {
        let state = self.state()?;
        let categories: HashSet<_> = state.skills.iter().map(|s| s.category).collect();
        Ok(AdminDashboardStats {
            projects: state.projects.len() as i64,
            skills: state.skills.len() as i64,
            experiences: state.experiences.len() as i64,
            skill_categories: categories.len() as i64,
        })
    }
}
