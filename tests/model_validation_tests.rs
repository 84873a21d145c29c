use chrono::NaiveDate;
use portfolio_cms::models::{
    CreateExperienceRequest, CreateProjectRequest, CreateSkillRequest, MAX_ORDER, Portfolio, Project,
    SkillCategory, UpdateExperienceRequest, UpdateProjectRequest, UpdateSkillRequest,
};
use serde_json::json;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_project_serializes_camel_case() {
    let project = Project {
        id: "p1".to_string(),
        title: "Arena".to_string(),
        tech_stack: vec!["Rust".to_string()],
        screenshots: vec!["/uploads/projects/a.png".to_string(), "/b.png".to_string()],
        ..Project::default()
    };

    let value = serde_json::to_value(&project).unwrap();

    assert_eq!(value["techStack"], json!(["Rust"]));
    assert_eq!(value["shortDescription"], "");
    assert_eq!(value["githubUrl"], json!(null));
    assert!(value.get("tech_stack").is_none());
    assert_eq!(project.cover_image(), Some("/uploads/projects/a.png"));
    assert_eq!(Project::default().cover_image(), None);
}

#[test]
fn test_skill_category_wire_names() {
    assert_eq!(
        serde_json::to_value(SkillCategory::SystemAndTools).unwrap(),
        json!("System & Tools")
    );
    assert_eq!(
        serde_json::from_value::<SkillCategory>(json!("Database")).unwrap(),
        SkillCategory::Database
    );
    assert!(serde_json::from_value::<SkillCategory>(json!("database")).is_err());

    for category in SkillCategory::ALL {
        assert_eq!(category.as_str().parse::<SkillCategory>(), Ok(category));
    }
    assert!("Mainframe".parse::<SkillCategory>().is_err());
}

#[test]
fn test_create_project_defaults_and_blank_urls() {
    let req: CreateProjectRequest = serde_json::from_value(json!({
        "title": "Only a title",
        "githubUrl": "",
        "liveUrl": "https://example.com"
    }))
    .unwrap();

    let req = req.validate().unwrap();
    assert!(req.features.is_empty());
    assert_eq!(req.github_url, None);
    assert_eq!(req.live_url.as_deref(), Some("https://example.com"));
    assert_eq!(req.is_visible, None);
}

#[test]
fn test_update_distinguishes_absent_from_null() {
    let absent: UpdateProjectRequest = serde_json::from_value(json!({"title": "x"})).unwrap();
    assert_eq!(absent.github_url, None);

    let null: UpdateProjectRequest = serde_json::from_value(json!({"githubUrl": null})).unwrap();
    assert_eq!(null.github_url, Some(None));

    let blank = serde_json::from_value::<UpdateSkillRequest>(json!({"icon": "  "}))
        .unwrap()
        .validate()
        .unwrap();
    assert_eq!(blank.icon, Some(None));
    assert_eq!(blank.description, None);
}

#[test]
fn test_update_rejects_blank_required_text() {
    let req: UpdateProjectRequest = serde_json::from_value(json!({"title": ""})).unwrap();
    assert_eq!(req.validate().unwrap_err(), "title is required");

    let req: CreateSkillRequest =
        serde_json::from_value(json!({"name": " ", "category": "Frontend"})).unwrap();
    assert_eq!(req.validate().unwrap_err(), "name is required");
}

#[test]
fn test_experience_dates_accept_plain_and_rfc3339() {
    let req: CreateExperienceRequest = serde_json::from_value(json!({
        "title": "Engineer",
        "company": "Acme",
        "startDate": "2023-01-15T00:00:00.000Z",
        "endDate": "2023-12-31"
    }))
    .unwrap();

    assert_eq!(req.start_date, date("2023-01-15"));
    assert_eq!(req.end_date, Some(date("2023-12-31")));
    assert!(req.validate().is_ok());

    let bad = serde_json::from_value::<CreateExperienceRequest>(json!({
        "title": "Engineer",
        "company": "Acme",
        "startDate": "last spring"
    }));
    assert!(bad.is_err());
}

#[test]
fn test_experience_end_before_start_is_rejected() {
    let req: CreateExperienceRequest = serde_json::from_value(json!({
        "title": "Engineer",
        "company": "Acme",
        "startDate": "2024-01-01",
        "endDate": "2023-01-01"
    }))
    .unwrap();

    assert_eq!(
        req.validate().unwrap_err(),
        "endDate must not be before startDate"
    );
}

#[test]
fn test_experience_update_resolves_current_flag() {
    let going_current = serde_json::from_value::<UpdateExperienceRequest>(json!({"isCurrent": true}))
        .unwrap()
        .validate()
        .unwrap();
    assert_eq!(going_current.end_date, Some(None));

    let ending = serde_json::from_value::<UpdateExperienceRequest>(json!({"endDate": "2024-05-01"}))
        .unwrap()
        .validate()
        .unwrap();
    assert_eq!(ending.is_current, Some(false));
    assert_eq!(ending.end_date, Some(Some(date("2024-05-01"))));

    let clearing = serde_json::from_value::<UpdateExperienceRequest>(json!({"endDate": null}))
        .unwrap()
        .validate()
        .unwrap();
    assert_eq!(clearing.end_date, Some(None));
    assert_eq!(clearing.is_current, None);

    let both = serde_json::from_value::<UpdateExperienceRequest>(json!({
        "isCurrent": true,
        "endDate": "2024-05-01"
    }))
    .unwrap();
    assert!(both.validate().is_err());
}

#[test]
fn test_update_order_must_leave_room_to_append() {
    let at_limit: UpdateSkillRequest =
        serde_json::from_value(json!({"order": MAX_ORDER})).unwrap();
    assert!(at_limit.validate().is_ok());

    for order in [i32::MAX, 0, -1] {
        let project: UpdateProjectRequest =
            serde_json::from_value(json!({"order": order})).unwrap();
        assert!(project.validate().is_err());

        let experience: UpdateExperienceRequest =
            serde_json::from_value(json!({"order": order})).unwrap();
        assert!(experience.validate().is_err());
    }
}

#[test]
fn test_experience_update_dates_checked_against_stored_record() {
    let stored_start = date("2020-01-01");
    let stored_end = Some(date("2021-01-01"));

    let later_start: UpdateExperienceRequest =
        serde_json::from_value(json!({"startDate": "2023-01-01"})).unwrap();
    assert_eq!(
        later_start.check_dates(stored_start, stored_end).unwrap_err(),
        "endDate must not be before startDate"
    );

    let earlier_end: UpdateExperienceRequest =
        serde_json::from_value(json!({"endDate": "2019-06-01"})).unwrap();
    assert!(earlier_end.check_dates(stored_start, stored_end).is_err());

    let current = serde_json::from_value::<UpdateExperienceRequest>(json!({
        "isCurrent": true,
        "startDate": "2023-01-01"
    }))
    .unwrap()
    .validate()
    .unwrap();
    assert!(current.check_dates(stored_start, stored_end).is_ok());

    let untouched = UpdateExperienceRequest::default();
    assert!(untouched.check_dates(stored_start, stored_end).is_ok());
}

#[test]
fn test_empty_portfolio_shape() {
    let value = serde_json::to_value(Portfolio::default()).unwrap();

    assert_eq!(
        value,
        json!({
            "settings": null,
            "about": null,
            "skills": [],
            "projects": [],
            "experiences": []
        })
    );
}
