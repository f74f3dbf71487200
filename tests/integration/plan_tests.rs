use cst::catalog::SkillCatalog;
use cst::core::plan::{ClassPlanUpdate, NewClassPlan};
use cst::core::skill::NewSkill;
use cst::core::taxonomy::{Apparatus, Level};
use cst::core::weeks::parse_date_time;
use cst::error::CstError;
use cst::planner::ClassPlanComposer;
use cst::storage::Database;

use crate::fixture::SchoolFixture;

fn plan(fixture: &SchoolFixture, title: &str, skills: &[&str]) -> NewClassPlan {
    NewClassPlan {
        title: title.to_string(),
        description: Some("drops day".to_string()),
        date: parse_date_time("2024-08-05").unwrap(),
        duration_minutes: 60,
        class_id: fixture.class_id.clone(),
        skill_ids: skills.iter().map(ToString::to_string).collect(),
        notes: None,
    }
}

#[test]
fn invalid_skill_leaves_no_plan_named_t() {
    let fixture = SchoolFixture::new();
    let composer = ClassPlanComposer::new(&fixture.db);

    let err = composer
        .create(plan(&fixture, "T", &["s1", "s2", "doesNotExist"]))
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.to_string(), "One or more skills not found");

    assert_eq!(fixture.table_count("class_plans"), 0);
    assert_eq!(fixture.table_count("class_plan_skills"), 0);

    // A fresh handle sees the same empty state.
    let reopened = Database::open(fixture.db_path()).unwrap();
    let plans = ClassPlanComposer::new(&reopened).list(None).unwrap();
    assert!(plans.iter().all(|p| p.title != "T"));
}

#[test]
fn update_from_three_skills_to_one() {
    let fixture = SchoolFixture::new();
    let composer = ClassPlanComposer::new(&fixture.db);
    SkillCatalog::new(&fixture.db)
        .create_skill(NewSkill {
            id: Some("s3".to_string()),
            name: "Salto".to_string(),
            core: false,
            apparatus: Apparatus::Silks,
            level: Level::Tech2,
            taught_in: Vec::new(),
            applicable_weeks: None,
            notes: String::new(),
            cues: String::new(),
        })
        .unwrap();

    let created = composer
        .create(plan(&fixture, "ABC", &["s1", "s2", "s3"]))
        .unwrap();
    assert_eq!(fixture.table_count("class_plan_skills"), 3);

    let updated = composer
        .update(ClassPlanUpdate {
            skill_ids: Some(vec!["s2".to_string()]),
            ..ClassPlanUpdate::new(created.plan.id.clone())
        })
        .unwrap();
    assert_eq!(fixture.table_count("class_plan_skills"), 1);
    assert_eq!(updated.skills[0].skill.id, "s2");
    assert_eq!(updated.skills[0].position, 1);
    assert_eq!(updated.plan.description.as_deref(), Some("drops day"));
}

#[test]
fn hydrated_plan_carries_people() {
    let fixture = SchoolFixture::new();
    let composer = ClassPlanComposer::new(&fixture.db);
    let created = composer.create(plan(&fixture, "People", &["s1"])).unwrap();

    let loaded = composer.get_required(&created.plan.id).unwrap();
    assert_eq!(loaded.class.instructor.name, "Kim");
    let names: Vec<_> = loaded.class.students.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Ada", "Bo"]);
    assert_eq!(loaded.plan.week_of_year, 32);
}

#[test]
fn deleting_twice_reports_not_found() {
    let fixture = SchoolFixture::new();
    let composer = ClassPlanComposer::new(&fixture.db);
    let created = composer.create(plan(&fixture, "Once", &["s1"])).unwrap();
    composer.delete(&created.plan.id).unwrap();
    assert!(matches!(
        composer.delete(&created.plan.id),
        Err(CstError::ClassPlanNotFound(_))
    ));
}
