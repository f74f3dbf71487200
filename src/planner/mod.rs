//! Class plan composer.
//!
//! A plan is written together with its ordered skill list. Every write runs
//! inside one transaction, so a failed reference check leaves neither a plan
//! row nor any link rows behind.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use rusqlite::Connection;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::ensure_skill_list_resolves;
use crate::core::plan::{
    ClassPlan, ClassPlanDetail, ClassPlanUpdate, NewClassPlan, PlannedSkill, SkillUsage,
};
use crate::core::roster::{Class, Instructor};
use crate::core::weeks::week_of_year;
use crate::error::{CstError, Result};
use crate::storage::{Database, now_timestamp, plans, roster, skills};

pub struct ClassPlanComposer<'a> {
    db: &'a Database,
}

impl<'a> ClassPlanComposer<'a> {
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a plan and its skill links atomically, returning the hydrated plan.
    pub fn create(&self, input: NewClassPlan) -> Result<ClassPlanDetail> {
        input.validate()?;

        let id = self.db.with_transaction(|tx| {
            if !roster::class_exists(tx, &input.class_id)? {
                return Err(CstError::ClassNotFound(input.class_id.clone()));
            }
            ensure_skill_list_resolves(tx, &input.skill_ids)?;

            let now = now_timestamp();
            let plan = ClassPlan {
                id: Uuid::new_v4().to_string(),
                title: input.title.clone(),
                description: input.description.clone(),
                date: input.date,
                week_of_year: week_of_year(input.date),
                duration_minutes: input.duration_minutes,
                notes: input.notes.clone(),
                class_id: input.class_id.clone(),
                created_at: now.clone(),
                updated_at: now.clone(),
            };
            plans::insert_plan(tx, &plan)?;
            plans::insert_links(tx, &plan.id, &input.skill_ids, &now)?;
            Ok(plan.id)
        })?;

        info!(
            plan_id = %id,
            class_id = %input.class_id,
            skills = input.skill_ids.len(),
            "created class plan"
        );
        self.get_required(&id)
    }

    /// Apply a partial update. A supplied skill list replaces every link.
    pub fn update(&self, update: ClassPlanUpdate) -> Result<ClassPlanDetail> {
        update.validate()?;

        self.db.with_transaction(|tx| {
            let mut plan = plans::get_plan(tx, &update.id)?
                .ok_or_else(|| CstError::ClassPlanNotFound(update.id.clone()))?;
            if update.is_noop() {
                return Ok(());
            }

            if let Some(title) = &update.title {
                plan.title.clone_from(title);
            }
            if let Some(description) = &update.description {
                plan.description = Some(description.clone());
            }
            if let Some(date) = update.date {
                plan.date = date;
                plan.week_of_year = week_of_year(date);
            }
            if let Some(duration) = update.duration_minutes {
                plan.duration_minutes = duration;
            }
            if let Some(notes) = &update.notes {
                plan.notes = Some(notes.clone());
            }
            let now = now_timestamp();
            plan.updated_at.clone_from(&now);
            plans::update_plan(tx, &plan)?;

            if let Some(skill_ids) = &update.skill_ids {
                ensure_skill_list_resolves(tx, skill_ids)?;
                let removed = plans::delete_links(tx, &plan.id)?;
                plans::insert_links(tx, &plan.id, skill_ids, &now)?;
                debug!(plan_id = %plan.id, removed, added = skill_ids.len(), "replaced plan skills");
            }
            Ok(())
        })?;

        info!(plan_id = %update.id, "updated class plan");
        self.get_required(&update.id)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let removed = plans::delete_plan(self.db.conn(), id)?;
        if removed == 0 {
            return Err(CstError::ClassPlanNotFound(id.to_string()));
        }
        info!(plan_id = id, "deleted class plan");
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<ClassPlanDetail>> {
        let conn = self.db.conn();
        match plans::get_plan(conn, id)? {
            Some(plan) => hydrate(conn, plan).map(Some),
            None => Ok(None),
        }
    }

    pub fn get_required(&self, id: &str) -> Result<ClassPlanDetail> {
        self.get(id)?
            .ok_or_else(|| CstError::ClassPlanNotFound(id.to_string()))
    }

    /// Plans newest first, optionally for one class.
    pub fn list(&self, class_id: Option<&str>) -> Result<Vec<ClassPlan>> {
        let conn = self.db.conn();
        if let Some(class_id) = class_id {
            if !roster::class_exists(conn, class_id)? {
                return Err(CstError::ClassNotFound(class_id.to_string()));
            }
        }
        plans::list_plans(conn, class_id)
    }

    /// Plans that teach `skill_id`, newest first, each with its class,
    /// instructor and the skill's positions in the plan.
    pub fn plans_using_skill(&self, skill_id: &str) -> Result<Vec<SkillUsage>> {
        let conn = self.db.conn();
        if !skills::skill_exists(conn, skill_id)? {
            return Err(CstError::SkillNotFound(skill_id.to_string()));
        }

        let mut classes: HashMap<String, (Class, Instructor)> = HashMap::new();
        let mut usages = Vec::new();
        for plan in plans::plans_using_skill(conn, skill_id)? {
            let (class, instructor) = match classes.entry(plan.class_id.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(class_with_instructor(conn, &plan)?),
            };
            let positions = plans::positions_of_skill(conn, &plan.id, skill_id)?;
            usages.push(SkillUsage {
                class: class.clone(),
                instructor: instructor.clone(),
                positions,
                plan,
            });
        }
        debug!(skill_id, plans = usages.len(), "loaded skill usage");
        Ok(usages)
    }
}

fn class_with_instructor(conn: &Connection, plan: &ClassPlan) -> Result<(Class, Instructor)> {
    let unreadable = || {
        CstError::MalformedData(format!(
            "class plan '{}' references class '{}' which cannot be loaded",
            plan.id, plan.class_id
        ))
    };
    let class = roster::get_class(conn, &plan.class_id)?.ok_or_else(unreadable)?;
    let instructor = roster::get_instructor(conn, &class.instructor_id)?.ok_or_else(unreadable)?;
    Ok((class, instructor))
}

/// Attach class detail and the ordered skills. Skills are fetched in one batch.
fn hydrate(conn: &Connection, plan: ClassPlan) -> Result<ClassPlanDetail> {
    let class = roster::get_class_detail(conn, &plan.class_id)?.ok_or_else(|| {
        CstError::MalformedData(format!(
            "class plan '{}' references class '{}' which cannot be loaded",
            plan.id, plan.class_id
        ))
    })?;

    let links = plans::links_for_plan(conn, &plan.id)?;
    let ids: Vec<&str> = links.iter().map(|link| link.skill_id.as_str()).collect();
    let by_id: HashMap<String, _> = skills::get_skills_by_ids(conn, &ids)?
        .into_iter()
        .map(|skill| (skill.id.clone(), skill))
        .collect();

    let mut planned = Vec::with_capacity(links.len());
    for link in links {
        match by_id.get(&link.skill_id) {
            Some(skill) => planned.push(PlannedSkill {
                position: link.position,
                skill: skill.clone(),
            }),
            None => warn!(plan_id = %plan.id, skill_id = %link.skill_id, "plan links a missing skill"),
        }
    }

    Ok(ClassPlanDetail {
        plan,
        class,
        skills: planned,
    })
}
