//! Class plans and their ordered skill lists.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::roster::{Class, ClassDetail, Instructor};
use crate::core::skill::Skill;
use crate::error::{CstError, Result};

/// A single dated lesson for one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPlan {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    /// Derived from `date`; recomputed whenever the date changes.
    pub week_of_year: u32,
    pub duration_minutes: u32,
    pub notes: Option<String>,
    pub class_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// One row of a plan's skill list. Positions are dense from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSkillLink {
    pub id: String,
    pub class_plan_id: String,
    pub skill_id: String,
    pub position: u32,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSkill {
    pub position: u32,
    pub skill: Skill,
}

/// A plan with its class (instructor and students) and skills in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPlanDetail {
    #[serde(flatten)]
    pub plan: ClassPlan,
    pub class: ClassDetail,
    pub skills: Vec<PlannedSkill>,
}

impl ClassPlanDetail {
    pub fn skill_ids(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|planned| planned.skill.id.as_str())
    }
}

/// Where one skill is taught: a plan, its class and instructor, and the
/// positions the skill holds in that plan's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillUsage {
    #[serde(flatten)]
    pub plan: ClassPlan,
    pub class: Class,
    pub instructor: Instructor,
    pub positions: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClassPlan {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub duration_minutes: u32,
    pub class_id: String,
    /// Order is meaningful. Each skill may appear once.
    pub skill_ids: Vec<String>,
    pub notes: Option<String>,
}

impl NewClassPlan {
    pub fn validate(&self) -> Result<()> {
        validate_duration(self.duration_minutes)?;
        if self.skill_ids.is_empty() {
            return Err(CstError::ValidationFailed(
                "a class plan needs at least one skill".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPlanUpdate {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub duration_minutes: Option<u32>,
    pub notes: Option<String>,
    /// Replaces the whole skill list, even when identical. Empty clears it.
    pub skill_ids: Option<Vec<String>>,
}

impl ClassPlanUpdate {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(duration) = self.duration_minutes {
            validate_duration(duration)?;
        }
        Ok(())
    }

    /// True when no field would change.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.duration_minutes.is_none()
            && self.notes.is_none()
            && self.skill_ids.is_none()
    }
}

fn validate_duration(minutes: u32) -> Result<()> {
    if minutes == 0 {
        return Err(CstError::ValidationFailed(
            "duration must be a positive number of minutes".to_string(),
        ));
    }
    Ok(())
}
