//! Skill records and the inputs used to create them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::taxonomy::{Apparatus, Level};
use crate::core::weeks::WeekSet;

/// A named unit of aerial technique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    /// Foundational skill expected of every student at this level.
    pub core: bool,
    pub apparatus: Apparatus,
    pub level: Level,
    /// Levels where the skill is taught; may differ from `level`.
    pub taught_in: Vec<Level>,
    pub applicable_weeks: WeekSet,
    pub notes: String,
    pub cues: String,
    pub parent_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Skill {
    /// Bare skill with no links, weeks or timestamps.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        apparatus: Apparatus,
        level: Level,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            core: false,
            apparatus,
            level,
            taught_in: Vec::new(),
            applicable_weeks: WeekSet::new(),
            notes: String::new(),
            cues: String::new(),
            parent_id: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[must_use]
    pub fn with_weeks(mut self, weeks: WeekSet) -> Self {
        self.applicable_weeks = weeks;
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Catalog order: apparatus, then level, then name.
    #[must_use]
    pub fn catalog_cmp(&self, other: &Self) -> Ordering {
        self.apparatus
            .cmp(&other.apparatus)
            .then(self.level.cmp(&other.level))
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Stable sort into catalog order.
pub fn sort_catalog(skills: &mut [Skill]) {
    skills.sort_by(Skill::catalog_cmp);
}

/// Input for creating a skill. Links are resolved separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSkill {
    /// Caller-supplied id; a UUID is generated when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub core: bool,
    pub apparatus: Apparatus,
    pub level: Level,
    #[serde(default)]
    pub taught_in: Vec<Level>,
    /// `None` means "use the configured default weeks".
    #[serde(default)]
    pub applicable_weeks: Option<Vec<u32>>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub cues: String,
}

/// Narrowing applied to catalog queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillFilter {
    pub apparatus: Option<Apparatus>,
    pub level: Option<Level>,
}

impl SkillFilter {
    #[must_use]
    pub const fn new(apparatus: Option<Apparatus>, level: Option<Level>) -> Self {
        Self { apparatus, level }
    }

    #[must_use]
    pub fn matches(&self, skill: &Skill) -> bool {
        self.apparatus.is_none_or(|a| a == skill.apparatus)
            && self.level.is_none_or(|l| l == skill.level)
    }
}
