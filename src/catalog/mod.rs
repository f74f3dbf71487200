//! Skill catalog: listing, week suggestions and graph links.
//!
//! Links are a separate step from creation, so a skill may be created
//! before the parent or siblings it will point at.

pub mod import;

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::CatalogConfig;
use crate::core::graph::{SkillGraph, TreeNode};
use crate::core::skill::{NewSkill, Skill, SkillFilter};
use crate::core::weeks::{self, WeekSet};
use crate::error::{CstError, Result};
use crate::storage::{Database, now_timestamp, skills};

pub use import::{ImportReport, ImportSkill, import_catalog, import_entries};

/// Skills due for a calendar date, with the week the date falls in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekSuggestion {
    pub week_of_year: u32,
    pub skills: Vec<Skill>,
}

pub struct SkillCatalog<'a> {
    db: &'a Database,
    config: CatalogConfig,
}

impl<'a> SkillCatalog<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self::with_config(db, CatalogConfig::default())
    }

    pub const fn with_config(db: &'a Database, config: CatalogConfig) -> Self {
        Self { db, config }
    }

    pub fn list_skills(&self, filter: SkillFilter) -> Result<Vec<Skill>> {
        debug!(?filter, "listing skills");
        skills::list_skills(self.db.conn(), filter)
    }

    pub fn get_skill(&self, id: &str) -> Result<Option<Skill>> {
        skills::get_skill(self.db.conn(), id)
    }

    pub fn get_required(&self, id: &str) -> Result<Skill> {
        self.get_skill(id)?
            .ok_or_else(|| CstError::SkillNotFound(id.to_string()))
    }

    /// Catalog skills whose applicable weeks contain `week`, in catalog order.
    pub fn suggest_for_week(&self, week: u32, filter: SkillFilter) -> Result<Vec<Skill>> {
        let week = weeks::validate_week(week)?;
        let catalog = self.list_skills(filter)?;
        let total = catalog.len();
        let due = weeks::filter_for_week(catalog, week);
        debug!(week, total, due = due.len(), "filtered catalog by week");
        Ok(due)
    }

    pub fn suggest_for_date(&self, date: NaiveDateTime, filter: SkillFilter) -> Result<WeekSuggestion> {
        let week_of_year = weeks::week_of_year(date);
        let skills = self.suggest_for_week(week_of_year, filter)?;
        Ok(WeekSuggestion {
            week_of_year,
            skills,
        })
    }

    /// Replace a skill's applicable weeks with exactly `weeks`.
    pub fn update_applicable_weeks(&self, id: &str, weeks: &[u32]) -> Result<Skill> {
        let set = weeks::validate_weeks(weeks)?;
        let changed = skills::update_weeks(self.db.conn(), id, &set, &now_timestamp())?;
        if changed == 0 {
            return Err(CstError::SkillNotFound(id.to_string()));
        }
        info!(skill_id = id, weeks = %set, "updated applicable weeks");
        self.get_required(id)
    }

    /// Insert a skill with no parent or sibling links.
    pub fn create_skill(&self, input: NewSkill) -> Result<Skill> {
        let skill = self.build_skill(input)?;
        if skills::skill_exists(self.db.conn(), &skill.id)? {
            return Err(CstError::ValidationFailed(format!(
                "skill '{}' already exists",
                skill.id
            )));
        }
        skills::insert_skill(self.db.conn(), &skill)?;
        info!(skill_id = %skill.id, name = %skill.name, "created skill");
        Ok(skill)
    }

    pub(crate) fn build_skill(&self, input: NewSkill) -> Result<Skill> {
        if input.name.trim().is_empty() {
            return Err(CstError::ValidationFailed("skill name must not be empty".to_string()));
        }
        let applicable_weeks: WeekSet = match &input.applicable_weeks {
            Some(weeks) => weeks::validate_weeks(weeks)?,
            None => weeks::validate_weeks(&self.config.default_weeks)?,
        };
        let now = now_timestamp();
        Ok(Skill {
            id: input
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: input.name,
            core: input.core,
            apparatus: input.apparatus,
            level: input.level,
            taught_in: input.taught_in,
            applicable_weeks,
            notes: input.notes,
            cues: input.cues,
            parent_id: None,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Make `parent_id` the prerequisite of `child_id`.
    ///
    /// Fails with `CyclicParent` if the parent is already a descendant.
    pub fn link_parent(&self, child_id: &str, parent_id: &str) -> Result<Skill> {
        self.db.with_transaction(|tx| {
            for id in [child_id, parent_id] {
                if !skills::skill_exists(tx, id)? {
                    return Err(CstError::SkillNotFound(id.to_string()));
                }
            }
            let graph = load_graph(tx)?;
            if let Some(cycle) = graph.detect_parent_cycle(child_id, parent_id) {
                return Err(CstError::CyclicParent {
                    skill_id: child_id.to_string(),
                    cycle,
                });
            }
            skills::set_parent(tx, child_id, Some(parent_id), &now_timestamp())?;
            Ok(())
        })?;
        info!(child_id, parent_id, "linked parent");
        self.get_required(child_id)
    }

    pub fn clear_parent(&self, child_id: &str) -> Result<Skill> {
        let changed = skills::set_parent(self.db.conn(), child_id, None, &now_timestamp())?;
        if changed == 0 {
            return Err(CstError::SkillNotFound(child_id.to_string()));
        }
        info!(child_id, "cleared parent");
        self.get_required(child_id)
    }

    /// Add directed sibling edges from `skill_id`. Returns edges newly written.
    ///
    /// With `symmetric_siblings` configured, reverse edges are written too.
    pub fn link_siblings(&self, skill_id: &str, sibling_ids: &[String]) -> Result<usize> {
        if sibling_ids.iter().any(|id| id == skill_id) {
            return Err(CstError::ValidationFailed(format!(
                "skill '{skill_id}' cannot be its own sibling"
            )));
        }
        let symmetric = self.config.symmetric_siblings;
        let added = self.db.with_transaction(|tx| {
            if !skills::skill_exists(tx, skill_id)? {
                return Err(CstError::SkillNotFound(skill_id.to_string()));
            }
            ensure_skills_exist(tx, sibling_ids)?;

            let mut added = 0;
            for sibling in sibling_ids {
                added += usize::from(skills::add_sibling(tx, skill_id, sibling)?);
                if symmetric {
                    added += usize::from(skills::add_sibling(tx, sibling, skill_id)?);
                }
            }
            Ok(added)
        })?;
        info!(skill_id, added, symmetric, "linked siblings");
        Ok(added)
    }

    /// Remove one sibling edge (and its reverse when symmetric).
    pub fn unlink_sibling(&self, skill_id: &str, sibling_id: &str) -> Result<bool> {
        let conn = self.db.conn();
        let mut removed = skills::remove_sibling(conn, skill_id, sibling_id)?;
        if self.config.symmetric_siblings {
            removed |= skills::remove_sibling(conn, sibling_id, skill_id)?;
        }
        Ok(removed)
    }

    pub fn children(&self, id: &str) -> Result<Vec<Skill>> {
        self.get_required(id)?;
        skills::children(self.db.conn(), id)
    }

    /// Outgoing sibling edges only.
    pub fn siblings(&self, id: &str) -> Result<Vec<Skill>> {
        self.get_required(id)?;
        skills::siblings(self.db.conn(), id)
    }

    pub fn graph(&self) -> Result<SkillGraph> {
        load_graph(self.db.conn())
    }

    /// Prerequisite tree under `root`, or the whole forest when `None`.
    pub fn tree(&self, root: Option<&str>) -> Result<Vec<TreeNode>> {
        let graph = self.graph()?;
        match root {
            Some(id) => graph
                .tree(id)
                .map(|node| vec![node])
                .ok_or_else(|| CstError::SkillNotFound(id.to_string())),
            None => Ok(graph.forest()),
        }
    }
}

pub(crate) fn load_graph(conn: &rusqlite::Connection) -> Result<SkillGraph> {
    let catalog = skills::list_skills(conn, SkillFilter::default())?;
    let edges = skills::sibling_edges(conn)?;
    Ok(SkillGraph::from_parts(&catalog, edges))
}

/// Fail with `MissingReferences` unless every distinct id names a skill.
///
/// One batch query; missing ids are reported in request order.
pub(crate) fn ensure_skills_exist(conn: &rusqlite::Connection, ids: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    let distinct: Vec<&str> = ids
        .iter()
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .collect();

    let found: HashSet<String> = skills::get_skills_by_ids(conn, &distinct)?
        .into_iter()
        .map(|skill| skill.id)
        .collect();
    if found.len() == distinct.len() {
        return Ok(());
    }

    let missing: Vec<String> = distinct
        .into_iter()
        .filter(|id| !found.contains(*id))
        .map(ToString::to_string)
        .collect();
    Err(CstError::MissingReferences {
        entity: "skills".to_string(),
        missing,
    })
}

/// Fail with `MissingReferences` unless the batch lookup returns one row per
/// requested id.
///
/// Repeats are not collapsed: a list naming a skill twice resolves fewer rows
/// than it requested. `missing` holds unknown ids, then repeated ids, each in
/// request order.
pub(crate) fn ensure_skill_list_resolves(conn: &rusqlite::Connection, ids: &[String]) -> Result<()> {
    let requested: Vec<&str> = ids.iter().map(String::as_str).collect();
    let found: HashSet<String> = skills::get_skills_by_ids(conn, &requested)?
        .into_iter()
        .map(|skill| skill.id)
        .collect();
    if found.len() == ids.len() {
        return Ok(());
    }

    let mut seen = HashSet::new();
    let mut unknown = Vec::new();
    let mut repeated = Vec::new();
    for id in requested {
        if !found.contains(id) {
            if seen.insert(id) {
                unknown.push(id.to_string());
            }
        } else if !seen.insert(id) && !repeated.iter().any(|r| r == id) {
            repeated.push(id.to_string());
        }
    }
    unknown.extend(repeated);
    debug!(requested = ids.len(), found = found.len(), "skill list does not resolve");
    Err(CstError::MissingReferences {
        entity: "skills".to_string(),
        missing: unknown,
    })
}
