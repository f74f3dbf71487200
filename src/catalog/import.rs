//! Bulk catalog import in three passes.
//!
//! Pass 1 writes every skill row with no links, pass 2 sets parents and
//! pass 3 adds sibling edges. Because every row exists before any link is
//! written, entries may name parents and siblings that appear later in the
//! file. All passes share one transaction.
//!
//! Accepted files are YAML or JSON: either a list of skills or a mapping
//! with a `skills` list. Field names may be snake_case or camelCase.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::{SkillCatalog, load_graph};
use crate::config::CatalogConfig;
use crate::core::skill::NewSkill;
use crate::core::taxonomy::{Apparatus, Level};
use crate::error::{CstError, Result};
use crate::storage::{Database, now_timestamp, skills};

/// One catalog entry as written in an import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSkill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub core: bool,
    pub apparatus: Apparatus,
    pub level: Level,
    #[serde(default, alias = "taughtIn")]
    pub taught_in: Vec<Level>,
    #[serde(default, alias = "applicableWeeks", alias = "weeks")]
    pub applicable_weeks: Option<Vec<u32>>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub cues: String,
    #[serde(default, alias = "parentId", alias = "parent")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub siblings: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<ImportSkill>),
    Wrapped { skills: Vec<ImportSkill> },
}

/// Outcome of an import. Unresolvable links are skipped and listed in `warnings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub parents_linked: usize,
    pub siblings_linked: usize,
    pub warnings: Vec<String>,
}

/// Read a catalog file and import it.
pub fn import_catalog(db: &Database, path: &Path, config: &CatalogConfig) -> Result<ImportReport> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| CstError::Import(format!("read {}: {err}", path.display())))?;
    let entries = parse_catalog(path, &raw)?;
    info!(path = %path.display(), entries = entries.len(), "importing catalog");
    import_entries(db, entries, config)
}

fn parse_catalog(path: &Path, raw: &str) -> Result<Vec<ImportSkill>> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let file: CatalogFile = if is_json {
        serde_json::from_str(raw)
            .map_err(|err| CstError::Import(format!("parse {}: {err}", path.display())))?
    } else {
        serde_yaml::from_str(raw)
            .map_err(|err| CstError::Import(format!("parse {}: {err}", path.display())))?
    };
    Ok(match file {
        CatalogFile::List(skills) | CatalogFile::Wrapped { skills } => skills,
    })
}

/// Import already-parsed entries.
pub fn import_entries(
    db: &Database,
    entries: Vec<ImportSkill>,
    config: &CatalogConfig,
) -> Result<ImportReport> {
    check_unique_ids(&entries)?;
    let builder = SkillCatalog::with_config(db, config.clone());

    let report = db.with_transaction(|tx| {
        let mut report = ImportReport::default();
        let now = now_timestamp();

        // Pass 1: rows only.
        for entry in &entries {
            let mut skill = builder
                .build_skill(NewSkill {
                    id: Some(entry.id.clone()),
                    name: entry.name.clone(),
                    core: entry.core,
                    apparatus: entry.apparatus,
                    level: entry.level,
                    taught_in: entry.taught_in.clone(),
                    applicable_weeks: entry.applicable_weeks.clone(),
                    notes: entry.notes.clone(),
                    cues: entry.cues.clone(),
                })
                .map_err(|err| CstError::Import(format!("skill '{}': {err}", entry.id)))?;
            skill.created_at.clone_from(&now);
            skill.updated_at.clone_from(&now);

            if skills::skill_exists(tx, &skill.id)? {
                report.updated += 1;
            } else {
                report.created += 1;
            }
            skills::upsert_skill(tx, &skill)?;
        }

        // Pass 2: parents, guarded against loops.
        let mut graph = load_graph(tx)?;
        for entry in &entries {
            let Some(parent_id) = entry.parent_id.as_deref() else {
                continue;
            };
            if !graph.contains(parent_id) {
                report.warnings.push(format!(
                    "skill '{}': parent '{parent_id}' not found, link skipped",
                    entry.id
                ));
                continue;
            }
            if let Some(cycle) = graph.detect_parent_cycle(&entry.id, parent_id) {
                report.warnings.push(format!(
                    "skill '{}': parent '{parent_id}' would form a loop ({}), link skipped",
                    entry.id,
                    cycle.join(" -> ")
                ));
                continue;
            }
            skills::set_parent(tx, &entry.id, Some(parent_id), &now)?;
            graph.set_parent(&entry.id, Some(parent_id));
            report.parents_linked += 1;
        }

        // Pass 3: sibling edges.
        for entry in &entries {
            for sibling in &entry.siblings {
                if sibling == &entry.id {
                    report
                        .warnings
                        .push(format!("skill '{}': lists itself as a sibling, skipped", entry.id));
                    continue;
                }
                if !graph.contains(sibling) {
                    report.warnings.push(format!(
                        "skill '{}': sibling '{sibling}' not found, link skipped",
                        entry.id
                    ));
                    continue;
                }
                report.siblings_linked += usize::from(skills::add_sibling(tx, &entry.id, sibling)?);
                if config.symmetric_siblings {
                    report.siblings_linked +=
                        usize::from(skills::add_sibling(tx, sibling, &entry.id)?);
                }
            }
        }

        Ok(report)
    })?;

    for warning in &report.warnings {
        warn!("{warning}");
    }
    info!(
        created = report.created,
        updated = report.updated,
        parents = report.parents_linked,
        siblings = report.siblings_linked,
        "catalog import complete"
    );
    Ok(report)
}

fn check_unique_ids(entries: &[ImportSkill]) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        if entry.id.trim().is_empty() {
            return Err(CstError::Import(format!(
                "skill '{}' has an empty id; imports need explicit ids",
                entry.name
            )));
        }
        if !seen.insert(entry.id.as_str()) {
            return Err(CstError::Import(format!("duplicate skill id '{}'", entry.id)));
        }
    }
    Ok(())
}
