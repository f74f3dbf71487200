//! Skill rows, parent links and sibling edges.

use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

use crate::core::skill::{Skill, SkillFilter, sort_catalog};
use crate::core::taxonomy::{format_level_list, parse_level_list};
use crate::core::weeks::{WeekSet, applicable_weeks_or_empty};
use crate::error::Result;
use crate::storage::sqlite::{collect_rows, enum_column, placeholders};

const SKILL_COLUMNS: &str = "id, name, core, apparatus, level, taught_in, applicable_weeks, \
                             notes, cues, parent_id, created_at, updated_at";

pub fn insert_skill(conn: &Connection, skill: &Skill) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO skills ({SKILL_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ),
        params![
            skill.id,
            skill.name,
            skill.core,
            skill.apparatus.as_str(),
            skill.level.as_str(),
            format_level_list(&skill.taught_in),
            skill.applicable_weeks.to_json(),
            skill.notes,
            skill.cues,
            skill.parent_id,
            skill.created_at,
            skill.updated_at,
        ],
    )?;
    Ok(())
}

/// Insert or refresh a skill's own fields. Links and `created_at` are kept.
pub fn upsert_skill(conn: &Connection, skill: &Skill) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO skills ({SKILL_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name=excluded.name,
                core=excluded.core,
                apparatus=excluded.apparatus,
                level=excluded.level,
                taught_in=excluded.taught_in,
                applicable_weeks=excluded.applicable_weeks,
                notes=excluded.notes,
                cues=excluded.cues,
                updated_at=excluded.updated_at"
        ),
        params![
            skill.id,
            skill.name,
            skill.core,
            skill.apparatus.as_str(),
            skill.level.as_str(),
            format_level_list(&skill.taught_in),
            skill.applicable_weeks.to_json(),
            skill.notes,
            skill.cues,
            skill.created_at,
            skill.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_skill(conn: &Connection, id: &str) -> Result<Option<Skill>> {
    let skill = conn
        .query_row(
            &format!("SELECT {SKILL_COLUMNS} FROM skills WHERE id = ?"),
            [id],
            skill_from_row,
        )
        .optional()?;
    Ok(skill)
}

pub fn skill_exists(conn: &Connection, id: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM skills WHERE id = ?", [id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

/// Catalog listing in apparatus, level, name order.
pub fn list_skills(conn: &Connection, filter: SkillFilter) -> Result<Vec<Skill>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SKILL_COLUMNS} FROM skills
         WHERE (?1 IS NULL OR apparatus = ?1) AND (?2 IS NULL OR level = ?2)"
    ))?;
    let rows = stmt.query_map(
        params![
            filter.apparatus.map(|a| a.as_str()),
            filter.level.map(|l| l.as_str()),
        ],
        skill_from_row,
    )?;
    let mut skills = collect_rows(rows)?;
    sort_catalog(&mut skills);
    Ok(skills)
}

/// Fetch many skills in one statement. Unknown ids are simply absent.
pub fn get_skills_by_ids(conn: &Connection, ids: &[&str]) -> Result<Vec<Skill>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut stmt = conn.prepare(&format!(
        "SELECT {SKILL_COLUMNS} FROM skills WHERE id IN ({})",
        placeholders(ids.len())
    ))?;
    let rows = stmt.query_map(params_from_iter(ids.iter()), skill_from_row)?;
    collect_rows(rows)
}

/// Overwrite the full applicable-weeks set. Returns rows touched.
pub fn update_weeks(conn: &Connection, id: &str, weeks: &WeekSet, now: &str) -> Result<usize> {
    let changed = conn.execute(
        "UPDATE skills SET applicable_weeks = ?, updated_at = ? WHERE id = ?",
        params![weeks.to_json(), now, id],
    )?;
    Ok(changed)
}

pub fn set_parent(conn: &Connection, id: &str, parent_id: Option<&str>, now: &str) -> Result<usize> {
    let changed = conn.execute(
        "UPDATE skills SET parent_id = ?, updated_at = ? WHERE id = ?",
        params![parent_id, now, id],
    )?;
    Ok(changed)
}

/// Add one directed sibling edge. Returns false when it already existed.
pub fn add_sibling(conn: &Connection, skill_id: &str, sibling_id: &str) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO skill_siblings (skill_id, sibling_id) VALUES (?, ?)",
        params![skill_id, sibling_id],
    )?;
    Ok(inserted > 0)
}

pub fn remove_sibling(conn: &Connection, skill_id: &str, sibling_id: &str) -> Result<bool> {
    let removed = conn.execute(
        "DELETE FROM skill_siblings WHERE skill_id = ? AND sibling_id = ?",
        params![skill_id, sibling_id],
    )?;
    Ok(removed > 0)
}

/// Skills whose parent is `id`, in catalog order.
pub fn children(conn: &Connection, id: &str) -> Result<Vec<Skill>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SKILL_COLUMNS} FROM skills WHERE parent_id = ?"
    ))?;
    let rows = stmt.query_map([id], skill_from_row)?;
    let mut skills = collect_rows(rows)?;
    sort_catalog(&mut skills);
    Ok(skills)
}

/// Targets of `id`'s outgoing sibling edges, in catalog order.
pub fn siblings(conn: &Connection, id: &str) -> Result<Vec<Skill>> {
    let columns = SKILL_COLUMNS
        .split(", ")
        .map(|c| format!("s.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT {columns} FROM skill_siblings e
         JOIN skills s ON s.id = e.sibling_id
         WHERE e.skill_id = ?"
    ))?;
    let rows = stmt.query_map([id], skill_from_row)?;
    let mut skills = collect_rows(rows)?;
    sort_catalog(&mut skills);
    Ok(skills)
}

/// Every directed sibling edge as `(skill_id, sibling_id)`.
pub fn sibling_edges(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt =
        conn.prepare("SELECT skill_id, sibling_id FROM skill_siblings ORDER BY skill_id, rowid")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    collect_rows(rows)
}

pub fn count_skills(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM skills", [], |row| row.get(0))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

pub(crate) fn skill_from_row(row: &Row<'_>) -> rusqlite::Result<Skill> {
    let id: String = row.get(0)?;
    let taught_raw: String = row.get(5)?;
    let weeks_raw: Option<String> = row.get(6)?;

    let (taught_in, rejected) = parse_level_list(&taught_raw);
    if !rejected.is_empty() {
        tracing::warn!(skill_id = %id, ?rejected, "ignoring unknown taught-in levels");
    }
    let applicable_weeks = applicable_weeks_or_empty(&id, weeks_raw.as_deref());

    Ok(Skill {
        name: row.get(1)?,
        core: row.get(2)?,
        apparatus: enum_column(row, 3)?,
        level: enum_column(row, 4)?,
        taught_in,
        applicable_weeks,
        notes: row.get(7)?,
        cues: row.get(8)?,
        parent_id: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
        id,
    })
}
