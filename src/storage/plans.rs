//! Class plan rows and their ordered skill links.

use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use crate::core::plan::{ClassPlan, PlanSkillLink};
use crate::error::Result;
use crate::storage::sqlite::{collect_rows, date_time_column, format_date_time};

const PLAN_COLUMNS: &str = "id, title, description, date, week_of_year, duration_minutes, \
                            notes, class_id, created_at, updated_at";

pub fn insert_plan(conn: &Connection, plan: &ClassPlan) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO class_plans ({PLAN_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"),
        params![
            plan.id,
            plan.title,
            plan.description,
            format_date_time(&plan.date),
            plan.week_of_year,
            plan.duration_minutes,
            plan.notes,
            plan.class_id,
            plan.created_at,
            plan.updated_at,
        ],
    )?;
    Ok(())
}

/// Write every mutable column of an existing plan.
pub fn update_plan(conn: &Connection, plan: &ClassPlan) -> Result<usize> {
    let changed = conn.execute(
        "UPDATE class_plans SET
            title = ?, description = ?, date = ?, week_of_year = ?,
            duration_minutes = ?, notes = ?, updated_at = ?
         WHERE id = ?",
        params![
            plan.title,
            plan.description,
            format_date_time(&plan.date),
            plan.week_of_year,
            plan.duration_minutes,
            plan.notes,
            plan.updated_at,
            plan.id,
        ],
    )?;
    Ok(changed)
}

pub fn get_plan(conn: &Connection, id: &str) -> Result<Option<ClassPlan>> {
    let plan = conn
        .query_row(
            &format!("SELECT {PLAN_COLUMNS} FROM class_plans WHERE id = ?"),
            [id],
            plan_from_row,
        )
        .optional()?;
    Ok(plan)
}

/// Delete a plan; its links go with it via `ON DELETE CASCADE`.
pub fn delete_plan(conn: &Connection, id: &str) -> Result<usize> {
    let removed = conn.execute("DELETE FROM class_plans WHERE id = ?", [id])?;
    Ok(removed)
}

/// Plans, newest date first, optionally for one class.
pub fn list_plans(conn: &Connection, class_id: Option<&str>) -> Result<Vec<ClassPlan>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLAN_COLUMNS} FROM class_plans
         WHERE (?1 IS NULL OR class_id = ?1)
         ORDER BY date DESC, created_at DESC"
    ))?;
    let rows = stmt.query_map([class_id], plan_from_row)?;
    collect_rows(rows)
}

/// Plans whose skill list mentions `skill_id`, newest first.
pub fn plans_using_skill(conn: &Connection, skill_id: &str) -> Result<Vec<ClassPlan>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PLAN_COLUMNS} FROM class_plans
         WHERE id IN (SELECT class_plan_id FROM class_plan_skills WHERE skill_id = ?)
         ORDER BY date DESC, created_at DESC"
    ))?;
    let rows = stmt.query_map([skill_id], plan_from_row)?;
    collect_rows(rows)
}

/// Positions `skill_id` holds in one plan, ascending.
pub fn positions_of_skill(conn: &Connection, class_plan_id: &str, skill_id: &str) -> Result<Vec<u32>> {
    let mut stmt = conn.prepare(
        "SELECT position FROM class_plan_skills
         WHERE class_plan_id = ? AND skill_id = ? ORDER BY position",
    )?;
    let rows = stmt.query_map([class_plan_id, skill_id], |row| row.get::<_, u32>(0))?;
    collect_rows(rows)
}

/// Insert one link per entry, positions 1..=n in list order.
pub fn insert_links(
    conn: &Connection,
    class_plan_id: &str,
    skill_ids: &[String],
    now: &str,
) -> Result<Vec<PlanSkillLink>> {
    let mut stmt = conn.prepare(
        "INSERT INTO class_plan_skills (id, class_plan_id, skill_id, position, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )?;
    let mut links = Vec::with_capacity(skill_ids.len());
    for (position, skill_id) in (1u32..).zip(skill_ids) {
        let link = PlanSkillLink {
            id: Uuid::new_v4().to_string(),
            class_plan_id: class_plan_id.to_string(),
            skill_id: skill_id.clone(),
            position,
            created_at: now.to_string(),
        };
        stmt.execute(params![
            link.id,
            link.class_plan_id,
            link.skill_id,
            link.position,
            link.created_at,
        ])?;
        links.push(link);
    }
    Ok(links)
}

pub fn delete_links(conn: &Connection, class_plan_id: &str) -> Result<usize> {
    let removed = conn.execute(
        "DELETE FROM class_plan_skills WHERE class_plan_id = ?",
        [class_plan_id],
    )?;
    Ok(removed)
}

/// Links for a plan ordered by position.
pub fn links_for_plan(conn: &Connection, class_plan_id: &str) -> Result<Vec<PlanSkillLink>> {
    let mut stmt = conn.prepare(
        "SELECT id, class_plan_id, skill_id, position, created_at
         FROM class_plan_skills WHERE class_plan_id = ? ORDER BY position",
    )?;
    let rows = stmt.query_map([class_plan_id], |row| {
        Ok(PlanSkillLink {
            id: row.get(0)?,
            class_plan_id: row.get(1)?,
            skill_id: row.get(2)?,
            position: row.get(3)?,
            created_at: row.get(4)?,
        })
    })?;
    collect_rows(rows)
}

fn plan_from_row(row: &Row<'_>) -> rusqlite::Result<ClassPlan> {
    Ok(ClassPlan {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        date: date_time_column(row, 3)?,
        week_of_year: row.get(4)?,
        duration_minutes: row.get(5)?,
        notes: row.get(6)?,
        class_id: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
