//! Student skill progress rows.

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use crate::core::progress::{ProgressUpdate, StudentSkillProgress};
use crate::error::Result;
use crate::storage::sqlite::{collect_rows, enum_column};

const PROGRESS_COLUMNS: &str =
    "id, student_id, skill_id, status, notes, reason, assessed_by, assessed_at";

/// Set the current assessment for a pair in one statement.
///
/// The UNIQUE(student_id, skill_id) constraint resolves races between
/// writers; the row id of an existing pair is kept.
pub fn upsert_progress(
    conn: &Connection,
    update: &ProgressUpdate,
    assessed_at: &str,
) -> Result<StudentSkillProgress> {
    conn.execute(
        &format!(
            "INSERT INTO student_skill_progress ({PROGRESS_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(student_id, skill_id) DO UPDATE SET
                status=excluded.status,
                notes=excluded.notes,
                reason=excluded.reason,
                assessed_by=excluded.assessed_by,
                assessed_at=excluded.assessed_at"
        ),
        params![
            Uuid::new_v4().to_string(),
            update.student_id,
            update.skill_id,
            update.status.as_str(),
            update.notes,
            update.reason,
            update.assessed_by,
            assessed_at,
        ],
    )?;

    let stored = conn.query_row(
        &format!(
            "SELECT {PROGRESS_COLUMNS} FROM student_skill_progress
             WHERE student_id = ? AND skill_id = ?"
        ),
        params![update.student_id, update.skill_id],
        progress_from_row,
    )?;
    Ok(stored)
}

pub fn get_progress(
    conn: &Connection,
    student_id: &str,
    skill_id: &str,
) -> Result<Option<StudentSkillProgress>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {PROGRESS_COLUMNS} FROM student_skill_progress
                 WHERE student_id = ? AND skill_id = ?"
            ),
            params![student_id, skill_id],
            progress_from_row,
        )
        .optional()?;
    Ok(row)
}

/// All stored rows for one student, keyed by skill id.
pub fn progress_by_skill(
    conn: &Connection,
    student_id: &str,
) -> Result<HashMap<String, StudentSkillProgress>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROGRESS_COLUMNS} FROM student_skill_progress WHERE student_id = ?"
    ))?;
    let rows = stmt.query_map([student_id], progress_from_row)?;
    Ok(collect_rows(rows)?
        .into_iter()
        .map(|row| (row.skill_id.clone(), row))
        .collect())
}

pub fn count_rows_for_pair(conn: &Connection, student_id: &str, skill_id: &str) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM student_skill_progress WHERE student_id = ? AND skill_id = ?",
        params![student_id, skill_id],
        |row| row.get(0),
    )?;
    Ok(u64::try_from(count).unwrap_or(0))
}

fn progress_from_row(row: &Row<'_>) -> rusqlite::Result<StudentSkillProgress> {
    Ok(StudentSkillProgress {
        id: row.get(0)?,
        student_id: row.get(1)?,
        skill_id: row.get(2)?,
        status: enum_column(row, 3)?,
        notes: row.get(4)?,
        reason: row.get(5)?,
        assessed_by: row.get(6)?,
        assessed_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::taxonomy::ProgressStatus;
    use crate::storage::Database;
    use crate::storage::roster::insert_student;
    use crate::storage::skills::insert_skill;
    use crate::test_utils::fixtures;

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        insert_student(db.conn(), &fixtures::student("st1", "Ada")).unwrap();
        insert_skill(db.conn(), &fixtures::skill("s1", &[1])).unwrap();
        db
    }

    #[test]
    fn second_upsert_overwrites_single_row() {
        let db = seeded();
        let conn = db.conn();

        let mut update = ProgressUpdate::new("st1", "s1", ProgressStatus::Attempted);
        update.notes = Some("first go".into());
        let first = upsert_progress(conn, &update, "2024-08-05T10:00:00Z").unwrap();

        let mut update = ProgressUpdate::new("st1", "s1", ProgressStatus::Competent);
        update.assessed_by = Some("Kim".into());
        let second = upsert_progress(conn, &update, "2024-08-12T10:00:00Z").unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.status, ProgressStatus::Competent);
        assert!(second.notes.is_none());
        assert_eq!(second.assessed_by.as_deref(), Some("Kim"));
        assert_eq!(second.assessed_at, "2024-08-12T10:00:00Z");
        assert_eq!(count_rows_for_pair(conn, "st1", "s1").unwrap(), 1);
    }

    #[test]
    fn lookup_by_pair_and_student() {
        let db = seeded();
        let conn = db.conn();
        assert!(get_progress(conn, "st1", "s1").unwrap().is_none());

        upsert_progress(
            conn,
            &ProgressUpdate::new("st1", "s1", ProgressStatus::Mastered),
            "now",
        )
        .unwrap();
        assert!(get_progress(conn, "st1", "s1").unwrap().is_some());
        assert_eq!(progress_by_skill(conn, "st1").unwrap().len(), 1);
        assert!(progress_by_skill(conn, "other").unwrap().is_empty());
    }
}
