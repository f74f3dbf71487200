//! Student, instructor, class and enrollment rows.

use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

use crate::core::roster::{
    Class, ClassDetail, Instructor, Student, encode_apparatus_levels, parse_apparatus_levels,
};
use crate::error::Result;
use crate::storage::sqlite::{collect_rows, date_time_column, enum_column, format_date_time, placeholders};

const STUDENT_COLUMNS: &str = "id, name, email, phone, external_id, created_at";
const INSTRUCTOR_COLUMNS: &str = "id, name, email, phone, external_id, apparatus_levels, created_at";
const CLASS_COLUMNS: &str = "id, name, class_type, apparatus, level, start_at, end_at, \
                             external_id, instructor_id, created_at";

pub fn insert_student(conn: &Connection, student: &Student) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO students ({STUDENT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)"),
        params![
            student.id,
            student.name,
            student.email,
            student.phone,
            student.external_id,
            student.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_student(conn: &Connection, id: &str) -> Result<Option<Student>> {
    let student = conn
        .query_row(
            &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?"),
            [id],
            student_from_row,
        )
        .optional()?;
    Ok(student)
}

pub fn find_student_by_external_id(conn: &Connection, external_id: &str) -> Result<Option<Student>> {
    let student = conn
        .query_row(
            &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE external_id = ?"),
            [external_id],
            student_from_row,
        )
        .optional()?;
    Ok(student)
}

pub fn list_students(conn: &Connection) -> Result<Vec<Student>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students ORDER BY name, id"
    ))?;
    let rows = stmt.query_map([], student_from_row)?;
    collect_rows(rows)
}

/// Ids from `ids` that exist, fetched in one statement.
pub fn existing_student_ids(conn: &Connection, ids: &[&str]) -> Result<Vec<String>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut stmt = conn.prepare(&format!(
        "SELECT id FROM students WHERE id IN ({})",
        placeholders(ids.len())
    ))?;
    let rows = stmt.query_map(params_from_iter(ids.iter()), |row| row.get(0))?;
    collect_rows(rows)
}

pub fn insert_instructor(conn: &Connection, instructor: &Instructor) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO instructors ({INSTRUCTOR_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"),
        params![
            instructor.id,
            instructor.name,
            instructor.email,
            instructor.phone,
            instructor.external_id,
            encode_apparatus_levels(&instructor.apparatus_levels),
            instructor.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_instructor(conn: &Connection, id: &str) -> Result<Option<Instructor>> {
    let instructor = conn
        .query_row(
            &format!("SELECT {INSTRUCTOR_COLUMNS} FROM instructors WHERE id = ?"),
            [id],
            instructor_from_row,
        )
        .optional()?;
    Ok(instructor)
}

pub fn find_instructor_by_external_id(
    conn: &Connection,
    external_id: &str,
) -> Result<Option<Instructor>> {
    let instructor = conn
        .query_row(
            &format!("SELECT {INSTRUCTOR_COLUMNS} FROM instructors WHERE external_id = ?"),
            [external_id],
            instructor_from_row,
        )
        .optional()?;
    Ok(instructor)
}

pub fn list_instructors(conn: &Connection) -> Result<Vec<Instructor>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {INSTRUCTOR_COLUMNS} FROM instructors ORDER BY name, id"
    ))?;
    let rows = stmt.query_map([], instructor_from_row)?;
    collect_rows(rows)
}

pub fn insert_class(conn: &Connection, class: &Class) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO classes ({CLASS_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"),
        params![
            class.id,
            class.name,
            class.class_type.as_str(),
            class.apparatus.as_str(),
            class.level.as_str(),
            format_date_time(&class.start_at),
            format_date_time(&class.end_at),
            class.external_id,
            class.instructor_id,
            class.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_class(conn: &Connection, id: &str) -> Result<Option<Class>> {
    let class = conn
        .query_row(
            &format!("SELECT {CLASS_COLUMNS} FROM classes WHERE id = ?"),
            [id],
            class_from_row,
        )
        .optional()?;
    Ok(class)
}

pub fn class_exists(conn: &Connection, id: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM classes WHERE id = ?", [id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

pub fn list_classes(conn: &Connection) -> Result<Vec<Class>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CLASS_COLUMNS} FROM classes ORDER BY start_at, name"
    ))?;
    let rows = stmt.query_map([], class_from_row)?;
    collect_rows(rows)
}

/// Returns false when the student was already enrolled.
pub fn enroll(conn: &Connection, class_id: &str, student_id: &str) -> Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO class_enrollments (class_id, student_id) VALUES (?, ?)",
        params![class_id, student_id],
    )?;
    Ok(inserted > 0)
}

pub fn unenroll(conn: &Connection, class_id: &str, student_id: &str) -> Result<bool> {
    let removed = conn.execute(
        "DELETE FROM class_enrollments WHERE class_id = ? AND student_id = ?",
        params![class_id, student_id],
    )?;
    Ok(removed > 0)
}

pub fn enrolled_students(conn: &Connection, class_id: &str) -> Result<Vec<Student>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.name, s.email, s.phone, s.external_id, s.created_at
         FROM class_enrollments e
         JOIN students s ON s.id = e.student_id
         WHERE e.class_id = ?
         ORDER BY s.name, s.id",
    )?;
    let rows = stmt.query_map([class_id], student_from_row)?;
    collect_rows(rows)
}

/// Class with instructor and enrolled students, or `None` if the class is absent.
pub fn get_class_detail(conn: &Connection, id: &str) -> Result<Option<ClassDetail>> {
    let Some(class) = get_class(conn, id)? else {
        return Ok(None);
    };
    let Some(instructor) = get_instructor(conn, &class.instructor_id)? else {
        tracing::warn!(class_id = id, instructor_id = %class.instructor_id, "class references a missing instructor");
        return Ok(None);
    };
    let students = enrolled_students(conn, id)?;
    Ok(Some(ClassDetail {
        class,
        instructor,
        students,
    }))
}

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        external_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn instructor_from_row(row: &Row<'_>) -> rusqlite::Result<Instructor> {
    let levels_raw: Option<String> = row.get(5)?;
    Ok(Instructor {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        external_id: row.get(4)?,
        apparatus_levels: parse_apparatus_levels(levels_raw.as_deref()),
        created_at: row.get(6)?,
    })
}

fn class_from_row(row: &Row<'_>) -> rusqlite::Result<Class> {
    Ok(Class {
        id: row.get(0)?,
        name: row.get(1)?,
        class_type: enum_column(row, 2)?,
        apparatus: enum_column(row, 3)?,
        level: enum_column(row, 4)?,
        start_at: date_time_column(row, 5)?,
        end_at: date_time_column(row, 6)?,
        external_id: row.get(7)?,
        instructor_id: row.get(8)?,
        created_at: row.get(9)?,
    })
}
