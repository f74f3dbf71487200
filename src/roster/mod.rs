//! Students, instructors and classes.

use std::collections::HashSet;

use tracing::info;
use uuid::Uuid;

use crate::core::roster::{
    Class, ClassDetail, Instructor, NewClass, NewInstructor, NewStudent, Student,
};
use crate::error::{CstError, Result};
use crate::storage::{Database, now_timestamp, roster};

pub struct Roster<'a> {
    db: &'a Database,
}

impl<'a> Roster<'a> {
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn create_student(&self, input: NewStudent) -> Result<Student> {
        require_name(&input.name, "student")?;
        let external_id = normalize_external_id(input.external_id);
        if let Some(ext) = external_id.as_deref() {
            if roster::find_student_by_external_id(self.db.conn(), ext)?.is_some() {
                return Err(CstError::ValidationFailed(format!(
                    "a student with external id '{ext}' already exists"
                )));
            }
        }

        let student = Student {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            email: input.email,
            phone: input.phone,
            external_id,
            created_at: now_timestamp(),
        };
        roster::insert_student(self.db.conn(), &student)?;
        info!(student_id = %student.id, name = %student.name, "created student");
        Ok(student)
    }

    pub fn create_instructor(&self, input: NewInstructor) -> Result<Instructor> {
        require_name(&input.name, "instructor")?;
        let external_id = normalize_external_id(input.external_id);
        if let Some(ext) = external_id.as_deref() {
            if roster::find_instructor_by_external_id(self.db.conn(), ext)?.is_some() {
                return Err(CstError::ValidationFailed(format!(
                    "an instructor with external id '{ext}' already exists"
                )));
            }
        }

        let instructor = Instructor {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            email: input.email,
            phone: input.phone,
            external_id,
            apparatus_levels: input.apparatus_levels,
            created_at: now_timestamp(),
        };
        roster::insert_instructor(self.db.conn(), &instructor)?;
        info!(instructor_id = %instructor.id, name = %instructor.name, "created instructor");
        Ok(instructor)
    }

    /// Create a class and enroll its students in one transaction.
    pub fn create_class(&self, input: NewClass) -> Result<ClassDetail> {
        require_name(&input.name, "class")?;
        if input.end_at <= input.start_at {
            return Err(CstError::ValidationFailed(
                "class must end after it starts".to_string(),
            ));
        }

        let id = self.db.with_transaction(|tx| {
            if roster::get_instructor(tx, &input.instructor_id)?.is_none() {
                return Err(CstError::InstructorNotFound(input.instructor_id.clone()));
            }

            let mut seen = HashSet::new();
            let distinct: Vec<&str> = input
                .student_ids
                .iter()
                .map(String::as_str)
                .filter(|id| seen.insert(*id))
                .collect();
            let found: HashSet<String> = roster::existing_student_ids(tx, &distinct)?
                .into_iter()
                .collect();
            let missing: Vec<String> = distinct
                .iter()
                .filter(|id| !found.contains(**id))
                .map(ToString::to_string)
                .collect();
            if !missing.is_empty() {
                return Err(CstError::MissingReferences {
                    entity: "students".to_string(),
                    missing,
                });
            }

            let class = Class {
                id: Uuid::new_v4().to_string(),
                name: input.name.trim().to_string(),
                class_type: input.class_type,
                apparatus: input.apparatus,
                level: input.level,
                start_at: input.start_at,
                end_at: input.end_at,
                external_id: normalize_external_id(input.external_id.clone()),
                instructor_id: input.instructor_id.clone(),
                created_at: now_timestamp(),
            };
            roster::insert_class(tx, &class)?;
            for student_id in &distinct {
                roster::enroll(tx, &class.id, student_id)?;
            }
            Ok(class.id)
        })?;

        info!(class_id = %id, students = input.student_ids.len(), "created class");
        self.get_required_class(&id)
    }

    pub fn list_students(&self) -> Result<Vec<Student>> {
        roster::list_students(self.db.conn())
    }

    pub fn list_instructors(&self) -> Result<Vec<Instructor>> {
        roster::list_instructors(self.db.conn())
    }

    pub fn list_classes(&self) -> Result<Vec<Class>> {
        roster::list_classes(self.db.conn())
    }

    pub fn get_student(&self, id: &str) -> Result<Option<Student>> {
        roster::get_student(self.db.conn(), id)
    }

    pub fn get_required_student(&self, id: &str) -> Result<Student> {
        self.get_student(id)?
            .ok_or_else(|| CstError::StudentNotFound(id.to_string()))
    }

    /// External ids are matched verbatim; `00042` and `42` are different members.
    pub fn find_student_by_external_id(&self, external_id: &str) -> Result<Option<Student>> {
        roster::find_student_by_external_id(self.db.conn(), external_id)
    }

    pub fn get_class(&self, id: &str) -> Result<Option<ClassDetail>> {
        roster::get_class_detail(self.db.conn(), id)
    }

    pub fn get_required_class(&self, id: &str) -> Result<ClassDetail> {
        self.get_class(id)?
            .ok_or_else(|| CstError::ClassNotFound(id.to_string()))
    }

    /// Returns false when the student was already enrolled.
    pub fn enroll(&self, class_id: &str, student_id: &str) -> Result<bool> {
        let conn = self.db.conn();
        if !roster::class_exists(conn, class_id)? {
            return Err(CstError::ClassNotFound(class_id.to_string()));
        }
        self.get_required_student(student_id)?;
        let added = roster::enroll(conn, class_id, student_id)?;
        if added {
            info!(class_id, student_id, "enrolled student");
        }
        Ok(added)
    }

    pub fn unenroll(&self, class_id: &str, student_id: &str) -> Result<bool> {
        let conn = self.db.conn();
        if !roster::class_exists(conn, class_id)? {
            return Err(CstError::ClassNotFound(class_id.to_string()));
        }
        let removed = roster::unenroll(conn, class_id, student_id)?;
        if removed {
            info!(class_id, student_id, "unenrolled student");
        }
        Ok(removed)
    }
}

fn require_name(name: &str, what: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CstError::ValidationFailed(format!("{what} name must not be empty")));
    }
    Ok(())
}

/// Blank external ids are treated as absent; anything else is kept verbatim.
fn normalize_external_id(raw: Option<String>) -> Option<String> {
    raw.filter(|ext| !ext.trim().is_empty())
}
