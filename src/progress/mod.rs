//! Student progress ledger.
//!
//! One current assessment per (student, skill). Reads are driven by the
//! catalog, so skills nobody has assessed still show up as `NOT_ATTEMPTED`.

use tracing::{debug, info};

use crate::core::progress::{ProgressSummary, ProgressUpdate, SkillProgress, StudentSkillProgress};
use crate::core::roster::Student;
use crate::core::skill::SkillFilter;
use crate::error::{CstError, Result};
use crate::storage::{Database, now_timestamp, progress, roster, skills};

pub struct ProgressLedger<'a> {
    db: &'a Database,
}

impl<'a> ProgressLedger<'a> {
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Record the current assessment, replacing any earlier one for the pair.
    ///
    /// `assessed_at` is stamped here. Status and reason are not cross-checked.
    pub fn set_progress(&self, update: ProgressUpdate) -> Result<StudentSkillProgress> {
        let stored = self.db.with_transaction(|tx| {
            if roster::get_student(tx, &update.student_id)?.is_none() {
                return Err(CstError::StudentNotFound(update.student_id.clone()));
            }
            if !skills::skill_exists(tx, &update.skill_id)? {
                return Err(CstError::SkillNotFound(update.skill_id.clone()));
            }
            progress::upsert_progress(tx, &update, &now_timestamp())
        })?;

        info!(
            student_id = %stored.student_id,
            skill_id = %stored.skill_id,
            status = %stored.status,
            "recorded progress"
        );
        Ok(stored)
    }

    /// Every catalog skill matching `filter`, with this student's assessment.
    pub fn progress_for_student(
        &self,
        student_id: &str,
        filter: SkillFilter,
    ) -> Result<Vec<SkillProgress>> {
        let conn = self.db.conn();
        self.require_student(student_id)?;

        let catalog = skills::list_skills(conn, filter)?;
        let mut stored = progress::progress_by_skill(conn, student_id)?;
        debug!(
            student_id,
            skills = catalog.len(),
            assessed = stored.len(),
            "joining progress onto catalog"
        );

        Ok(catalog
            .into_iter()
            .map(|skill| {
                let row = stored.remove(&skill.id);
                SkillProgress::from_parts(skill, row)
            })
            .collect())
    }

    pub fn summary(&self, student_id: &str, filter: SkillFilter) -> Result<ProgressSummary> {
        let rows = self.progress_for_student(student_id, filter)?;
        Ok(ProgressSummary::from_rows(student_id, &rows))
    }

    fn require_student(&self, student_id: &str) -> Result<Student> {
        roster::get_student(self.db.conn(), student_id)?
            .ok_or_else(|| CstError::StudentNotFound(student_id.to_string()))
    }
}
