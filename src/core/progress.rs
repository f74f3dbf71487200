//! Per-student assessment records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::skill::Skill;
use crate::core::taxonomy::ProgressStatus;

/// The stored assessment for one (student, skill) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSkillProgress {
    pub id: String,
    pub student_id: String,
    pub skill_id: String,
    pub status: ProgressStatus,
    pub notes: Option<String>,
    /// Expected when `status` is `EXCEPTED`; not enforced here.
    pub reason: Option<String>,
    /// Free-text assessor name.
    pub assessed_by: Option<String>,
    pub assessed_at: String,
}

/// Input to the upsert. Every field overwrites the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub student_id: String,
    pub skill_id: String,
    pub status: ProgressStatus,
    pub notes: Option<String>,
    pub reason: Option<String>,
    pub assessed_by: Option<String>,
}

impl ProgressUpdate {
    #[must_use]
    pub fn new(
        student_id: impl Into<String>,
        skill_id: impl Into<String>,
        status: ProgressStatus,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            skill_id: skill_id.into(),
            status,
            notes: None,
            reason: None,
            assessed_by: None,
        }
    }
}

/// A catalog skill annotated with one student's current assessment.
///
/// Skills without a stored row report `NOT_ATTEMPTED` and null fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillProgress {
    pub skill: Skill,
    pub status: ProgressStatus,
    pub notes: Option<String>,
    pub reason: Option<String>,
    pub assessed_by: Option<String>,
    pub assessed_at: Option<String>,
}

impl SkillProgress {
    /// Left-join one catalog skill with its optional stored row.
    #[must_use]
    pub fn from_parts(skill: Skill, stored: Option<StudentSkillProgress>) -> Self {
        match stored {
            Some(row) => Self {
                skill,
                status: row.status,
                notes: row.notes,
                reason: row.reason,
                assessed_by: row.assessed_by,
                assessed_at: Some(row.assessed_at),
            },
            None => Self {
                skill,
                status: ProgressStatus::NotAttempted,
                notes: None,
                reason: None,
                assessed_by: None,
                assessed_at: None,
            },
        }
    }
}

/// Count of skills per status for one student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub student_id: String,
    pub total: usize,
    pub by_status: BTreeMap<ProgressStatus, usize>,
}

impl ProgressSummary {
    #[must_use]
    pub fn from_rows(student_id: &str, rows: &[SkillProgress]) -> Self {
        let mut by_status: BTreeMap<ProgressStatus, usize> = ProgressStatus::ALL
            .iter()
            .map(|status| (*status, 0))
            .collect();
        for row in rows {
            *by_status.entry(row.status).or_default() += 1;
        }
        Self {
            student_id: student_id.to_string(),
            total: rows.len(),
            by_status,
        }
    }

    #[must_use]
    pub fn count(&self, status: ProgressStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::taxonomy::{Apparatus, Level};

    fn skill(id: &str) -> Skill {
        Skill::new(id, id, Apparatus::Silks, Level::Beginner)
    }

    #[test]
    fn missing_row_defaults_to_not_attempted() {
        let row = SkillProgress::from_parts(skill("s1"), None);
        assert_eq!(row.status, ProgressStatus::NotAttempted);
        assert!(row.notes.is_none());
        assert!(row.reason.is_none());
        assert!(row.assessed_by.is_none());
        assert!(row.assessed_at.is_none());
    }

    #[test]
    fn stored_row_is_carried_over() {
        let stored = StudentSkillProgress {
            id: "p1".into(),
            student_id: "st".into(),
            skill_id: "s1".into(),
            status: ProgressStatus::Excepted,
            notes: Some("shoulder".into()),
            reason: Some("injury".into()),
            assessed_by: Some("Kim".into()),
            assessed_at: "2024-08-05T10:00:00Z".into(),
        };
        let row = SkillProgress::from_parts(skill("s1"), Some(stored));
        assert_eq!(row.status, ProgressStatus::Excepted);
        assert_eq!(row.reason.as_deref(), Some("injury"));
        assert_eq!(row.assessed_by.as_deref(), Some("Kim"));
    }

    #[test]
    fn summary_counts_every_status() {
        let mut mastered = SkillProgress::from_parts(skill("a"), None);
        mastered.status = ProgressStatus::Mastered;
        let rows = vec![
            mastered,
            SkillProgress::from_parts(skill("b"), None),
            SkillProgress::from_parts(skill("c"), None),
        ];
        let summary = ProgressSummary::from_rows("st", &rows);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.count(ProgressStatus::Mastered), 1);
        assert_eq!(summary.count(ProgressStatus::NotAttempted), 2);
        assert_eq!(summary.count(ProgressStatus::Competent), 0);
        assert_eq!(summary.by_status.len(), ProgressStatus::ALL.len());
    }
}
