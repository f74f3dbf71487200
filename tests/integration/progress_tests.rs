use std::sync::Arc;
use std::thread;

use cst::core::progress::ProgressUpdate;
use cst::core::skill::SkillFilter;
use cst::core::taxonomy::ProgressStatus;
use cst::progress::ProgressLedger;
use cst::storage::{Database, progress};

use crate::fixture::SchoolFixture;

#[test]
fn sequential_upserts_keep_one_row() {
    let fixture = SchoolFixture::new();
    let ledger = ProgressLedger::new(&fixture.db);
    let student = &fixture.student_ids[0];

    ledger
        .set_progress(ProgressUpdate::new(student.as_str(), "s1", ProgressStatus::Attempted))
        .unwrap();
    let mut second = ProgressUpdate::new(student.as_str(), "s1", ProgressStatus::Excepted);
    second.reason = Some("injury".to_string());
    ledger.set_progress(second).unwrap();

    assert_eq!(
        progress::count_rows_for_pair(fixture.db.conn(), student, "s1").unwrap(),
        1
    );
    let rows = ledger
        .progress_for_student(student, SkillFilter::default())
        .unwrap();
    let s1 = rows.iter().find(|r| r.skill.id == "s1").unwrap();
    assert_eq!(s1.status, ProgressStatus::Excepted);
    assert_eq!(s1.reason.as_deref(), Some("injury"));
}

#[test]
fn concurrent_writers_do_not_duplicate() {
    let fixture = SchoolFixture::new();
    let path = Arc::new(fixture.db_path());
    let student = Arc::new(fixture.student_ids[0].clone());
    let statuses = [
        ProgressStatus::Attempted,
        ProgressStatus::Competent,
        ProgressStatus::Mastered,
        ProgressStatus::Excepted,
    ];

    let handles: Vec<_> = statuses
        .into_iter()
        .map(|status| {
            let path = Arc::clone(&path);
            let student = Arc::clone(&student);
            thread::spawn(move || {
                let db = Database::open(path.as_path()).unwrap();
                for _ in 0..5 {
                    ProgressLedger::new(&db)
                        .set_progress(ProgressUpdate::new(student.as_str(), "s1", status))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        progress::count_rows_for_pair(fixture.db.conn(), &student, "s1").unwrap(),
        1
    );
}

#[test]
fn missing_rows_read_as_not_attempted() {
    let fixture = SchoolFixture::new();
    let rows = ProgressLedger::new(&fixture.db)
        .progress_for_student(&fixture.student_ids[1], SkillFilter::default())
        .unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row.status, ProgressStatus::NotAttempted);
        assert!(row.notes.is_none());
        assert!(row.reason.is_none());
        assert!(row.assessed_by.is_none());
    }
}
