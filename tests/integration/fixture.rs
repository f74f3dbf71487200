use std::path::PathBuf;

use tempfile::TempDir;

use cst::core::roster::{NewClass, NewInstructor, NewStudent};
use cst::core::skill::NewSkill;
use cst::core::taxonomy::{Apparatus, ClassType, Level};
use cst::core::weeks::parse_date_time;
use cst::catalog::SkillCatalog;
use cst::roster::Roster;
use cst::storage::Database;

/// A school on a real database file.
pub struct SchoolFixture {
    pub db: Database,
    pub temp_dir: TempDir,
    pub class_id: String,
    pub student_ids: Vec<String>,
}

impl SchoolFixture {
    /// Instructor, one class with students "Ada" and "Bo", skills `s1` (weeks 1-3)
    /// and `s2` (weeks 3-4).
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let db = Database::open(temp_dir.path().join("cst.db")).expect("open db");

        let catalog = SkillCatalog::new(&db);
        for (id, weeks) in [("s1", vec![1, 2, 3]), ("s2", vec![3, 4])] {
            catalog
                .create_skill(NewSkill {
                    id: Some(id.to_string()),
                    name: id.to_uppercase(),
                    core: false,
                    apparatus: Apparatus::Silks,
                    level: Level::Beginner,
                    taught_in: Vec::new(),
                    applicable_weeks: Some(weeks),
                    notes: String::new(),
                    cues: String::new(),
                })
                .expect("skill");
        }

        let roster = Roster::new(&db);
        let instructor = roster
            .create_instructor(NewInstructor {
                name: "Kim".to_string(),
                ..NewInstructor::default()
            })
            .expect("instructor");
        let student_ids: Vec<String> = ["Ada", "Bo"]
            .iter()
            .map(|name| {
                roster
                    .create_student(NewStudent {
                        name: (*name).to_string(),
                        ..NewStudent::default()
                    })
                    .expect("student")
                    .id
            })
            .collect();
        let class = roster
            .create_class(NewClass {
                name: "Monday silks".to_string(),
                class_type: ClassType::Adult,
                apparatus: Apparatus::Silks,
                level: Level::Beginner,
                start_at: parse_date_time("2024-08-05T18:00").expect("date"),
                end_at: parse_date_time("2024-08-05T19:00").expect("date"),
                external_id: None,
                instructor_id: instructor.id,
                student_ids: student_ids.clone(),
            })
            .expect("class");

        Self {
            db,
            temp_dir,
            class_id: class.class.id,
            student_ids,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.temp_dir.path().join("cst.db")
    }

    pub fn table_count(&self, table: &str) -> i64 {
        self.db
            .conn()
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count")
    }
}
