use std::path::PathBuf;

use chrono::NaiveDateTime;
use tempfile::TempDir;

use crate::core::plan::ClassPlan;
use crate::core::roster::{ApparatusLevel, Class, Instructor, Student};
use crate::core::skill::Skill;
use crate::core::taxonomy::{Apparatus, ClassType, Level};
use crate::core::weeks::{DATE_TIME_FORMAT, week_of_year};
use crate::storage::Database;
use crate::storage::{roster, skills};

const CREATED: &str = "2024-01-01T00:00:00+00:00";

/// Silks beginner skill with the given weeks.
pub fn skill(id: &str, weeks: &[u32]) -> Skill {
    let mut skill = Skill::new(id, id, Apparatus::Silks, Level::Beginner)
        .with_weeks(weeks.iter().copied().collect());
    skill.created_at = CREATED.to_string();
    skill.updated_at = CREATED.to_string();
    skill
}

pub fn student(id: &str, name: &str) -> Student {
    Student {
        id: id.to_string(),
        name: name.to_string(),
        email: None,
        phone: None,
        external_id: None,
        created_at: CREATED.to_string(),
    }
}

pub fn instructor(id: &str, name: &str) -> Instructor {
    Instructor {
        id: id.to_string(),
        name: name.to_string(),
        email: None,
        phone: None,
        external_id: None,
        apparatus_levels: vec![ApparatusLevel {
            apparatus: Apparatus::Silks,
            level: Level::Advanced,
        }],
        created_at: CREATED.to_string(),
    }
}

pub fn class(id: &str, instructor_id: &str) -> Class {
    Class {
        id: id.to_string(),
        name: format!("Class {id}"),
        class_type: ClassType::Adult,
        apparatus: Apparatus::Silks,
        level: Level::Beginner,
        start_at: at("2024-08-05T18:00:00"),
        end_at: at("2024-08-05T19:00:00"),
        external_id: None,
        instructor_id: instructor_id.to_string(),
        created_at: CREATED.to_string(),
    }
}

pub fn plan(id: &str, class_id: &str, date: &str) -> ClassPlan {
    let date = at(date);
    ClassPlan {
        id: id.to_string(),
        title: format!("Plan {id}"),
        description: None,
        date,
        week_of_year: week_of_year(date),
        duration_minutes: 60,
        notes: None,
        class_id: class_id.to_string(),
        created_at: CREATED.to_string(),
        updated_at: CREATED.to_string(),
    }
}

/// Parse a `YYYY-MM-DDTHH:MM:SS` literal.
pub fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT).expect("fixture date")
}

/// In-memory store with instructor `i1`, class `c1` (students `st1`, `st2`)
/// and skills `s1` (weeks 1-3) and `s2` (weeks 3-4).
pub fn seeded_school() -> Database {
    let db = Database::open_in_memory().expect("open in-memory db");
    seed_school(&db);
    db
}

/// Seed the `seeded_school` rows into an existing store.
pub fn seed_school(db: &Database) {
    let conn = db.conn();
    roster::insert_instructor(conn, &instructor("i1", "Kim")).expect("instructor");
    roster::insert_class(conn, &class("c1", "i1")).expect("class");
    for (id, name) in [("st1", "Ada"), ("st2", "Bo")] {
        roster::insert_student(conn, &student(id, name)).expect("student");
        roster::enroll(conn, "c1", id).expect("enroll");
    }
    skills::insert_skill(conn, &skill("s1", &[1, 2, 3])).expect("skill s1");
    skills::insert_skill(conn, &skill("s2", &[3, 4])).expect("skill s2");
}

/// Isolated filesystem for catalog files and on-disk databases.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl UnitTestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            data_path,
        }
    }

    /// Create a file with content under the fixture root.
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_path.join("cst.db")
    }
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}
