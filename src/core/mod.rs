//! Domain types and pure logic: taxonomy, skills, weeks, graph, plans, progress.

pub mod graph;
pub mod plan;
pub mod progress;
pub mod roster;
pub mod skill;
pub mod taxonomy;
pub mod weeks;

pub use graph::{SkillGraph, TreeNode};
pub use plan::{ClassPlan, ClassPlanDetail, ClassPlanUpdate, NewClassPlan, PlanSkillLink, PlannedSkill, SkillUsage};
pub use progress::{ProgressSummary, ProgressUpdate, SkillProgress, StudentSkillProgress};
pub use roster::{
    ApparatusLevel, Class, ClassDetail, Instructor, NewClass, NewInstructor, NewStudent, Student,
};
pub use skill::{NewSkill, Skill, SkillFilter};
pub use taxonomy::{Apparatus, ClassType, Level, ProgressStatus};
pub use weeks::{WeekSet, week_of_year};
