//! cst class - Manage classes and enrollments

use chrono::NaiveDateTime;
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, or_dash};
use crate::core::roster::{ClassDetail, NewClass};
use crate::core::taxonomy::{Apparatus, ClassType, Level};
use crate::error::Result;

use super::{parse_apparatus, parse_date_arg, parse_level};

#[derive(Args, Debug)]
pub struct ClassArgs {
    #[command(subcommand)]
    pub command: ClassCommand,
}

#[derive(Subcommand, Debug)]
pub enum ClassCommand {
    /// Create a class and enroll students
    Create(CreateClassArgs),

    /// List classes by start time
    List,

    /// Show a class with its instructor and students
    Show {
        id: String,
    },

    /// Enroll a student
    Enroll {
        class_id: String,
        student_id: String,
    },

    /// Remove a student from a class
    Unenroll {
        class_id: String,
        student_id: String,
    },
}

#[derive(Args, Debug)]
pub struct CreateClassArgs {
    pub name: String,

    /// adult, kids-teens, school-holiday-workshop, private-lessons, birthday-party
    #[arg(long = "type", value_parser = parse_class_type)]
    pub class_type: ClassType,

    #[arg(long, value_parser = parse_apparatus)]
    pub apparatus: Apparatus,

    #[arg(long, value_parser = parse_level)]
    pub level: Level,

    #[arg(long, value_parser = parse_date_arg)]
    pub start: NaiveDateTime,

    #[arg(long, value_parser = parse_date_arg)]
    pub end: NaiveDateTime,

    #[arg(long = "instructor")]
    pub instructor_id: String,

    /// Student ids to enroll (comma-separated or repeated)
    #[arg(long = "students", value_delimiter = ',')]
    pub student_ids: Vec<String>,

    /// Booking-platform class id, stored verbatim
    #[arg(long)]
    pub external_id: Option<String>,
}

fn parse_class_type(raw: &str) -> std::result::Result<ClassType, String> {
    raw.parse()
}

pub fn run(ctx: &AppContext, args: &ClassArgs) -> Result<()> {
    let roster = ctx.roster();
    match &args.command {
        ClassCommand::Create(create) => {
            let detail = roster.create_class(NewClass {
                name: create.name.clone(),
                class_type: create.class_type,
                apparatus: create.apparatus,
                level: create.level,
                start_at: create.start,
                end_at: create.end,
                external_id: create.external_id.clone(),
                instructor_id: create.instructor_id.clone(),
                student_ids: create.student_ids.clone(),
            })?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "class": detail }));
            }
            println!(
                "{} Created class {} ({})",
                "✓".green().bold(),
                detail.class.name.bold(),
                detail.class.id
            );
            Ok(())
        }
        ClassCommand::List => {
            let classes = roster.list_classes()?;
            if ctx.robot_mode {
                return super::emit_ok(
                    ctx,
                    serde_json::json!({ "count": classes.len(), "classes": classes }),
                );
            }
            if classes.is_empty() {
                println!("{}", "No classes found".dimmed());
                return Ok(());
            }
            for class in &classes {
                println!(
                    "{:38} {:17} {:24} {} {}",
                    class.id,
                    class.start_at.format("%Y-%m-%d %H:%M").to_string(),
                    class.name,
                    class.apparatus.as_str().cyan(),
                    class.level.as_str().dimmed()
                );
            }
            Ok(())
        }
        ClassCommand::Show { id } => {
            let detail = roster.get_required_class(id)?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "class": detail }));
            }
            show_human(&detail);
            Ok(())
        }
        ClassCommand::Enroll {
            class_id,
            student_id,
        } => {
            let added = roster.enroll(class_id, student_id)?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "enrolled": added }));
            }
            if added {
                println!("{} {student_id} enrolled in {class_id}", "✓".green().bold());
            } else {
                println!("{} {student_id} was already enrolled", "!".yellow());
            }
            Ok(())
        }
        ClassCommand::Unenroll {
            class_id,
            student_id,
        } => {
            let removed = roster.unenroll(class_id, student_id)?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "unenrolled": removed }));
            }
            if removed {
                println!("{} {student_id} removed from {class_id}", "✓".green().bold());
            } else {
                println!("{} {student_id} was not enrolled", "!".yellow());
            }
            Ok(())
        }
    }
}

fn show_human(detail: &ClassDetail) {
    let class = &detail.class;
    let mut layout = HumanLayout::new();
    layout
        .title(&class.name)
        .kv("Id", &class.id)
        .kv("Type", class.class_type.as_str())
        .kv("Apparatus", class.apparatus.as_str())
        .kv("Level", class.level.as_str())
        .kv("Starts", &class.start_at.format("%Y-%m-%d %H:%M").to_string())
        .kv("Ends", &class.end_at.format("%Y-%m-%d %H:%M").to_string())
        .kv("External id", or_dash(class.external_id.as_deref()))
        .kv("Instructor", &detail.instructor.name)
        .blank()
        .section(&format!("Students ({})", detail.students.len()));
    for student in &detail.students {
        layout.bullet(&format!("{} ({})", student.name, student.id));
    }
    emit_human(&layout);
}
