//! cst student - Manage students

use clap::{Args, Subcommand};
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, or_dash};
use crate::core::roster::{NewStudent, Student};
use crate::error::{CstError, Result};

#[derive(Args, Debug)]
pub struct StudentArgs {
    #[command(subcommand)]
    pub command: StudentCommand,
}

#[derive(Subcommand, Debug)]
pub enum StudentCommand {
    /// Add a student
    Create {
        name: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// Booking-platform member id, stored verbatim
        #[arg(long)]
        external_id: Option<String>,
    },

    /// List students by name
    List,

    /// Show one student by id or external id
    Show {
        #[arg(required_unless_present = "external_id")]
        id: Option<String>,

        #[arg(long, conflicts_with = "id")]
        external_id: Option<String>,
    },
}

pub fn run(ctx: &AppContext, args: &StudentArgs) -> Result<()> {
    let roster = ctx.roster();
    match &args.command {
        StudentCommand::Create {
            name,
            email,
            phone,
            external_id,
        } => {
            let student = roster.create_student(NewStudent {
                name: name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                external_id: external_id.clone(),
            })?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "student": student }));
            }
            println!(
                "{} Created student {} ({})",
                "✓".green().bold(),
                student.name.bold(),
                student.id
            );
            Ok(())
        }
        StudentCommand::List => {
            let students = roster.list_students()?;
            if ctx.robot_mode {
                return super::emit_ok(
                    ctx,
                    serde_json::json!({ "count": students.len(), "students": students }),
                );
            }
            if students.is_empty() {
                println!("{}", "No students found".dimmed());
            }
            for student in &students {
                println!(
                    "{:38} {:28} {}",
                    student.id,
                    student.name,
                    or_dash(student.external_id.as_deref()).dimmed()
                );
            }
            Ok(())
        }
        StudentCommand::Show { id, external_id } => {
            let student = match (id, external_id) {
                (_, Some(ext)) => roster
                    .find_student_by_external_id(ext)?
                    .ok_or_else(|| CstError::StudentNotFound(format!("external id {ext}")))?,
                (Some(id), None) => roster.get_required_student(id)?,
                (None, None) => {
                    return Err(CstError::ValidationFailed(
                        "pass a student id or --external-id".to_string(),
                    ));
                }
            };
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "student": student }));
            }
            show_human(&student);
            Ok(())
        }
    }
}

fn show_human(student: &Student) {
    let mut layout = HumanLayout::new();
    layout
        .title(&student.name)
        .kv("Id", &student.id)
        .kv("Email", or_dash(student.email.as_deref()))
        .kv("Phone", or_dash(student.phone.as_deref()))
        .kv("External id", or_dash(student.external_id.as_deref()))
        .kv("Created", &student.created_at);
    emit_human(&layout);
}
