//! cst progress - Record and review student progress

use clap::{Args, Subcommand};
use colored::{ColoredString, Colorize};

use crate::app::AppContext;
use crate::core::progress::{ProgressSummary, ProgressUpdate, SkillProgress};
use crate::core::taxonomy::ProgressStatus;
use crate::error::Result;

use super::FilterArgs;

#[derive(Args, Debug)]
pub struct ProgressArgs {
    #[command(subcommand)]
    pub command: ProgressCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProgressCommand {
    /// Record a student's current status on a skill
    Set {
        student_id: String,
        skill_id: String,

        /// not-attempted, attempted, competent, mastered or excepted
        #[arg(value_parser = parse_status)]
        status: ProgressStatus,

        #[arg(long)]
        notes: Option<String>,

        /// Why the student is excepted
        #[arg(long)]
        reason: Option<String>,

        /// Assessor name
        #[arg(long = "by")]
        assessed_by: Option<String>,
    },

    /// Every catalog skill with the student's status
    Show {
        student_id: String,

        #[command(flatten)]
        filter: FilterArgs,

        /// Print counts per status instead of the full list
        #[arg(long)]
        summary: bool,
    },
}

fn parse_status(raw: &str) -> std::result::Result<ProgressStatus, String> {
    raw.parse()
}

pub fn run(ctx: &AppContext, args: &ProgressArgs) -> Result<()> {
    let ledger = ctx.ledger();
    match &args.command {
        ProgressCommand::Set {
            student_id,
            skill_id,
            status,
            notes,
            reason,
            assessed_by,
        } => {
            let stored = ledger.set_progress(ProgressUpdate {
                student_id: student_id.clone(),
                skill_id: skill_id.clone(),
                status: *status,
                notes: notes.clone(),
                reason: reason.clone(),
                assessed_by: assessed_by.clone(),
            })?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "progress": stored }));
            }
            println!(
                "{} {} on {}: {}",
                "✓".green().bold(),
                stored.student_id,
                stored.skill_id,
                status_label(stored.status)
            );
            Ok(())
        }
        ProgressCommand::Show {
            student_id,
            filter,
            summary,
        } => {
            if *summary {
                let summary = ledger.summary(student_id, filter.filter())?;
                if ctx.robot_mode {
                    return super::emit_ok(ctx, serde_json::json!({ "summary": summary }));
                }
                print_summary(&summary);
                return Ok(());
            }

            let rows = ledger.progress_for_student(student_id, filter.filter())?;
            if ctx.robot_mode {
                return super::emit_ok(
                    ctx,
                    serde_json::json!({
                        "student_id": student_id,
                        "count": rows.len(),
                        "progress": rows,
                    }),
                );
            }
            print_rows(&rows);
            Ok(())
        }
    }
}

fn print_rows(rows: &[SkillProgress]) {
    if rows.is_empty() {
        println!("{}", "No skills in the catalog".dimmed());
        return;
    }
    println!(
        "{:28} {:12} {:10} {:14} {}",
        "SKILL".bold(),
        "APPARATUS".bold(),
        "LEVEL".bold(),
        "STATUS".bold(),
        "ASSESSED".bold()
    );
    println!("{}", "─".repeat(84).dimmed());
    for row in rows {
        let assessed = row
            .assessed_at
            .as_deref()
            .and_then(|at| at.split('T').next())
            .unwrap_or("-");
        println!(
            "{:28} {:12} {:10} {:14} {}",
            row.skill.name,
            row.skill.apparatus.as_str(),
            row.skill.level.as_str(),
            status_label(row.status),
            assessed
        );
    }
}

fn print_summary(summary: &ProgressSummary) {
    println!("{} {}", "Student".bold(), summary.student_id);
    for status in ProgressStatus::ALL {
        println!("  {:14} {}", status_label(*status), summary.count(*status));
    }
    println!("  {:14} {}", "TOTAL".bold(), summary.total);
}

fn status_label(status: ProgressStatus) -> ColoredString {
    let text = status.as_str();
    match status {
        ProgressStatus::NotAttempted => text.dimmed(),
        ProgressStatus::Attempted => text.yellow(),
        ProgressStatus::Competent => text.cyan(),
        ProgressStatus::Mastered => text.green(),
        ProgressStatus::Excepted => text.magenta(),
    }
}
