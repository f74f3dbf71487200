//! cst instructor - Manage instructors

use clap::{Args, Subcommand};
use colored::Colorize;

use crate::app::AppContext;
use crate::core::roster::{ApparatusLevel, NewInstructor};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct InstructorArgs {
    #[command(subcommand)]
    pub command: InstructorCommand,
}

#[derive(Subcommand, Debug)]
pub enum InstructorCommand {
    /// Add an instructor
    Create {
        name: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        external_id: Option<String>,

        /// APPARATUS:LEVEL pairs they teach, e.g. silks:advanced (repeatable)
        #[arg(long = "teaches", value_parser = parse_apparatus_level)]
        apparatus_levels: Vec<ApparatusLevel>,
    },

    /// List instructors by name
    List,
}

fn parse_apparatus_level(raw: &str) -> std::result::Result<ApparatusLevel, String> {
    let (apparatus, level) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected APPARATUS:LEVEL, got '{raw}'"))?;
    Ok(ApparatusLevel {
        apparatus: apparatus.parse()?,
        level: level.parse()?,
    })
}

pub fn run(ctx: &AppContext, args: &InstructorArgs) -> Result<()> {
    let roster = ctx.roster();
    match &args.command {
        InstructorCommand::Create {
            name,
            email,
            phone,
            external_id,
            apparatus_levels,
        } => {
            let instructor = roster.create_instructor(NewInstructor {
                name: name.clone(),
                email: email.clone(),
                phone: phone.clone(),
                external_id: external_id.clone(),
                apparatus_levels: apparatus_levels.clone(),
            })?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "instructor": instructor }));
            }
            println!(
                "{} Created instructor {} ({})",
                "✓".green().bold(),
                instructor.name.bold(),
                instructor.id
            );
            Ok(())
        }
        InstructorCommand::List => {
            let instructors = roster.list_instructors()?;
            if ctx.robot_mode {
                return super::emit_ok(
                    ctx,
                    serde_json::json!({ "count": instructors.len(), "instructors": instructors }),
                );
            }
            if instructors.is_empty() {
                println!("{}", "No instructors found".dimmed());
            }
            for instructor in &instructors {
                let teaches: Vec<String> = instructor
                    .apparatus_levels
                    .iter()
                    .map(|al| format!("{}:{}", al.apparatus, al.level))
                    .collect();
                println!(
                    "{:38} {:24} {}",
                    instructor.id,
                    instructor.name,
                    teaches.join(", ").dimmed()
                );
            }
            Ok(())
        }
    }
}
