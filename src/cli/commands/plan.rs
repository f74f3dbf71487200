//! cst plan - Compose and manage class plans

use chrono::NaiveDateTime;
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, or_dash};
use crate::core::plan::{ClassPlan, ClassPlanDetail, ClassPlanUpdate, NewClassPlan, SkillUsage};
use crate::error::{CstError, Result};

use super::parse_date_arg;

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(subcommand)]
    pub command: PlanCommand,
}

#[derive(Subcommand, Debug)]
pub enum PlanCommand {
    /// Create a plan with an ordered skill list
    Create(CreatePlanArgs),

    /// Change fields of a plan; --skills replaces the whole list
    Update(UpdatePlanArgs),

    /// Delete a plan and its skill list
    Delete {
        id: String,
    },

    /// Show a plan with its class, students and skills
    Show {
        id: String,
    },

    /// List plans, newest first
    List {
        /// Only plans for this class
        #[arg(long = "class")]
        class_id: Option<String>,
    },

    /// Plans that include a skill
    UsingSkill {
        skill_id: String,
    },
}

#[derive(Args, Debug)]
pub struct CreatePlanArgs {
    #[arg(long = "class")]
    pub class_id: String,

    #[arg(long)]
    pub title: String,

    /// Lesson date (YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS])
    #[arg(long, value_parser = parse_date_arg)]
    pub date: NaiveDateTime,

    /// Length in minutes (default from config)
    #[arg(long)]
    pub duration: Option<u32>,

    /// Skill ids in teaching order (comma-separated or repeated)
    #[arg(long = "skills", required = true, value_delimiter = ',')]
    pub skill_ids: Vec<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdatePlanArgs {
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDateTime>,

    #[arg(long)]
    pub duration: Option<u32>,

    /// New skill list, replacing the old one
    #[arg(long = "skills", value_delimiter = ',', conflicts_with = "clear_skills")]
    pub skill_ids: Option<Vec<String>>,

    /// Remove every skill from the plan
    #[arg(long)]
    pub clear_skills: bool,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

pub fn run(ctx: &AppContext, args: &PlanArgs) -> Result<()> {
    let planner = ctx.planner();
    match &args.command {
        PlanCommand::Create(create) => {
            let detail = planner.create(NewClassPlan {
                title: create.title.clone(),
                description: create.description.clone(),
                date: create.date,
                duration_minutes: create
                    .duration
                    .unwrap_or(ctx.config.planner.default_duration_minutes),
                class_id: create.class_id.clone(),
                skill_ids: create.skill_ids.clone(),
                notes: create.notes.clone(),
            })?;
            emit_detail(ctx, &detail, "Created")
        }
        PlanCommand::Update(update) => {
            let skill_ids = if update.clear_skills {
                Some(Vec::new())
            } else {
                update.skill_ids.clone()
            };
            let request = ClassPlanUpdate {
                id: update.id.clone(),
                title: update.title.clone(),
                description: update.description.clone(),
                date: update.date,
                duration_minutes: update.duration,
                notes: update.notes.clone(),
                skill_ids,
            };
            if request.is_noop() {
                return Err(CstError::ValidationFailed(
                    "nothing to update; pass at least one field".to_string(),
                ));
            }
            let detail = planner.update(request)?;
            emit_detail(ctx, &detail, "Updated")
        }
        PlanCommand::Delete { id } => {
            planner.delete(id)?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "deleted": id }));
            }
            println!("{} Deleted plan {id}", "✓".green().bold());
            Ok(())
        }
        PlanCommand::Show { id } => {
            let detail = planner.get_required(id)?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "plan": detail }));
            }
            show_human(&detail);
            Ok(())
        }
        PlanCommand::List { class_id } => {
            let plans = planner.list(class_id.as_deref())?;
            emit_list(ctx, &plans)
        }
        PlanCommand::UsingSkill { skill_id } => {
            let usages = planner.plans_using_skill(skill_id)?;
            emit_usage(ctx, skill_id, &usages)
        }
    }
}

fn emit_detail(ctx: &AppContext, detail: &ClassPlanDetail, verb: &str) -> Result<()> {
    if ctx.robot_mode {
        return super::emit_ok(ctx, serde_json::json!({ "plan": detail }));
    }
    println!(
        "{} {verb} plan {} ({})",
        "✓".green().bold(),
        detail.plan.title.bold(),
        detail.plan.id
    );
    println!();
    show_human(detail);
    Ok(())
}

fn show_human(detail: &ClassPlanDetail) {
    let plan = &detail.plan;
    let mut layout = HumanLayout::new();
    layout
        .title(&plan.title)
        .kv("Id", &plan.id)
        .kv("Date", &plan.date.format("%Y-%m-%d %H:%M").to_string())
        .kv("Week", &plan.week_of_year.to_string())
        .kv("Duration", &format!("{} min", plan.duration_minutes))
        .kv(
            "Class",
            &format!("{} ({})", detail.class.class.name, detail.class.class.id),
        )
        .kv("Instructor", &detail.class.instructor.name)
        .kv("Description", or_dash(plan.description.as_deref()))
        .kv("Notes", or_dash(plan.notes.as_deref()));

    layout.blank().section("Skills");
    if detail.skills.is_empty() {
        layout.push_line("(none)".dimmed().to_string());
    }
    for planned in &detail.skills {
        layout.push_line(format!(
            "{:>3}. {} ({}, {} {})",
            planned.position,
            planned.skill.name,
            planned.skill.id,
            planned.skill.apparatus,
            planned.skill.level
        ));
    }

    layout
        .blank()
        .section(&format!("Students ({})", detail.class.students.len()));
    for student in &detail.class.students {
        layout.bullet(&student.name);
    }
    emit_human(&layout);
}

fn emit_list(ctx: &AppContext, plans: &[ClassPlan]) -> Result<()> {
    if ctx.robot_mode {
        return super::emit_ok(
            ctx,
            serde_json::json!({ "count": plans.len(), "plans": plans }),
        );
    }
    if plans.is_empty() {
        println!("{}", "No plans found".dimmed());
        return Ok(());
    }
    println!(
        "{:38} {:12} {:>4} {:>5} {}",
        "ID".bold(),
        "DATE".bold(),
        "WEEK".bold(),
        "MIN".bold(),
        "TITLE".bold()
    );
    println!("{}", "─".repeat(84).dimmed());
    for plan in plans {
        println!(
            "{:38} {:12} {:>4} {:>5} {}",
            plan.id,
            plan.date.format("%Y-%m-%d").to_string(),
            plan.week_of_year,
            plan.duration_minutes,
            plan.title
        );
    }
    Ok(())
}

fn emit_usage(ctx: &AppContext, skill_id: &str, usages: &[SkillUsage]) -> Result<()> {
    if ctx.robot_mode {
        return super::emit_ok(
            ctx,
            serde_json::json!({ "skill_id": skill_id, "count": usages.len(), "plans": usages }),
        );
    }
    if usages.is_empty() {
        println!("{}", "No plans use this skill".dimmed());
        return Ok(());
    }
    println!(
        "{:12} {:>4} {:24} {:18} {:>5} {}",
        "DATE".bold(),
        "WEEK".bold(),
        "CLASS".bold(),
        "INSTRUCTOR".bold(),
        "POS".bold(),
        "TITLE".bold()
    );
    println!("{}", "─".repeat(90).dimmed());
    for usage in usages {
        let positions: Vec<String> = usage.positions.iter().map(ToString::to_string).collect();
        println!(
            "{:12} {:>4} {:24} {:18} {:>5} {}",
            usage.plan.date.format("%Y-%m-%d").to_string(),
            usage.plan.week_of_year,
            usage.class.name,
            usage.instructor.name,
            positions.join(","),
            usage.plan.title
        );
    }
    Ok(())
}
