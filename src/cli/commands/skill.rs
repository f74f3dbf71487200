//! cst skill - Browse and edit the skill catalog

use clap::{Args, Subcommand};
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human};
use crate::core::graph::TreeNode;
use crate::core::skill::{NewSkill, Skill};
use crate::core::taxonomy::{Apparatus, Level, format_level_list};
use crate::error::Result;

use super::{FilterArgs, parse_apparatus, parse_level};

#[derive(Args, Debug)]
pub struct SkillArgs {
    #[command(subcommand)]
    pub command: SkillCommand,
}

#[derive(Subcommand, Debug)]
pub enum SkillCommand {
    /// List skills in catalog order
    List(FilterArgs),

    /// Show one skill with its links
    Show {
        id: String,
    },

    /// Add a skill (no parent or sibling links)
    Create(CreateSkillArgs),

    /// Link a skill to a parent and/or siblings
    Link {
        id: String,

        /// Prerequisite skill
        #[arg(long)]
        parent: Option<String>,

        /// Related skill at the same tier (repeatable)
        #[arg(long = "sibling")]
        siblings: Vec<String>,
    },

    /// Remove a skill's parent link
    UnlinkParent {
        id: String,
    },

    /// Remove one outgoing sibling edge
    UnlinkSibling {
        id: String,
        sibling: String,
    },

    /// Skills whose parent is this skill
    Children {
        id: String,
    },

    /// Outgoing sibling edges of this skill
    Siblings {
        id: String,
    },

    /// Prerequisite tree from one skill, or the whole forest
    Tree {
        id: Option<String>,
    },

    /// Replace a skill's applicable weeks
    Weeks {
        id: String,

        /// Weeks of the year (1-53)
        #[arg(required = true, num_args = 1.., value_delimiter = ',')]
        weeks: Vec<u32>,
    },
}

#[derive(Args, Debug)]
pub struct CreateSkillArgs {
    /// Display name
    pub name: String,

    #[arg(long, value_parser = parse_apparatus)]
    pub apparatus: Apparatus,

    #[arg(long, value_parser = parse_level)]
    pub level: Level,

    /// Explicit id (default: generated)
    #[arg(long)]
    pub id: Option<String>,

    /// Mark as a core skill
    #[arg(long)]
    pub core: bool,

    /// Levels the skill is taught in (comma-separated)
    #[arg(long, value_delimiter = ',', value_parser = parse_level)]
    pub taught_in: Vec<Level>,

    /// Applicable weeks (comma-separated; default from config)
    #[arg(long, value_delimiter = ',')]
    pub weeks: Option<Vec<u32>>,

    #[arg(long, default_value = "")]
    pub notes: String,

    /// Coaching cues
    #[arg(long, default_value = "")]
    pub cues: String,
}

pub fn run(ctx: &AppContext, args: &SkillArgs) -> Result<()> {
    let catalog = ctx.catalog();
    match &args.command {
        SkillCommand::List(filter) => {
            let skills = catalog.list_skills(filter.filter())?;
            if ctx.robot_mode {
                return super::emit_ok(
                    ctx,
                    serde_json::json!({ "count": skills.len(), "skills": skills }),
                );
            }
            print_skill_table(&skills);
            Ok(())
        }
        SkillCommand::Show { id } => {
            let skill = catalog.get_required(id)?;
            let children = catalog.children(id)?;
            let siblings = catalog.siblings(id)?;
            if ctx.robot_mode {
                return super::emit_ok(
                    ctx,
                    serde_json::json!({
                        "skill": skill,
                        "children": children,
                        "siblings": siblings,
                    }),
                );
            }
            show_human(&skill, &children, &siblings);
            Ok(())
        }
        SkillCommand::Create(create) => {
            let skill = catalog.create_skill(NewSkill {
                id: create.id.clone(),
                name: create.name.clone(),
                core: create.core,
                apparatus: create.apparatus,
                level: create.level,
                taught_in: create.taught_in.clone(),
                applicable_weeks: create.weeks.clone(),
                notes: create.notes.clone(),
                cues: create.cues.clone(),
            })?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "skill": skill }));
            }
            println!("{} Created skill {} ({})", "✓".green().bold(), skill.name.bold(), skill.id);
            Ok(())
        }
        SkillCommand::Link {
            id,
            parent,
            siblings,
        } => {
            let mut skill = catalog.get_required(id)?;
            if let Some(parent) = parent {
                skill = catalog.link_parent(id, parent)?;
            }
            let added = if siblings.is_empty() {
                0
            } else {
                catalog.link_siblings(id, siblings)?
            };
            if ctx.robot_mode {
                return super::emit_ok(
                    ctx,
                    serde_json::json!({ "skill": skill, "siblings_added": added }),
                );
            }
            if let Some(parent) = &skill.parent_id {
                println!("{} {} now follows {}", "✓".green().bold(), skill.id, parent);
            }
            if !siblings.is_empty() {
                println!("{} {added} sibling edge(s) added", "✓".green().bold());
            }
            Ok(())
        }
        SkillCommand::UnlinkParent { id } => {
            let skill = catalog.clear_parent(id)?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "skill": skill }));
            }
            println!("{} {} has no parent", "✓".green().bold(), skill.id);
            Ok(())
        }
        SkillCommand::UnlinkSibling { id, sibling } => {
            let removed = catalog.unlink_sibling(id, sibling)?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "removed": removed }));
            }
            if removed {
                println!("{} removed {id} -> {sibling}", "✓".green().bold());
            } else {
                println!("{} no edge {id} -> {sibling}", "!".yellow());
            }
            Ok(())
        }
        SkillCommand::Children { id } => {
            let skills = catalog.children(id)?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "skill_id": id, "children": skills }));
            }
            print_skill_table(&skills);
            Ok(())
        }
        SkillCommand::Siblings { id } => {
            let skills = catalog.siblings(id)?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "skill_id": id, "siblings": skills }));
            }
            print_skill_table(&skills);
            Ok(())
        }
        SkillCommand::Tree { id } => {
            let forest = catalog.tree(id.as_deref())?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "tree": forest }));
            }
            if forest.is_empty() {
                println!("{}", "No skills in the catalog".dimmed());
            }
            for root in &forest {
                print_tree(root, "", true, true);
            }
            Ok(())
        }
        SkillCommand::Weeks { id, weeks } => {
            let skill = catalog.update_applicable_weeks(id, weeks)?;
            if ctx.robot_mode {
                return super::emit_ok(ctx, serde_json::json!({ "skill": skill }));
            }
            println!(
                "{} {} applies in weeks {}",
                "✓".green().bold(),
                skill.id,
                skill.applicable_weeks
            );
            Ok(())
        }
    }
}

/// Catalog table shared by `skill list` and `suggest`.
pub(crate) fn print_skill_table(skills: &[Skill]) {
    if skills.is_empty() {
        println!("{}", "No skills found".dimmed());
        return;
    }

    println!(
        "{:24} {:28} {:12} {:10} {}",
        "ID".bold(),
        "NAME".bold(),
        "APPARATUS".bold(),
        "LEVEL".bold(),
        "WEEKS".bold()
    );
    println!("{}", "─".repeat(90).dimmed());
    for skill in skills {
        let name = if skill.core {
            format!("{} *", skill.name)
        } else {
            skill.name.clone()
        };
        println!(
            "{:24} {:28} {:12} {:10} {}",
            truncate(&skill.id, 24),
            truncate(&name, 28),
            skill.apparatus.as_str(),
            skill.level.as_str(),
            weeks_label(skill)
        );
    }
    println!();
    println!("{} {}", "Total:".dimmed(), skills.len());
}

fn show_human(skill: &Skill, children: &[Skill], siblings: &[Skill]) {
    let mut layout = HumanLayout::new();
    layout
        .title(&skill.name)
        .kv("Id", &skill.id)
        .kv("Apparatus", skill.apparatus.as_str())
        .kv("Level", skill.level.as_str())
        .kv("Core", if skill.core { "yes" } else { "no" })
        .kv("Taught in", &format_level_list(&skill.taught_in))
        .kv("Weeks", &weeks_label(skill))
        .kv("Parent", skill.parent_id.as_deref().unwrap_or("-"));
    if !skill.cues.is_empty() {
        layout.kv("Cues", &skill.cues);
    }
    if !skill.notes.is_empty() {
        layout.kv("Notes", &skill.notes);
    }
    if !children.is_empty() {
        layout.blank().section("Children");
        for child in children {
            layout.bullet(&format!("{} ({})", child.name, child.id));
        }
    }
    if !siblings.is_empty() {
        layout.blank().section("Siblings");
        for sibling in siblings {
            layout.bullet(&format!("{} ({})", sibling.name, sibling.id));
        }
    }
    emit_human(&layout);
}

fn print_tree(node: &TreeNode, prefix: &str, last: bool, root: bool) {
    let label = if node.revisited {
        format!("{} ({}) {}", node.name, node.id, "[loop]".red())
    } else {
        format!("{} ({})", node.name, node.id.dimmed())
    };
    if root {
        println!("{label}");
    } else {
        let branch = if last { "└── " } else { "├── " };
        println!("{prefix}{branch}{label}");
    }

    let child_prefix = if root {
        String::new()
    } else if last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };
    for (idx, child) in node.children.iter().enumerate() {
        print_tree(child, &child_prefix, idx + 1 == node.children.len(), false);
    }
}

fn weeks_label(skill: &Skill) -> String {
    if skill.applicable_weeks.is_empty() {
        "-".to_string()
    } else {
        skill.applicable_weeks.to_string()
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    } else {
        text.to_string()
    }
}
