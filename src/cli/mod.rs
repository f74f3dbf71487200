//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

pub mod commands;
pub mod output;

/// Circus Skills Tracker - skill catalog, weekly plans and student progress
#[derive(Parser, Debug)]
#[command(name = "cst")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable JSON output for scripts (same as --output-format=json)
    #[arg(long, global = true)]
    pub robot: bool,

    /// Output format (human, json, jsonl, plain)
    #[arg(long, short = 'O', global = true, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Shorthand for --output-format=json
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: layered global + project config)
    #[arg(long, global = true, env = "CST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data directory holding the database and project config
    #[arg(long, global = true, env = "CST_ROOT")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective output format.
    ///
    /// `--output-format` wins, then `--machine` / `--robot`, then human.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        if let Some(fmt) = self.output_format {
            return fmt;
        }
        if self.machine || self.robot {
            return OutputFormat::Json;
        }
        OutputFormat::Human
    }

    #[must_use]
    pub fn robot_mode(&self) -> bool {
        self.output_format().is_machine_readable()
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory, database and a default config
    Init(commands::init::InitArgs),

    /// Import a YAML or JSON skill catalog
    Import(commands::import::ImportArgs),

    /// Browse and edit the skill catalog
    Skill(commands::skill::SkillArgs),

    /// Skills due in a week of the year or on a date
    Suggest(commands::suggest::SuggestArgs),

    /// Compose and manage class plans
    Plan(commands::plan::PlanArgs),

    /// Record and review student progress
    Progress(commands::progress::ProgressArgs),

    /// Manage classes and enrollments
    Class(commands::class::ClassArgs),

    /// Manage students
    Student(commands::student::StudentArgs),

    /// Manage instructors
    Instructor(commands::instructor::InstructorArgs),

    /// List accepted apparatus, levels, class types and statuses
    Enums(commands::enums::EnumsArgs),

    /// Show the effective configuration
    Config(commands::config::ConfigArgs),
}
