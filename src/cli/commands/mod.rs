//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use serde::Serialize;

use crate::app::AppContext;
use crate::cli::Commands;
use crate::cli::output::{emit_robot, robot_ok};
use crate::core::skill::SkillFilter;
use crate::core::taxonomy::{Apparatus, Level};
use crate::error::Result;

pub mod class;
pub mod config;
pub mod enums;
pub mod import;
pub mod init;
pub mod instructor;
pub mod plan;
pub mod progress;
pub mod skill;
pub mod student;
pub mod suggest;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::run(ctx, args),
        Commands::Import(args) => import::run(ctx, args),
        Commands::Skill(args) => skill::run(ctx, args),
        Commands::Suggest(args) => suggest::run(ctx, args),
        Commands::Plan(args) => plan::run(ctx, args),
        Commands::Progress(args) => progress::run(ctx, args),
        Commands::Class(args) => class::run(ctx, args),
        Commands::Student(args) => student::run(ctx, args),
        Commands::Instructor(args) => instructor::run(ctx, args),
        Commands::Enums(args) => enums::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}

/// Emit `data` wrapped in an ok robot response.
pub(crate) fn emit_ok<T: Serialize>(ctx: &AppContext, data: T) -> Result<()> {
    emit_ok_with_warnings(ctx, data, Vec::new())
}

pub(crate) fn emit_ok_with_warnings<T: Serialize>(
    ctx: &AppContext,
    data: T,
    warnings: Vec<String>,
) -> Result<()> {
    let response = robot_ok(data)
        .with_warnings(warnings)
        .configured(&ctx.config.robot);
    emit_robot(&response, &ctx.config.robot)
}

/// Shared `--apparatus` / `--level` filter flags.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only skills on this apparatus (e.g. silks, corde-lisse)
    #[arg(long, value_parser = parse_apparatus)]
    pub apparatus: Option<Apparatus>,

    /// Only skills at this level (e.g. beginner, tech-1)
    #[arg(long, value_parser = parse_level)]
    pub level: Option<Level>,
}

impl FilterArgs {
    #[must_use]
    pub const fn filter(&self) -> SkillFilter {
        SkillFilter::new(self.apparatus, self.level)
    }
}

pub(crate) fn parse_apparatus(raw: &str) -> std::result::Result<Apparatus, String> {
    raw.parse()
}

pub(crate) fn parse_level(raw: &str) -> std::result::Result<Level, String> {
    raw.parse()
}

pub(crate) fn parse_date_arg(raw: &str) -> std::result::Result<chrono::NaiveDateTime, String> {
    crate::core::weeks::parse_date_time(raw).map_err(|err| err.to_string())
}
