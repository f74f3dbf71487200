//! cst init - Create the data directory, database and default config

use std::fs;
use std::path::Path;

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::config::Config;
use crate::error::{CstError, Result};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config.toml with the defaults
    #[arg(long, short)]
    pub force: bool,
}

pub fn run(ctx: &AppContext, args: &InitArgs) -> Result<()> {
    let config_path = ctx.root.join("config.toml");
    let wrote_config = write_default_config(&config_path, args.force)?;
    let db_path = ctx.config.database_path(&ctx.root);

    if ctx.robot_mode {
        return super::emit_ok(
            ctx,
            serde_json::json!({
                "root": ctx.root.display().to_string(),
                "db": db_path.display().to_string(),
                "schema_version": ctx.db.schema_version(),
                "config": config_path.display().to_string(),
                "config_written": wrote_config,
            }),
        );
    }

    println!("{}", "Initializing cst...".bold());
    println!(
        "  {} database {} (schema v{})",
        "OK".green(),
        db_path.display(),
        ctx.db.schema_version()
    );
    if wrote_config {
        println!("  {} config {}", "OK".green(), config_path.display());
    } else {
        println!(
            "  {} config {} already exists (use --force to reset)",
            "!".yellow(),
            config_path.display()
        );
    }
    println!();
    println!("{} Initialized at {}", "✓".green().bold(), ctx.root.display());
    println!();
    println!("Load a catalog with:");
    println!("  cst import skills.yaml");
    Ok(())
}

fn write_default_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let rendered = toml::to_string_pretty(&Config::default())
        .map_err(|err| CstError::Config(format!("render default config: {err}")))?;
    fs::write(path, rendered)?;
    tracing::info!(path = %path.display(), "wrote default config");
    Ok(true)
}
