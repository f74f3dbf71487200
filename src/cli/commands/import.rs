//! cst import - Load a YAML or JSON skill catalog

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::catalog::import_catalog;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Catalog file (.yaml, .yml or .json)
    pub file: PathBuf,
}

pub fn run(ctx: &AppContext, args: &ImportArgs) -> Result<()> {
    let report = import_catalog(&ctx.db, &args.file, &ctx.config.catalog)?;

    if ctx.robot_mode {
        let warnings = report.warnings.clone();
        return super::emit_ok_with_warnings(ctx, report, warnings);
    }

    println!(
        "{} Imported {} ({} created, {} updated)",
        "✓".green().bold(),
        args.file.display(),
        report.created,
        report.updated
    );
    println!(
        "  {} parent links, {} sibling links",
        report.parents_linked, report.siblings_linked
    );
    if !report.warnings.is_empty() {
        println!();
        println!("{}", "Warnings:".yellow().bold());
        for warning in &report.warnings {
            println!("  {} {warning}", "!".yellow());
        }
    }
    Ok(())
}
