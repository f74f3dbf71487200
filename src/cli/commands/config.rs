//! cst config - Show the effective configuration

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::{CstError, Result};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print one key (e.g. catalog.default_weeks)
    pub key: Option<String>,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    let value = serde_json::to_value(&ctx.config)?;

    if let Some(key) = &args.key {
        let found = key
            .split('.')
            .try_fold(&value, |node, part| node.get(part))
            .ok_or_else(|| CstError::Config(format!("unknown config key: {key}")))?;
        if ctx.robot_mode {
            return super::emit_ok(ctx, serde_json::json!({ "key": key, "value": found }));
        }
        println!("{found}");
        return Ok(());
    }

    if ctx.robot_mode {
        return super::emit_ok(
            ctx,
            serde_json::json!({
                "root": ctx.root.display().to_string(),
                "database": ctx.config.database_path(&ctx.root).display().to_string(),
                "config_path": ctx.config_path.as_ref().map(|p| p.display().to_string()),
                "config": value,
            }),
        );
    }

    let rendered = toml::to_string_pretty(&ctx.config)
        .map_err(|err| CstError::Config(format!("render config: {err}")))?;
    println!("{} {}", "# root:".dimmed(), ctx.root.display());
    println!(
        "{} {}",
        "# database:".dimmed(),
        ctx.config.database_path(&ctx.root).display()
    );
    println!("{rendered}");
    Ok(())
}
