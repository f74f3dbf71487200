//! cst enums - Accepted values for every closed vocabulary

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::core::taxonomy::{Apparatus, ClassType, Level, ProgressStatus};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct EnumsArgs {}

pub fn run(ctx: &AppContext, _args: &EnumsArgs) -> Result<()> {
    let groups: [(&str, Vec<&str>); 4] = [
        ("apparatus", Apparatus::ALL.iter().map(|v| v.as_str()).collect()),
        ("level", Level::ALL.iter().map(|v| v.as_str()).collect()),
        ("class_type", ClassType::ALL.iter().map(|v| v.as_str()).collect()),
        ("progress_status", ProgressStatus::ALL.iter().map(|v| v.as_str()).collect()),
    ];

    if ctx.robot_mode {
        let data: serde_json::Map<String, serde_json::Value> = groups
            .iter()
            .map(|(name, values)| ((*name).to_string(), serde_json::json!(values)))
            .collect();
        return super::emit_ok(ctx, data);
    }

    for (name, values) in &groups {
        println!("{}", name.bold());
        for value in values {
            println!("  {value}");
        }
    }
    Ok(())
}
