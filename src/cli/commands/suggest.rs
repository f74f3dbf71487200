//! cst suggest - Skills due in a week of the year or on a date

use chrono::NaiveDateTime;
use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;

use super::skill::print_skill_table;
use super::{FilterArgs, parse_date_arg};

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Week of the year (1-53)
    #[arg(long, conflicts_with = "date", required_unless_present = "date")]
    pub week: Option<u32>,

    /// Calendar date (YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS]); the week is derived
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDateTime>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run(ctx: &AppContext, args: &SuggestArgs) -> Result<()> {
    let catalog = ctx.catalog();
    let filter = args.filter.filter();

    let (week, skills) = match (args.week, args.date) {
        (_, Some(date)) => {
            let suggestion = catalog.suggest_for_date(date, filter)?;
            (suggestion.week_of_year, suggestion.skills)
        }
        (Some(week), None) => (week, catalog.suggest_for_week(week, filter)?),
        (None, None) => {
            return Err(crate::error::CstError::ValidationFailed(
                "either --week or --date is required".to_string(),
            ));
        }
    };

    if ctx.robot_mode {
        return super::emit_ok(
            ctx,
            serde_json::json!({
                "week_of_year": week,
                "count": skills.len(),
                "skills": skills,
            }),
        );
    }

    println!("{} {}", "Week".bold(), week.to_string().cyan().bold());
    println!();
    print_skill_table(&skills);
    Ok(())
}
