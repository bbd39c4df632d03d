use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::TargetCommands;
use crate::config::Config;

pub const PAST_DATE_PROMPT: &str =
    "The selected date is in the past. The countdown will show all zeros. Continue?";

pub fn run(command: TargetCommands) -> Result<()> {
    let config = Config::load_or_default();
    let (mut dashboard, now) = super::open_dashboard(&config)?;

    match command {
        TargetCommands::Show => {
            let target = dashboard.countdown().target();
            println!("{}", target.raw());
            println!("{}", target.date_label().dimmed());
        }
        TargetCommands::Set { date, yes: true } => {
            dashboard.set_target(&date, now)?;
            println!("{}", dashboard.display().date_label.green());
        }
        TargetCommands::Set { date, yes: false } => {
            let target = dashboard.parse_target(&date)?;
            if target.is_past(now) {
                let confirmed = inquire::Confirm::new(PAST_DATE_PROMPT)
                    .with_default(false)
                    .prompt()?;
                if !confirmed {
                    println!("{}", "Target date unchanged.".yellow());
                    return Ok(());
                }
            }
            dashboard
                .apply_target(target, now)
                .context("Could not save the target date")?;
            println!("{}", dashboard.display().date_label.green());
        }
    }
    Ok(())
}
