use anyhow::Result;
use colored::Colorize;

use crate::config::Config;

pub fn run() -> Result<()> {
    let config = Config::load_or_default();
    let (mut dashboard, now) = super::open_dashboard(&config)?;
    let fields = dashboard.tick(now);
    let display = dashboard.display();

    println!("{}", display.title.bold());
    println!("{}", display.date_label.dimmed());
    println!();
    println!(
        "  {} days  {} hours  {} minutes  {} seconds",
        fields.days.cyan().bold(),
        fields.hours.cyan().bold(),
        fields.minutes.cyan().bold(),
        fields.seconds.cyan().bold(),
    );
    println!();

    let slideshow = dashboard.slideshow();
    if slideshow.is_empty() {
        println!("{}", "No photos in the slideshow.".dimmed());
    } else {
        println!("{} photo(s) in the slideshow.", slideshow.len());
    }
    Ok(())
}
