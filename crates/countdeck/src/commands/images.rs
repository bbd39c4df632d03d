use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::ImageCommands;
use crate::config::Config;
use crate::data_url::{self, FileBlob};
use crate::slideshow::SAVE_WARNING;

pub fn run(command: ImageCommands) -> Result<()> {
    let config = Config::load_or_default();
    let (mut dashboard, now) = super::open_dashboard(&config)?;

    match command {
        ImageCommands::Add { files } => {
            for file in &files {
                if !file.is_file() {
                    anyhow::bail!("File not found: {}", file.display());
                }
            }
            let blobs: Vec<FileBlob> = files.into_iter().map(FileBlob::Path).collect();
            let before = dashboard.slideshow().len();

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime
                .block_on(dashboard.add_images(&blobs, now))
                .context(SAVE_WARNING)?;

            let added = dashboard.slideshow().len() - before;
            println!(
                "{} {added} photo(s), {} in total",
                "Added".green().bold(),
                dashboard.slideshow().len()
            );
        }
        ImageCommands::List => {
            let images = dashboard.slideshow().images();
            if images.is_empty() {
                println!("{}", "No photos in the slideshow.".dimmed());
            }
            for (i, url) in images.iter().enumerate() {
                match data_url::decode(url) {
                    Ok(decoded) => println!(
                        "{:>3}. {} ({} bytes)",
                        i + 1,
                        decoded.mime,
                        decoded.bytes.len()
                    ),
                    Err(e) => println!("{:>3}. {}", i + 1, format!("unreadable: {e}").red()),
                }
            }
        }
        ImageCommands::Clear => {
            let count = dashboard.slideshow().len();
            dashboard.clear_images(now);
            println!("{} {count} photo(s)", "Removed".green().bold());
        }
    }
    Ok(())
}
