pub mod completion;
pub mod config;
pub mod images;
pub mod status;
pub mod target;

use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::display::DisplayState;
use crate::store::FileStore;
use crate::timer::{Clock, Millis, SystemClock};

pub type CliDashboard = Dashboard<FileStore, DisplayState, Local>;

/// Open the persisted state the same way the window does.
pub fn open_dashboard(config: &Config) -> Result<(CliDashboard, Millis)> {
    let store = config.open_store()?;
    tracing::debug!("Using store {}", store.path().display());
    let now = SystemClock.now_ms();
    let dashboard = Dashboard::open(
        store,
        DisplayState::default(),
        Local,
        config.advance_interval_ms(),
        now,
    );
    Ok((dashboard, now))
}

pub fn print_version() {
    println!(
        "{} {}",
        "countdeck".bold(),
        env!("CARGO_PKG_VERSION").green()
    );
}
