use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "countdeck")]
#[command(author, version, about)]
#[command(long_about = "A countdown timer with a photo slideshow.\n\n\
    Counts down to a target date and cycles through your photos.\n\n\
    Examples:\n  \
    countdeck                              Open the countdown window\n  \
    countdeck status                       Print the time remaining\n  \
    countdeck target set 2028-10-01T00:00  Change the target date\n  \
    countdeck images add *.jpg             Add photos to the slideshow")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch fullscreen instead of in a window
    #[arg(long, global = false)]
    pub fullscreen: bool,

    /// Keep the target date and photos in memory only
    #[arg(long, global = false)]
    pub ephemeral: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the time remaining and slideshow summary
    Status,

    /// Show or change the target date
    Target {
        #[command(subcommand)]
        command: TargetCommands,
    },

    /// Manage slideshow photos
    Images {
        #[command(subcommand)]
        command: ImageCommands,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum TargetCommands {
    /// Display the current target date
    Show,

    /// Set a new target date (e.g. 2028-10-01T00:00)
    Set {
        /// Date and time, in local time unless an offset is given
        date: String,

        /// Apply a date in the past without asking
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ImageCommands {
    /// Append photos to the slideshow
    Add {
        /// Image files to add, in display order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List the stored photos
    List,

    /// Remove all photos
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, slideshow.interval_secs)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        if self.command.is_some() && (self.fullscreen || self.ephemeral) {
            anyhow::bail!("--fullscreen and --ephemeral only apply when opening the window");
        }
        match self.command {
            Some(Commands::Status) => crate::commands::status::run(),
            Some(Commands::Target { command }) => crate::commands::target::run(command),
            Some(Commands::Images { command }) => crate::commands::images::run(command),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::commands::print_version();
                Ok(())
            }
            None => crate::app::run(self.fullscreen, self.ephemeral),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_target_set() {
        let cli = Cli::try_parse_from(["countdeck", "target", "set", "2028-10-01T00:00", "--yes"])
            .unwrap();
        match cli.command {
            Some(Commands::Target {
                command: TargetCommands::Set { date, yes },
            }) => {
                assert_eq!(date, "2028-10-01T00:00");
                assert!(yes);
            }
            _ => panic!("expected target set"),
        }
    }

    #[test]
    fn test_images_add_requires_files() {
        assert!(Cli::try_parse_from(["countdeck", "images", "add"]).is_err());
        let cli = Cli::try_parse_from(["countdeck", "-v", "images", "add", "a.jpg", "b.png"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(
            cli.command,
            Some(Commands::Images {
                command: ImageCommands::Add { ref files }
            }) if files.len() == 2
        ));
    }

    #[test]
    fn test_window_flags() {
        let cli = Cli::try_parse_from(["countdeck", "--fullscreen", "--ephemeral"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.fullscreen);
        assert!(cli.ephemeral);
    }

    #[test]
    fn test_global_flags_before_subcommand() {
        let cli = Cli::try_parse_from(["countdeck", "--no-color", "-q", "status"]).unwrap();
        assert!(cli.no_color);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::Status)));

        let cli = Cli::try_parse_from(["countdeck", "-vv", "target", "show"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_window_flags_rejected_with_subcommand() {
        let cli = Cli::try_parse_from(["countdeck", "--fullscreen", "version"]).unwrap();
        let err = cli.run().unwrap_err();
        assert!(err.to_string().contains("only apply when opening the window"));
    }
}
