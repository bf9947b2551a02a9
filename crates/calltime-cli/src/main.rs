mod cmd_config;
mod cmd_gifts;
mod cmd_recap;
mod cmd_share;
mod cmd_show;
mod present;
#[cfg(feature = "tui")]
mod tui;

use std::path::Path;
use std::sync::Mutex;

use calltime_store::{Config, SourceKind, StorePaths};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calltime", version, about = "Your year on set, wrapped")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive recap slideshow
    Show {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Fetch the recap and print it
    Recap {
        #[command(flatten)]
        target: TargetArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send thank-you gifts to collaborators
    Gifts {
        #[command(subcommand)]
        cmd: cmd_gifts::GiftsCmd,
    },
    /// Print the share payload and social compose link
    Share {
        #[command(flatten)]
        target: TargetArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        cmd: cmd_config::ConfigCmd,
    },
}

/// Which recap to work on. Unset flags fall back to the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// User whose recap to load
    #[arg(long)]
    pub user: Option<String>,
    /// Recap year
    #[arg(long)]
    pub year: Option<i32>,
    /// Data source: mock or http
    #[arg(long)]
    pub source: Option<String>,
}

impl TargetArgs {
    /// Load the config and apply these overrides on top.
    pub fn resolve(&self, paths: &StorePaths) -> anyhow::Result<Config> {
        let mut config = Config::load(paths)?;
        self.apply(&mut config)?;
        Ok(config)
    }

    fn apply(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(user) = &self.user {
            config.user_id = user.clone();
        }
        if let Some(year) = self.year {
            config.year = year;
        }
        if let Some(source) = &self.source {
            config.source = source.parse::<SourceKind>()?;
        }
        Ok(())
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
///
/// The interactive view owns the terminal, so it logs to a file instead of stderr.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,calltime=info"));
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let paths = StorePaths::discover();

    let interactive = cfg!(feature = "tui") && matches!(cli.cmd, Command::Show { .. });
    if interactive {
        paths.ensure_dirs()?;
        init_tracing(Some(&paths.log_file()))?;
    } else {
        init_tracing(None)?;
    }

    match cli.cmd {
        Command::Show { target } => cmd_show::execute(&paths, target.resolve(&paths)?),
        Command::Recap { target, json } => cmd_recap::execute(&target.resolve(&paths)?, json),
        Command::Gifts { cmd } => cmd_gifts::run(cmd, &paths),
        Command::Share { target, json } => cmd_share::execute(&target.resolve(&paths)?, json),
        Command::Config { cmd } => cmd_config::run(cmd, &paths),
    }
}
