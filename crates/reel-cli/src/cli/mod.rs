//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use reel_core::config::Config;

mod commands;

#[derive(Parser)]
#[command(name = "reel")]
#[command(version)]
#[command(about = "Scripted chat playback in your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    play_args: PlayArgs,
}

/// Common playback arguments (also used when no subcommand is given).
#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct PlayArgs {
    /// Story to play (default from config)
    #[arg(long, value_name = "ID")]
    pub(crate) story: Option<String>,

    /// Language to play in (en or pt)
    #[arg(long, value_name = "LANG")]
    pub(crate) lang: Option<String>,

    /// Reveal the whole conversation at once, no typing delays
    #[arg(long)]
    pub(crate) immediate: bool,

    /// Extra directory of story JSON files
    #[arg(long, value_name = "DIR")]
    pub(crate) stories_dir: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List available stories
    Stories {
        /// Extra directory of story JSON files
        #[arg(long, value_name = "DIR")]
        stories_dir: Option<PathBuf>,
    },
    /// Write a story transcript to stdout (no TUI, no delays)
    Print {
        /// Story to print (default from config)
        #[arg(long, value_name = "ID")]
        story: Option<String>,

        /// Language to print in (en or pt)
        #[arg(long, value_name = "LANG")]
        lang: Option<String>,

        /// Extra directory of story JSON files
        #[arg(long, value_name = "DIR")]
        stories_dir: Option<PathBuf>,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand)]
enum ConfigAction {
    /// Print the config file path
    Path,
    /// Create a starter config file
    Init,
    /// Print the effective configuration as TOML
    Show,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    // Logging failures must not block playback; degrade and carry on.
    let _guard = match reel_core::logging::init() {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    };

    // Playback runs are tokio tasks; enter a runtime so the TUI loop can
    // spawn them while it owns the main thread.
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let _enter = runtime.enter();
    dispatch(cli, config)
}

fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        None => commands::play::run(&cli.play_args, &config),
        Some(Commands::Stories { stories_dir }) => {
            commands::stories::run(stories_dir.as_deref(), &config)
        }
        Some(Commands::Print {
            story,
            lang,
            stories_dir,
        }) => commands::print::run(
            story.as_deref(),
            lang.as_deref(),
            stories_dir.as_deref(),
            &config,
        ),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigAction::Init => commands::config::init(),
            ConfigAction::Show => commands::config::show(&config),
        },
    }
}
