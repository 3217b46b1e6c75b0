//! Interactive playback command (the default).

use anyhow::{Context, Result};
use reel_core::config::Config;
use reel_core::player::PlaybackMode;
use reel_core::{interrupt, story::Language};

use super::load_library;
use crate::cli::PlayArgs;

pub fn run(args: &PlayArgs, config: &Config) -> Result<()> {
    let library = load_library(config, args.stories_dir.as_deref())?;

    let story = args.story.as_deref().unwrap_or(&config.story);
    let language = match args.lang.as_deref() {
        Some(lang) => lang.parse::<Language>()?,
        None => config.language,
    };
    let mode = if args.immediate {
        PlaybackMode::Immediate
    } else {
        PlaybackMode::Animated
    };

    interrupt::init();
    tracing::info!(story, %language, ?mode, "starting playback");

    reel_tui::run_player(config, library, story, language, mode)
        .context("interactive playback failed")
}
