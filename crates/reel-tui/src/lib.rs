//! Full-screen TUI for reel.

pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{stderr, IsTerminal};

use anyhow::Result;
pub use runtime::TuiRuntime;
use reel_core::config::Config;
use reel_core::player::PlaybackMode;
use reel_core::story::{Language, StoryLibrary};

use crate::state::AppState;

/// Runs interactive playback until the user quits.
///
/// Must be called from within a tokio runtime: playback runs are spawned as
/// tasks while this function drives the terminal on the current thread.
pub fn run_player(
    config: &Config,
    library: StoryLibrary,
    story: &str,
    language: Language,
    mode: PlaybackMode,
) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "Playback requires a terminal.\n\
             Use `reel print --story <id>` for non-interactive output."
        );
    }

    let state = AppState::new(config, library, story, language, mode);
    let mut runtime = TuiRuntime::new(state)?;
    runtime.run()
}
