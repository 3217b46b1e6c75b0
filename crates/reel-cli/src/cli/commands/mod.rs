//! CLI command handlers.

pub mod config;
pub mod play;
pub mod print;
pub mod stories;

use std::path::Path;

use anyhow::Result;
use reel_core::config::Config;
use reel_core::story::StoryLibrary;

/// Loads the story library, preferring a command-line directory over the
/// configured one. Loader warnings go to stderr; they never abort.
pub(crate) fn load_library(config: &Config, override_dir: Option<&Path>) -> Result<StoryLibrary> {
    let dir = override_dir.or(config.stories_dir.as_deref());
    let outcome = StoryLibrary::load(dir)?;
    for warning in &outcome.warnings {
        eprintln!(
            "Warning: {} ({})",
            warning.message,
            warning.path.display()
        );
    }
    Ok(outcome.library)
}
