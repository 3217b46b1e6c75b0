//! Non-interactive transcript output.
//!
//! The immediate-mode path without a UI: resolves a transcript and writes it
//! to stdout, one message per line, media attachments indented beneath.
//! Suitable for pipes and exercised by the integration tests.

use std::path::Path;

use anyhow::Result;
use reel_core::config::Config;
use reel_core::story::Language;
use reel_tui::render::media_label;

use super::load_library;

pub fn run(
    story: Option<&str>,
    lang: Option<&str>,
    stories_dir: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let library = load_library(config, stories_dir)?;

    let story = story.unwrap_or(&config.story);
    let language = match lang {
        Some(lang) => lang.parse::<Language>()?,
        None => config.language,
    };

    let transcript = library.resolve(story, language);
    for message in transcript.iter() {
        if message.timestamp.is_empty() {
            println!("{}: {}", message.sender, message.text);
        } else {
            println!("[{}] {}: {}", message.timestamp, message.sender, message.text);
        }
        if let Some(media) = message.media() {
            println!("    {}", media_label(media));
        }
    }
    Ok(())
}
