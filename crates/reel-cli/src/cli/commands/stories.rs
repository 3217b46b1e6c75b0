//! Story listing command.

use std::path::Path;

use anyhow::Result;
use comfy_table::Table;
use reel_core::config::Config;

use super::load_library;

pub fn run(stories_dir: Option<&Path>, config: &Config) -> Result<()> {
    let library = load_library(config, stories_dir)?;

    let mut table = Table::new();
    table.set_header(["ID", "NAME", "LANGUAGES", "MESSAGES"]);
    for story in library.stories() {
        let languages = story
            .languages()
            .map(|language| language.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let messages = story
            .languages()
            .map(|language| format!("{}: {}", language, story.message_count(language)))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row([story.id.clone(), story.name.clone(), languages, messages]);
    }
    println!("{table}");
    Ok(())
}
