//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! The reducer only mutates state; anything that touches the playback
//! controller's run lifecycle (spawning/cancelling sequencer tasks) goes
//! through an effect.

use reel_core::story::Language;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,
    /// Replay the current story from the beginning.
    Reset,
    /// Skip to the fully revealed transcript.
    Advance,
    /// Switch to the story at `index` and start it from the beginning.
    SelectStory { index: usize },
    /// Switch the current story to `language`.
    SelectLanguage { language: Language },
}
