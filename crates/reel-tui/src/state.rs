//! Application state for the TUI.
//!
//! `AppState` composes the story selection, the playback controller, and the
//! purely visual bits (scroll position, indicator animation frame). The
//! reducer in `update.rs` is the only place that mutates it in response to
//! events; the runtime mutates it only through effect execution.

use reel_core::config::Config;
use reel_core::player::{PlaybackController, PlaybackMode};
use reel_core::story::{Language, Story, StoryLibrary};

/// Transcript scroll state.
///
/// While `follow` is set the view stays pinned to the newest line; any manual
/// scroll up unpins it, and scrolling back to the bottom re-pins.
#[derive(Debug, Clone, Copy)]
pub struct ScrollState {
    pub offset: usize,
    pub follow: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            follow: true,
        }
    }
}

impl ScrollState {
    /// The line offset to render given content and viewport heights.
    pub fn effective_offset(&self, total_lines: usize, viewport: usize) -> usize {
        let max = total_lines.saturating_sub(viewport);
        if self.follow { max } else { self.offset.min(max) }
    }

    pub fn scroll_up(&mut self, lines: usize, total_lines: usize, viewport: usize) {
        self.offset = self
            .effective_offset(total_lines, viewport)
            .saturating_sub(lines);
        self.follow = false;
    }

    pub fn scroll_down(&mut self, lines: usize, total_lines: usize, viewport: usize) {
        let max = total_lines.saturating_sub(viewport);
        self.offset = self.effective_offset(total_lines, viewport) + lines;
        if self.offset >= max {
            self.to_bottom();
        }
    }

    pub fn to_top(&mut self) {
        self.offset = 0;
        self.follow = false;
    }

    pub fn to_bottom(&mut self) {
        self.follow = true;
    }
}

/// Top-level TUI state.
pub struct AppState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// All stories known to this run.
    pub library: StoryLibrary,
    /// Index of the selected story within the library.
    pub story_index: usize,
    /// Selected language.
    pub language: Language,
    /// Playback controller (owns the live run and the revealed prefix).
    pub player: PlaybackController,
    /// Transcript scroll state.
    pub scroll: ScrollState,
    /// Typing indicator animation counter, advanced on Tick.
    pub indicator_frame: usize,
    /// Last seen terminal size, updated by the per-loop Frame event.
    pub viewport: (u16, u16),
}

impl AppState {
    /// Builds the initial state and starts playback of the selected story.
    pub fn new(config: &Config, library: StoryLibrary, story: &str, language: Language, mode: PlaybackMode) -> Self {
        let story_index = library.position(story).unwrap_or_else(|| {
            tracing::warn!(story, "unknown story id, starting with the first story");
            0
        });
        let mut player = PlaybackController::with_delays(config.timing.delay_source());
        let transcript = library.resolve(&library.stories()[story_index].id, language);
        player.supply(transcript, mode);

        Self {
            should_quit: false,
            library,
            story_index,
            language,
            player,
            scroll: ScrollState::default(),
            indicator_frame: 0,
            viewport: (0, 0),
        }
    }

    pub fn current_story(&self) -> &Story {
        &self.library.stories()[self.story_index]
    }

    /// Story index to the left/right of the current one, wrapping.
    pub fn story_neighbor(&self, step: isize) -> usize {
        let count = self.library.stories().len() as isize;
        ((self.story_index as isize + step).rem_euclid(count)) as usize
    }
}
