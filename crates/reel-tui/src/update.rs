//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use reel_core::interrupt;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::render;
use crate::state::AppState;

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            // Advance the typing indicator animation.
            app.indicator_frame = app.indicator_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            app.viewport = (width, height);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, &term_event),
        // Playback state is already applied by the controller; the event's
        // arrival is what makes this frame dirty.
        UiEvent::Player(_) => vec![],
    }
}

fn handle_terminal_event(app: &mut AppState, event: &Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, *key),
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        // Raw mode swallows the signal, so the key event feeds the same
        // interrupt path: second press force-exits through the restore hook.
        interrupt::trigger_ctrl_c();
        return vec![UiEffect::Quit];
    }

    let (total_lines, viewport) = transcript_metrics(app);
    let page = viewport.saturating_sub(1).max(1);

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => vec![UiEffect::Quit],
        KeyCode::Char('r') => vec![UiEffect::Reset],
        KeyCode::Char(' ') | KeyCode::Enter => vec![UiEffect::Advance],
        KeyCode::Left => vec![UiEffect::SelectStory {
            index: app.story_neighbor(-1),
        }],
        KeyCode::Right => vec![UiEffect::SelectStory {
            index: app.story_neighbor(1),
        }],
        KeyCode::Char('l') => vec![UiEffect::SelectLanguage {
            language: app.language.toggled(),
        }],
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll.scroll_up(1, total_lines, viewport);
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll.scroll_down(1, total_lines, viewport);
            vec![]
        }
        KeyCode::PageUp => {
            app.scroll.scroll_up(page, total_lines, viewport);
            vec![]
        }
        KeyCode::PageDown => {
            app.scroll.scroll_down(page, total_lines, viewport);
            vec![]
        }
        KeyCode::Home => {
            app.scroll.to_top();
            vec![]
        }
        KeyCode::End => {
            app.scroll.to_bottom();
            vec![]
        }
        _ => vec![],
    }
}

fn transcript_metrics(app: &AppState) -> (usize, usize) {
    let (width, height) = app.viewport;
    let content_width = render::transcript_content_width(width);
    let viewport = render::transcript_viewport_height(height);
    (
        render::transcript_lines(app, content_width).len(),
        viewport,
    )
}

#[cfg(test)]
mod tests {
    use reel_core::config::Config;
    use reel_core::player::PlaybackMode;
    use reel_core::story::{Language, StoryLibrary};

    use super::*;

    fn app() -> AppState {
        let library = StoryLibrary::load(None).unwrap().library;
        let mut app = AppState::new(
            &Config::default(),
            library,
            "welcome",
            Language::En,
            PlaybackMode::Animated,
        );
        app.viewport = (80, 24);
        app
    }

    fn press(app: &mut AppState, code: KeyCode) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))),
        )
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), vec![UiEffect::Quit]);
        assert_eq!(press(&mut app, KeyCode::Esc), vec![UiEffect::Quit]);
    }

    #[tokio::test]
    async fn test_playback_control_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('r')), vec![UiEffect::Reset]);
        assert_eq!(press(&mut app, KeyCode::Char(' ')), vec![UiEffect::Advance]);
        assert_eq!(press(&mut app, KeyCode::Enter), vec![UiEffect::Advance]);
    }

    #[tokio::test]
    async fn test_story_cycling_wraps() {
        let mut app = app();
        let count = app.library.stories().len();
        assert_eq!(
            press(&mut app, KeyCode::Right),
            vec![UiEffect::SelectStory { index: 1 }]
        );
        assert_eq!(
            press(&mut app, KeyCode::Left),
            vec![UiEffect::SelectStory { index: count - 1 }]
        );
    }

    #[tokio::test]
    async fn test_language_toggle() {
        let mut app = app();
        assert_eq!(
            press(&mut app, KeyCode::Char('l')),
            vec![UiEffect::SelectLanguage {
                language: Language::Pt
            }]
        );
    }

    #[tokio::test]
    async fn test_scroll_keys_unpin_and_repin() {
        let mut app = app();
        app.player.advance();
        while app.player.apply_next().await.is_some() {}

        press(&mut app, KeyCode::Up);
        assert!(!app.scroll.follow);
        press(&mut app, KeyCode::End);
        assert!(app.scroll.follow);
    }

    #[tokio::test]
    async fn test_tick_advances_indicator() {
        let mut app = app();
        let before = app.indicator_frame;
        update(&mut app, UiEvent::Tick);
        assert_eq!(app.indicator_frame, before + 1);
    }
}
