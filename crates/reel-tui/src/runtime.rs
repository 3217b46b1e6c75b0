//! TUI runtime - owns the terminal, runs the event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: the reducer stays pure and produces
//! effects; this module executes them. Playback events are drained from the
//! controller each iteration and folded into the reducer's event stream.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use reel_core::interrupt;
use reel_core::player::PlaybackMode;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Poll/tick cadence while playback is live (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll cadence when nothing is animating; longer to reduce CPU usage.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    pub state: AppState,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Creates the runtime: installs restore hooks, enters the TUI screen.
    pub fn new(state: AppState) -> Result<Self> {
        // Hooks must be in place before the alternate screen is entered.
        terminal::install_panic_hook();
        interrupt::set_restore_hook(|| {
            let _ = terminal::restore_terminal();
        });
        interrupt::reset();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        Ok(Self {
            terminal,
            state,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until quit.
    pub fn run(&mut self) -> Result<()> {
        let mut dirty = true; // Start dirty to ensure initial render

        while !self.state.should_quit {
            if interrupt::is_interrupted() {
                self.state.should_quit = true;
                break;
            }

            let mut events = self.collect_events()?;

            // Prepend Frame with the current terminal size so layout-aware
            // handlers run against fresh dimensions.
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                // Ticks and playback changes trigger renders; key events
                // batch their visual result into the next tick.
                let marks_dirty = matches!(&event, UiEvent::Tick | UiEvent::Player(_));
                let effects = update::update(&mut self.state, event);
                if marks_dirty {
                    dirty = true;
                }
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal
                    .draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Collects events from the controller and the terminal.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events: Vec<UiEvent> = self
            .state
            .player
            .drain_pending()
            .into_iter()
            .map(UiEvent::Player)
            .collect();

        let tick_interval = if self.state.player.is_running() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        // Block until the next tick is due unless there is already work.
        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            // Drain any remaining buffered events (non-blocking)
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => self.state.should_quit = true,
            UiEffect::Reset => {
                self.state.player.reset();
                self.state.scroll.to_bottom();
            }
            UiEffect::Advance => {
                self.state.player.advance();
                self.state.scroll.to_bottom();
            }
            UiEffect::SelectStory { index } => {
                self.state.story_index = index;
                self.resupply();
            }
            UiEffect::SelectLanguage { language } => {
                self.state.language = language;
                self.resupply();
            }
        }
    }

    /// Re-resolves the current selection and hands it to the controller.
    /// Resolution returns a stable `Arc` per `(story, language)` pair, so
    /// only a genuine selection change restarts playback.
    fn resupply(&mut self) {
        let story_id = self.state.current_story().id.clone();
        let transcript = self.state.library.resolve(&story_id, self.state.language);
        self.state.player.supply(transcript, PlaybackMode::Animated);
        self.state.scroll.to_bottom();
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
