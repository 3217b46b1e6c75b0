//! Playback: the reveal sequencer and its controller.
//!
//! This module contains:
//! - `events`: event types emitted during a playback run
//! - `sequencer`: the timer-driven reveal loop (leaf, cancellable)
//! - `controller`: run lifecycle and the observable playback state

pub mod controller;
pub mod events;
pub mod sequencer;

pub use controller::{PlaybackController, PlaybackState};
pub use events::PlayerEvent;
pub use sequencer::{DelaySource, RunOutcome, UniformDelaySource};

/// How a transcript is played back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    /// Reveal one message at a time with typing delays in between.
    #[default]
    Animated,
    /// Reveal the whole transcript at once, no delays, no indicator.
    Immediate,
}
