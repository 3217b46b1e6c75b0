//! UI event types.
//!
//! The runtime collects these each loop iteration and feeds them through the
//! reducer in order.

use reel_core::player::PlayerEvent;

/// Events processed by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Periodic tick; drives the indicator animation and render cadence.
    Tick,
    /// Current terminal size, prepended every loop iteration so layout-aware
    /// handlers (scrolling) see fresh dimensions before other events.
    Frame { width: u16, height: u16 },
    /// Raw terminal input.
    Terminal(crossterm::event::Event),
    /// A playback event already applied to the controller state.
    Player(PlayerEvent),
}
