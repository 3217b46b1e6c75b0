//! Playback event types.
//!
//! The sequencer emits these over a channel; the controller folds them into
//! the observable [`PlaybackState`](crate::player::PlaybackState). Events are
//! serializable for log/debug output.

use serde::{Deserialize, Serialize};

/// Events emitted by a playback run.
///
/// A cancelled run stops emitting at the point cancellation is observed;
/// there is no terminal "cancelled" event by design — the controller that
/// cancelled the run has already discarded its channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// The typing indicator turned on ahead of the next reveal.
    TypingStarted,

    /// `transcript[index]` became visible; the indicator turned off.
    ///
    /// Indices are emitted strictly in order, each exactly once.
    MessageRevealed { index: usize },

    /// The entire transcript became visible in one step (immediate mode).
    TranscriptRevealed,

    /// The run finished; nothing further will be emitted.
    PlaybackCompleted,
}
