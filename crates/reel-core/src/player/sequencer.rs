//! The reveal sequencer.
//!
//! `run` drives a transcript from hidden to fully revealed, emitting
//! [`PlayerEvent`]s over a channel. It owns no state: the controller applies
//! the events it emits. Cancellation is cooperative — the token is checked at
//! every suspension point, and once cancellation is observed nothing further
//! is emitted.

use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::player::events::PlayerEvent;
use crate::player::PlaybackMode;
use crate::story::Transcript;

/// Shortest simulated typing delay.
pub const TYPING_DELAY_MIN: Duration = Duration::from_millis(500);

/// Longest simulated typing delay (exclusive).
pub const TYPING_DELAY_MAX: Duration = Duration::from_millis(3000);

/// Pause between a reveal and the next typing indicator.
pub const REVEAL_GAP: Duration = Duration::from_millis(300);

/// Event channel capacity. A run emits at most two events per message
/// between suspensions, so a small buffer never blocks the timer loop.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Channel-based event receiver for a playback run.
pub type PlayerEventRx = mpsc::Receiver<PlayerEvent>;

/// Creates the event channel for one playback run.
pub fn create_event_channel() -> (EventSender, PlayerEventRx) {
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    (EventSender { tx }, rx)
}

/// Event sender handed to a run.
///
/// Send failures are ignored: a closed channel means the controller has
/// already replaced this run, and a replaced run's emissions must vanish.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<PlayerEvent>,
}

impl EventSender {
    async fn send(&self, event: PlayerEvent) {
        let _ = self.tx.send(event).await;
    }
}

/// Source of playback delays.
///
/// A trait seam rather than an inline RNG call so tests can inject fixed
/// durations and assert on ordering without wall-clock waits.
pub trait DelaySource: Send + 'static {
    /// Duration the typing indicator stays up before the next reveal.
    fn typing_delay(&mut self) -> Duration;

    /// Pause after a reveal, before the next typing indicator.
    fn reveal_gap(&mut self) -> Duration {
        REVEAL_GAP
    }
}

/// Production delay source: uniformly random typing delays.
///
/// The randomness is deliberate — it makes playback feel like a live
/// conversation rather than a metronome.
#[derive(Debug, Clone)]
pub struct UniformDelaySource {
    min: Duration,
    max: Duration,
    gap: Duration,
}

impl UniformDelaySource {
    pub fn new(min: Duration, max: Duration, gap: Duration) -> Self {
        Self { min, max, gap }
    }
}

impl Default for UniformDelaySource {
    fn default() -> Self {
        Self::new(TYPING_DELAY_MIN, TYPING_DELAY_MAX, REVEAL_GAP)
    }
}

impl DelaySource for UniformDelaySource {
    fn typing_delay(&mut self) -> Duration {
        if self.max <= self.min {
            // Degenerate range (possible via config): fixed delay.
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..self.max)
    }

    fn reveal_gap(&mut self) -> Duration {
        self.gap
    }
}

/// How a playback run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The full transcript was revealed.
    Completed,
    /// Cancellation was observed; emission stopped at that point.
    Cancelled,
}

/// Plays `transcript` to completion in `mode`.
///
/// Animated mode emits, per message: `TypingStarted`, a cancellable typing
/// delay, `MessageRevealed`, and (between messages) a cancellable fixed gap.
/// Immediate mode emits a single `TranscriptRevealed`. Both end with
/// `PlaybackCompleted`. An empty transcript completes trivially.
pub async fn run<D: DelaySource>(
    transcript: Transcript,
    mode: PlaybackMode,
    mut delays: D,
    events: EventSender,
    cancel: CancellationToken,
) -> RunOutcome {
    if cancel.is_cancelled() {
        return RunOutcome::Cancelled;
    }

    if mode == PlaybackMode::Immediate {
        events.send(PlayerEvent::TranscriptRevealed).await;
        events.send(PlayerEvent::PlaybackCompleted).await;
        return RunOutcome::Completed;
    }

    let total = transcript.len();
    for index in 0..total {
        events.send(PlayerEvent::TypingStarted).await;

        if !sleep_unless_cancelled(delays.typing_delay(), &cancel).await {
            return RunOutcome::Cancelled;
        }

        events.send(PlayerEvent::MessageRevealed { index }).await;

        if index + 1 < total && !sleep_unless_cancelled(delays.reveal_gap(), &cancel).await {
            return RunOutcome::Cancelled;
        }
    }

    events.send(PlayerEvent::PlaybackCompleted).await;
    RunOutcome::Completed
}

/// Sleeps for `duration`, returning false if cancellation was observed.
///
/// The token is re-checked after the timer fires so a cancellation that
/// raced the deadline still wins.
async fn sleep_unless_cancelled(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        () = cancel.cancelled() => return false,
        () = tokio::time::sleep(duration) => {}
    }
    !cancel.is_cancelled()
}
