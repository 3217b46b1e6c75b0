//! Playback controller.
//!
//! Owns the single live sequencer run and the observable [`PlaybackState`].
//! Replacing the transcript (or mode) cancels the old run's token and drops
//! its event channel in the same step, so a superseded run can never touch
//! the new state — its remaining emissions land in a closed channel.

use std::sync::Arc;

use tokio::sync::mpsc::error::TryRecvError;
use tokio_util::sync::CancellationToken;

use crate::player::events::PlayerEvent;
use crate::player::sequencer::{
    self, create_event_channel, DelaySource, PlayerEventRx, UniformDelaySource,
};
use crate::player::PlaybackMode;
use crate::story::{Message, Transcript};

/// Observable playback state.
///
/// `revealed` is always a contiguous prefix of the current transcript;
/// `typing` is true only in animated mode, strictly between reveals.
#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    pub revealed: Vec<Message>,
    pub typing: bool,
    pub mode: PlaybackMode,
}

/// The in-flight run: its cancellation token and event channel.
struct ActiveRun {
    cancel: CancellationToken,
    rx: PlayerEventRx,
}

/// Drives playback of one transcript at a time.
///
/// The state is owned exclusively here; the presentation layer reads
/// snapshots via [`state`](Self::state) and issues `supply`/`reset`/`advance`.
/// Generic over the delay source so tests run without wall-clock waits.
pub struct PlaybackController<D: DelaySource + Clone = UniformDelaySource> {
    transcript: Transcript,
    state: PlaybackState,
    run: Option<ActiveRun>,
    delays: D,
}

impl PlaybackController {
    /// A controller with production (randomized) delays and no transcript.
    pub fn new() -> Self {
        Self::with_delays(UniformDelaySource::default())
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DelaySource + Clone> PlaybackController<D> {
    pub fn with_delays(delays: D) -> Self {
        Self {
            transcript: Arc::default(),
            state: PlaybackState::default(),
            run: None,
            delays,
        }
    }

    /// Supplies a `(transcript, mode)` pair, restarting playback when either
    /// the transcript identity or the mode differs from the current pair.
    /// Re-supplying the identical pair is a no-op; use [`reset`](Self::reset)
    /// to force a replay.
    pub fn supply(&mut self, transcript: Transcript, mode: PlaybackMode) {
        if Arc::ptr_eq(&self.transcript, &transcript) && self.state.mode == mode {
            return;
        }
        self.restart(transcript, mode);
    }

    /// Replays the current transcript from empty in animated mode.
    pub fn reset(&mut self) {
        let transcript = Arc::clone(&self.transcript);
        self.restart(transcript, PlaybackMode::Animated);
    }

    /// Jumps the current transcript to fully revealed, with no indicator.
    /// Idempotent: once in immediate mode, further calls change nothing.
    pub fn advance(&mut self) {
        if self.state.mode == PlaybackMode::Immediate {
            return;
        }
        let transcript = Arc::clone(&self.transcript);
        self.restart(transcript, PlaybackMode::Immediate);
    }

    fn restart(&mut self, transcript: Transcript, mode: PlaybackMode) {
        // Neutralize the old run before the new one exists: cancel its token
        // and drop its channel so nothing it still emits can be observed.
        if let Some(run) = self.run.take() {
            run.cancel.cancel();
        }

        let same_transcript = Arc::ptr_eq(&self.transcript, &transcript);
        self.transcript = transcript;
        self.state.mode = mode;
        self.state.typing = false;
        if mode == PlaybackMode::Animated || !same_transcript {
            // revealed must stay a prefix of the current transcript.
            self.state.revealed.clear();
        }
        // Advancing the same transcript keeps the prior prefix on screen
        // until the full reveal applies, so it never flashes empty.

        let (events, rx) = create_event_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(sequencer::run(
            Arc::clone(&self.transcript),
            mode,
            self.delays.clone(),
            events,
            cancel.clone(),
        ));
        self.run = Some(ActiveRun { cancel, rx });
    }

    /// Applies all queued events without blocking and returns them.
    /// The UI calls this once per frame; a non-empty return means the
    /// observable state changed.
    pub fn drain_pending(&mut self) -> Vec<PlayerEvent> {
        let mut applied = Vec::new();
        loop {
            let event = match self.run.as_mut() {
                Some(run) => match run.rx.try_recv() {
                    Ok(event) => event,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        self.run = None;
                        break;
                    }
                },
                None => break,
            };
            self.apply(&event);
            applied.push(event);
        }
        applied
    }

    /// Awaits, applies, and returns the next event of the live run.
    /// Returns `None` once the run has finished (or none is live).
    pub async fn apply_next(&mut self) -> Option<PlayerEvent> {
        let received = match self.run.as_mut() {
            Some(run) => run.rx.recv().await,
            None => return None,
        };
        match received {
            Some(event) => {
                self.apply(&event);
                Some(event)
            }
            None => {
                self.run = None;
                None
            }
        }
    }

    fn apply(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::TypingStarted => self.state.typing = true,
            PlayerEvent::MessageRevealed { index } => {
                self.state.typing = false;
                // A reveal must extend the prefix by exactly one.
                if *index == self.state.revealed.len() {
                    if let Some(message) = self.transcript.get(*index) {
                        self.state.revealed.push(message.clone());
                    }
                }
            }
            PlayerEvent::TranscriptRevealed => {
                self.state.typing = false;
                self.state.revealed = (*self.transcript).clone();
            }
            PlayerEvent::PlaybackCompleted => self.state.typing = false,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// True while a run is live (events may still arrive).
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// True once everything is revealed and the indicator is off.
    pub fn is_complete(&self) -> bool {
        !self.state.typing && self.state.revealed.len() == self.transcript.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::player::sequencer::REVEAL_GAP;

    #[derive(Clone)]
    struct FixedDelays(Duration);

    impl DelaySource for FixedDelays {
        fn typing_delay(&mut self) -> Duration {
            self.0
        }
    }

    fn controller() -> PlaybackController<FixedDelays> {
        PlaybackController::with_delays(FixedDelays(Duration::from_millis(800)))
    }

    fn transcript(senders: &[&str]) -> Transcript {
        Arc::new(
            senders
                .iter()
                .enumerate()
                .map(|(i, sender)| Message::text(*sender, format!("msg {i}"), *sender == "You"))
                .collect(),
        )
    }

    async fn play_to_end(controller: &mut PlaybackController<FixedDelays>) {
        while controller.apply_next().await.is_some() {}
    }

    #[tokio::test(start_paused = true)]
    async fn test_animated_playback_reveals_prefixes_in_order() {
        let mut controller = controller();
        let transcript = transcript(&["Ana", "You", "Ana"]);
        controller.supply(Arc::clone(&transcript), PlaybackMode::Animated);
        assert!(!controller.is_complete());

        let mut seen_lengths = vec![controller.state().revealed.len()];
        while let Some(event) = controller.apply_next().await {
            let state = controller.state();
            // Prefix invariant: revealed always equals transcript[0..k].
            assert_eq!(state.revealed[..], transcript[..state.revealed.len()]);
            if matches!(event, PlayerEvent::MessageRevealed { .. }) {
                seen_lengths.push(state.revealed.len());
                assert!(!state.typing);
            }
        }

        assert_eq!(seen_lengths, vec![0, 1, 2, 3]);
        assert!(controller.is_complete());
        assert!(!controller.state().typing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_is_on_only_between_reveals() {
        let mut controller = controller();
        controller.supply(transcript(&["Ana", "You"]), PlaybackMode::Animated);

        let mut toggles = Vec::new();
        while let Some(event) = controller.apply_next().await {
            toggles.push((event, controller.state().typing));
        }

        assert_eq!(
            toggles,
            vec![
                (PlayerEvent::TypingStarted, true),
                (PlayerEvent::MessageRevealed { index: 0 }, false),
                (PlayerEvent::TypingStarted, true),
                (PlayerEvent::MessageRevealed { index: 1 }, false),
                (PlayerEvent::PlaybackCompleted, false),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_mode_single_transition() {
        let mut controller = controller();
        controller.supply(transcript(&["Ana", "You", "Ana"]), PlaybackMode::Immediate);

        let first = controller.apply_next().await;
        assert_eq!(first, Some(PlayerEvent::TranscriptRevealed));
        assert_eq!(controller.state().revealed.len(), 3);
        assert!(!controller.state().typing);

        play_to_end(&mut controller).await;
        assert!(controller.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_transcript_is_instantly_complete() {
        let mut controller = controller();
        controller.supply(transcript(&[]), PlaybackMode::Animated);
        play_to_end(&mut controller).await;
        assert!(controller.state().revealed.is_empty());
        assert!(!controller.state().typing);
        assert!(controller.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_mid_run_jumps_to_full_reveal() {
        let mut controller = controller();
        let transcript = transcript(&["Ana", "You", "Ana", "You"]);
        controller.supply(Arc::clone(&transcript), PlaybackMode::Animated);

        // Play until the first message is visible.
        loop {
            match controller.apply_next().await {
                Some(PlayerEvent::MessageRevealed { .. }) => break,
                Some(_) => {}
                None => panic!("run ended early"),
            }
        }
        assert_eq!(controller.state().revealed.len(), 1);

        controller.advance();
        // Indicator drops synchronously; partial progress stays until the
        // full reveal applies.
        assert!(!controller.state().typing);
        assert_eq!(controller.state().revealed.len(), 1);

        assert_eq!(
            controller.apply_next().await,
            Some(PlayerEvent::TranscriptRevealed)
        );
        assert_eq!(controller.state().revealed[..], transcript[..]);

        play_to_end(&mut controller).await;
        assert!(controller.is_complete());

        // Second advance is a no-op.
        let before = controller.state().revealed.len();
        controller.advance();
        assert!(!controller.is_running());
        assert_eq!(controller.state().revealed.len(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacing_transcript_discards_old_run() {
        let mut controller = controller();
        let first = transcript(&["Ana", "Ana", "Ana"]);
        controller.supply(Arc::clone(&first), PlaybackMode::Animated);

        loop {
            match controller.apply_next().await {
                Some(PlayerEvent::MessageRevealed { .. }) => break,
                Some(_) => {}
                None => panic!("run ended early"),
            }
        }

        let second = transcript(&["Rui", "Rui"]);
        controller.supply(Arc::clone(&second), PlaybackMode::Animated);
        assert!(controller.state().revealed.is_empty());

        play_to_end(&mut controller).await;
        assert_eq!(controller.state().revealed.len(), 2);
        assert!(
            controller
                .state()
                .revealed
                .iter()
                .all(|message| message.sender == "Rui"),
            "no element of the replaced transcript may survive"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_restarts_from_empty() {
        let mut controller = controller();
        let transcript = transcript(&["Ana", "You"]);
        controller.supply(Arc::clone(&transcript), PlaybackMode::Animated);
        play_to_end(&mut controller).await;
        assert!(controller.is_complete());

        controller.reset();
        assert!(controller.state().revealed.is_empty());
        assert!(!controller.is_complete());

        play_to_end(&mut controller).await;
        assert_eq!(controller.state().revealed[..], transcript[..]);
        assert!(controller.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn test_supplying_identical_pair_is_noop() {
        let mut controller = controller();
        let transcript = transcript(&["Ana"]);
        controller.supply(Arc::clone(&transcript), PlaybackMode::Animated);
        play_to_end(&mut controller).await;

        controller.supply(Arc::clone(&transcript), PlaybackMode::Animated);
        assert!(!controller.is_running());
        assert_eq!(controller.state().revealed.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_animated_cadence_walltime() {
        let mut controller = controller();
        let start = tokio::time::Instant::now();
        controller.supply(transcript(&["Ana", "You"]), PlaybackMode::Animated);
        play_to_end(&mut controller).await;
        assert_eq!(
            start.elapsed(),
            Duration::from_millis(2 * 800) + REVEAL_GAP
        );
    }
}
