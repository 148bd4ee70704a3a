//! The typewriter core: a queue, a state machine, and a paced drain loop.
//!
//! # Architecture
//!
//! Producers push arbitrarily-sized chunks of text; the engine re-emits them
//! in small, time-paced increments through an output callback. Each tick the
//! engine converts elapsed time into a character budget (see
//! [`PacingConfig`]), removes that many grapheme clusters from the front of
//! its queue, and hands the slice to the consumer. The engine never reads a
//! clock: tick timestamps arrive from outside, and future ticks are
//! requested through the injected [`TickScheduler`].
//!
//! The drain loop self-terminates on queue exhaustion (`Done`), `pause`,
//! `stop`, and `reset`. A tick delivered after its request was cancelled
//! re-checks state and does nothing, so cancellation is race-free at the
//! engine layer even when the tick source free-runs.

use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

use super::pacing::PacingConfig;
use super::state::TypewriterState;
use crate::clock::{TickHandle, TickScheduler};

/// Output callback: receives each emitted slice, never empty.
pub type OutputFn = Box<dyn FnMut(&str) + Send>;

/// State-change callback: receives each committed state, in order.
pub type StateFn = Box<dyn FnMut(TypewriterState) + Send>;

/// A rate-paced, pausable typewriter over streamed text.
///
/// Text pushed while `Idle` or `Done` starts draining automatically; this is
/// the primary ergonomic contract, so consumers rarely call
/// [`start`](Self::start) themselves. Once [`stop`](Self::stop)ped, the
/// engine refuses to run again until an explicit [`reset`](Self::reset).
///
/// ```rust
/// use std::time::Duration;
/// use teletype::{ManualScheduler, Typewriter, TypewriterState};
///
/// let mut tw = Typewriter::new(ManualScheduler::new(), |delta| print!("{delta}"));
/// tw.push("# Hello\nworld");
/// assert_eq!(tw.state(), TypewriterState::Running);
///
/// tw.tick(Duration::ZERO);                // re-basing tick: minimum budget
/// tw.tick(Duration::from_millis(100));    // 60 cps × 0.1 s = 6 chars
/// tw.flush();                             // emit whatever remains at once
/// assert_eq!(tw.state(), TypewriterState::Done);
/// assert!(tw.queued().is_empty());
/// ```
pub struct Typewriter<S: TickScheduler> {
    /// Pushed-but-not-yet-emitted text, drained from the front.
    queue: String,
    /// Current lifecycle state.
    state: TypewriterState,
    /// Pacing parameters; `chars_per_second` is runtime-mutable.
    pacing: PacingConfig,
    /// Timestamp of the previous tick; `None` right after draining
    /// (re)starts, so the first tick re-bases the clock.
    last_tick: Option<Duration>,
    /// Outstanding tick request, if any.
    pending: Option<TickHandle>,
    /// Tick source.
    scheduler: S,
    /// Consumer of emitted slices.
    on_output: OutputFn,
    /// Optional observer of committed state transitions.
    on_state: Option<StateFn>,
}

impl<S: TickScheduler> Typewriter<S> {
    /// Create a typewriter with default pacing.
    pub fn new(scheduler: S, on_output: impl FnMut(&str) + Send + 'static) -> Self {
        Self::with_config(PacingConfig::default(), scheduler, on_output)
    }

    /// Create a typewriter with custom pacing.
    pub fn with_config(
        pacing: PacingConfig,
        scheduler: S,
        on_output: impl FnMut(&str) + Send + 'static,
    ) -> Self {
        Self {
            queue: String::new(),
            state: TypewriterState::Idle,
            pacing,
            last_tick: None,
            pending: None,
            scheduler,
            on_output: Box::new(on_output),
            on_state: None,
        }
    }

    /// Attach a state-change observer.
    ///
    /// Invoked exactly once per committed transition, never for rejected or
    /// self transitions.
    pub fn on_state_change(mut self, on_state: impl FnMut(TypewriterState) + Send + 'static) -> Self {
        self.on_state = Some(Box::new(on_state));
        self
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> TypewriterState {
        self.state
    }

    /// The pushed-but-not-yet-emitted text.
    pub fn queued(&self) -> &str {
        &self.queue
    }

    /// Number of grapheme clusters waiting in the queue.
    ///
    /// Walks the queue, so this is O(queued text); the drain loop itself
    /// never needs the full count.
    pub fn queued_clusters(&self) -> usize {
        self.queue.graphemes(true).count()
    }

    /// The pacing parameters currently in effect.
    pub const fn pacing(&self) -> &PacingConfig {
        &self.pacing
    }

    /// The injected tick scheduler.
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Whether a tick request is outstanding.
    pub const fn has_pending_tick(&self) -> bool {
        self.pending.is_some()
    }

    /// Append `text` to the queue.
    ///
    /// No-op for empty text. If the engine is `Idle` or `Done` this starts
    /// draining; while `Paused` or `Stopped` the text only buffers.
    pub fn push(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.queue.push_str(text);
        if matches!(self.state, TypewriterState::Idle | TypewriterState::Done) {
            self.start();
        }
    }

    /// Begin (or re-begin) draining on the tick schedule.
    ///
    /// No-op while already `Running`. Refused while `Stopped`:
    /// [`reset`](Self::reset) is the only way out of `Stopped`.
    pub fn start(&mut self) {
        if self.state.is_running() || self.state == TypewriterState::Stopped {
            return;
        }
        self.transition(TypewriterState::Running);
        // Re-base the pacing clock: the first tick of this drain measures
        // elapsed time from its own timestamp, not from a previous run.
        self.last_tick = None;
        self.arm();
    }

    /// Suspend draining, keeping the queue untouched.
    ///
    /// Only effective while `Running`.
    pub fn pause(&mut self) {
        if !self.state.is_running() {
            return;
        }
        self.transition(TypewriterState::Paused);
        self.disarm();
    }

    /// Continue draining after a [`pause`](Self::pause).
    ///
    /// Only effective while `Paused`.
    pub fn resume(&mut self) {
        if self.state != TypewriterState::Paused {
            return;
        }
        self.start();
    }

    /// Emit the entire remaining queue as one slice and finish.
    ///
    /// No-op (including no state change) when the queue is already empty.
    pub fn flush(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let all = std::mem::take(&mut self.queue);
        tracing::debug!(bytes = all.len(), "flushing remaining queue");
        (self.on_output)(&all);
        self.transition(TypewriterState::Done);
        self.disarm();
    }

    /// Halt output. The queue is retained but will not drain again until a
    /// [`reset`](Self::reset).
    pub fn stop(&mut self) {
        self.transition(TypewriterState::Stopped);
        self.disarm();
    }

    /// Clear the queue and return to `Idle`.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.transition(TypewriterState::Idle);
        self.disarm();
    }

    /// Change the base emission rate, clamped to a minimum of 1 cps.
    ///
    /// Takes effect from the next tick's budget.
    pub fn set_speed(&mut self, chars_per_second: u32) {
        self.pacing.chars_per_second = chars_per_second.max(1);
    }

    /// Run one drain step at timestamp `now`.
    ///
    /// `now` is an offset from the tick source's epoch and must be
    /// monotonically non-decreasing across calls; a non-increasing pair
    /// saturates to zero elapsed time. A tick with no outstanding request,
    /// or delivered while not `Running`, is discarded without rescheduling.
    pub fn tick(&mut self, now: Duration) {
        if self.pending.is_none() || !self.state.is_running() {
            return;
        }
        self.pending = None;

        let dt = self
            .last_tick
            .map_or(Duration::ZERO, |prev| now.saturating_sub(prev));
        self.last_tick = Some(now);

        if self.queue.is_empty() {
            // Natural termination: the queue ran dry.
            self.transition(TypewriterState::Done);
            return;
        }

        // An exact cluster count would cost O(queue); the clamp only needs
        // to know whether fewer than the cap remain, so count that far and
        // no further.
        let queued = self
            .queue
            .graphemes(true)
            .take(self.pacing.max_chars_per_tick + 1)
            .count();
        let budget = self.pacing.tick_budget(dt, &self.queue, queued);
        let split = self
            .queue
            .grapheme_indices(true)
            .nth(budget)
            .map_or(self.queue.len(), |(idx, _)| idx);
        let chunk: String = self.queue.drain(..split).collect();

        (self.on_output)(&chunk);
        self.arm();
    }

    /// Request the next tick, replacing any outstanding request.
    fn arm(&mut self) {
        self.disarm();
        self.pending = Some(self.scheduler.schedule());
    }

    /// Withdraw the outstanding tick request, if any.
    fn disarm(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Commit a state transition if the table allows it.
    fn transition(&mut self, next: TypewriterState) {
        if self.state == next || !self.state.can_transition_to(next) {
            return;
        }
        tracing::trace!(from = ?self.state, to = ?next, "typewriter state change");
        self.state = next;
        if let Some(on_state) = self.on_state.as_mut() {
            on_state(next);
        }
    }
}

impl<S: TickScheduler + std::fmt::Debug> std::fmt::Debug for Typewriter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typewriter")
            .field("state", &self.state)
            .field("queued_bytes", &self.queue.len())
            .field("pacing", &self.pacing)
            .field("last_tick", &self.last_tick)
            .field("pending", &self.pending)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualScheduler;
    use std::sync::{Arc, Mutex};

    type Chunks = Arc<Mutex<Vec<String>>>;
    type States = Arc<Mutex<Vec<TypewriterState>>>;

    /// A typewriter wired to chunk and state recorders.
    fn recording_typewriter(
        pacing: PacingConfig,
    ) -> (Typewriter<ManualScheduler>, Chunks, States) {
        let chunks: Chunks = Arc::new(Mutex::new(Vec::new()));
        let states: States = Arc::new(Mutex::new(Vec::new()));
        let chunk_sink = chunks.clone();
        let state_sink = states.clone();
        let tw = Typewriter::with_config(pacing, ManualScheduler::new(), move |delta: &str| {
            chunk_sink.lock().unwrap().push(delta.to_string());
        })
        .on_state_change(move |state| state_sink.lock().unwrap().push(state));
        (tw, chunks, states)
    }

    fn default_typewriter() -> (Typewriter<ManualScheduler>, Chunks, States) {
        recording_typewriter(PacingConfig::default())
    }

    fn emitted(chunks: &Chunks) -> String {
        chunks.lock().unwrap().concat()
    }

    /// Tick with strictly increasing timestamps until the engine leaves
    /// `Running`, returning the number of ticks delivered.
    fn drain(tw: &mut Typewriter<ManualScheduler>, step: Duration) -> usize {
        let mut now = tw.last_tick.unwrap_or(Duration::ZERO);
        let mut ticks = 0;
        while tw.state().is_running() {
            tw.tick(now);
            now += step;
            ticks += 1;
            assert!(ticks < 10_000, "drain did not terminate");
        }
        ticks
    }

    #[test]
    fn test_push_auto_starts_from_idle() {
        let (mut tw, _, states) = default_typewriter();
        tw.push("hello");
        assert_eq!(tw.state(), TypewriterState::Running);
        assert!(tw.has_pending_tick());
        assert_eq!(*states.lock().unwrap(), vec![TypewriterState::Running]);
    }

    #[test]
    fn test_push_empty_is_a_no_op() {
        let (mut tw, chunks, states) = default_typewriter();
        tw.push("");
        assert_eq!(tw.state(), TypewriterState::Idle);
        assert!(!tw.has_pending_tick());
        assert!(chunks.lock().unwrap().is_empty());
        assert!(states.lock().unwrap().is_empty());
    }

    #[test]
    fn test_first_tick_after_start_emits_minimum_budget() {
        let (mut tw, chunks, _) = default_typewriter();
        tw.push("hello world");
        tw.tick(Duration::ZERO);
        assert_eq!(*chunks.lock().unwrap(), vec!["h".to_string()]);
    }

    #[test]
    fn test_full_drain_after_one_second() {
        let (mut tw, chunks, states) = default_typewriter();
        tw.push("hello world");

        // Re-basing tick, then a full second: budget 60 clamps to the 10
        // remaining characters, then the next tick finds the queue empty.
        tw.tick(Duration::ZERO);
        tw.tick(Duration::from_millis(1000));
        assert_eq!(
            *chunks.lock().unwrap(),
            vec!["h".to_string(), "ello world".to_string()]
        );
        assert_eq!(tw.state(), TypewriterState::Running);

        tw.tick(Duration::from_millis(1016));
        assert_eq!(tw.state(), TypewriterState::Done);
        assert!(!tw.has_pending_tick());
        assert_eq!(
            *states.lock().unwrap(),
            vec![TypewriterState::Running, TypewriterState::Done]
        );
    }

    #[test]
    fn test_drain_preserves_order_across_pushes() {
        let (mut tw, chunks, _) = default_typewriter();
        tw.push("one ");
        tw.push("two ");
        tw.push("three");
        drain(&mut tw, Duration::from_millis(16));
        assert_eq!(emitted(&chunks), "one two three");
    }

    #[test]
    fn test_per_tick_cap_bounds_every_chunk() {
        let (mut tw, chunks, _) = default_typewriter();
        tw.push(&"x".repeat(200));
        // Huge elapsed times cannot push a single chunk past the cap.
        drain(&mut tw, Duration::from_secs(10));
        for chunk in chunks.lock().unwrap().iter() {
            assert!(chunk.graphemes(true).count() <= 24, "oversized chunk {chunk:?}");
        }
        assert_eq!(emitted(&chunks).len(), 200);
    }

    #[test]
    fn test_output_is_never_empty() {
        let (mut tw, chunks, _) = default_typewriter();
        tw.push("abcdef");
        // Zero-elapsed ticks emit the minimum budget, never nothing.
        drain(&mut tw, Duration::ZERO);
        for chunk in chunks.lock().unwrap().iter() {
            assert!(!chunk.is_empty());
        }
        assert_eq!(emitted(&chunks), "abcdef");
    }

    #[test]
    fn test_heading_boosts_the_first_tick() {
        let (mut tw, chunks, _) = default_typewriter();
        tw.push("# Title\nBody");
        // Minimum budget 1, boosted: floor(1 × 2.5) = 2 characters.
        tw.tick(Duration::ZERO);
        assert_eq!(*chunks.lock().unwrap(), vec!["# ".to_string()]);
    }

    #[test]
    fn test_newline_boost_mid_stream() {
        let (mut tw, chunks, _) = default_typewriter();
        tw.push("ab\ncd");
        tw.tick(Duration::ZERO); // "a"
        tw.tick(Duration::from_millis(1)); // "b"
        tw.tick(Duration::from_millis(2)); // head is now "\ncd": boosted to 2
        assert_eq!(
            *chunks.lock().unwrap(),
            vec!["a".to_string(), "b".to_string(), "\nc".to_string()]
        );
    }

    #[test]
    fn test_pause_cancels_the_pending_tick() {
        let (mut tw, chunks, _) = default_typewriter();
        tw.push("hello world");
        tw.tick(Duration::ZERO);
        tw.pause();
        assert_eq!(tw.state(), TypewriterState::Paused);
        assert!(!tw.has_pending_tick());
        assert_eq!(tw.scheduler().cancelled_count(), 1);
        assert_eq!(tw.queued(), "ello world");

        // A tick that was already in flight observes the pause and does
        // nothing.
        tw.tick(Duration::from_millis(500));
        assert_eq!(emitted(&chunks), "h");
        assert!(!tw.has_pending_tick());
    }

    #[test]
    fn test_resume_continues_a_paused_drain() {
        let (mut tw, chunks, _) = default_typewriter();
        tw.push("hello");
        tw.tick(Duration::ZERO);
        tw.pause();
        tw.resume();
        assert_eq!(tw.state(), TypewriterState::Running);
        drain(&mut tw, Duration::from_millis(16));
        assert_eq!(emitted(&chunks), "hello");
    }

    #[test]
    fn test_pause_and_resume_are_idempotent_no_ops() {
        let (mut tw, _, states) = default_typewriter();

        tw.pause(); // not Running: rejected
        tw.resume(); // not Paused: rejected
        assert_eq!(tw.state(), TypewriterState::Idle);
        assert!(states.lock().unwrap().is_empty());

        tw.push("text");
        tw.resume(); // Running, not Paused: rejected
        assert_eq!(tw.state(), TypewriterState::Running);
        assert_eq!(*states.lock().unwrap(), vec![TypewriterState::Running]);
    }

    #[test]
    fn test_push_while_paused_buffers_only() {
        let (mut tw, chunks, _) = default_typewriter();
        tw.push("abc");
        tw.tick(Duration::ZERO);
        tw.pause();
        tw.push("def");
        assert_eq!(tw.state(), TypewriterState::Paused);
        assert_eq!(tw.queued(), "bcdef");
        assert_eq!(emitted(&chunks), "a");
    }

    #[test]
    fn test_flush_emits_the_whole_queue_at_once() {
        let (mut tw, chunks, states) = default_typewriter();
        tw.push("hello world");
        tw.tick(Duration::ZERO);
        tw.flush();

        assert_eq!(
            *chunks.lock().unwrap(),
            vec!["h".to_string(), "ello world".to_string()]
        );
        assert_eq!(tw.state(), TypewriterState::Done);
        assert!(tw.queued().is_empty());
        assert_eq!(tw.queued_clusters(), 0);
        assert!(!tw.has_pending_tick());
        assert_eq!(
            *states.lock().unwrap(),
            vec![TypewriterState::Running, TypewriterState::Done]
        );
    }

    #[test]
    fn test_flush_on_empty_queue_is_a_no_op() {
        let (mut tw, chunks, states) = default_typewriter();
        tw.flush();
        assert_eq!(tw.state(), TypewriterState::Idle);
        assert!(chunks.lock().unwrap().is_empty());
        assert!(states.lock().unwrap().is_empty());
    }

    #[test]
    fn test_stop_locks_out_start_and_resume() {
        let (mut tw, chunks, _) = default_typewriter();
        tw.push("abc");
        tw.stop();
        assert_eq!(tw.state(), TypewriterState::Stopped);

        tw.start();
        assert_eq!(tw.state(), TypewriterState::Stopped);
        tw.resume();
        assert_eq!(tw.state(), TypewriterState::Stopped);

        // Pushed text buffers but nothing drains.
        tw.push("more");
        assert_eq!(tw.state(), TypewriterState::Stopped);
        assert_eq!(tw.queued(), "abcmore");
        assert!(!tw.has_pending_tick());
        assert!(chunks.lock().unwrap().is_empty());
    }

    #[test]
    fn test_reset_is_the_only_exit_from_stopped() {
        let (mut tw, chunks, states) = default_typewriter();
        tw.push("abc");
        tw.stop();
        tw.reset();
        assert_eq!(tw.state(), TypewriterState::Idle);
        assert!(tw.queued().is_empty());

        tw.push("fresh");
        drain(&mut tw, Duration::from_millis(16));
        assert_eq!(emitted(&chunks), "fresh");
        assert_eq!(
            *states.lock().unwrap(),
            vec![
                TypewriterState::Running,
                TypewriterState::Stopped,
                TypewriterState::Idle,
                TypewriterState::Running,
                TypewriterState::Done,
            ]
        );
    }

    #[test]
    fn test_push_after_done_restarts_draining() {
        let (mut tw, chunks, _) = default_typewriter();
        tw.push("one");
        drain(&mut tw, Duration::from_millis(16));
        assert_eq!(tw.state(), TypewriterState::Done);

        tw.push("two");
        assert_eq!(tw.state(), TypewriterState::Running);
        drain(&mut tw, Duration::from_millis(16));
        assert_eq!(emitted(&chunks), "onetwo");
    }

    #[test]
    fn test_set_speed_clamps_to_one() {
        let (mut tw, chunks, _) = default_typewriter();
        tw.set_speed(0);
        assert_eq!(tw.pacing().chars_per_second, 1);

        tw.push("abcdef");
        tw.tick(Duration::ZERO);
        tw.tick(Duration::from_secs(2)); // 1 cps × 2 s = 2 chars
        assert_eq!(
            *chunks.lock().unwrap(),
            vec!["a".to_string(), "bc".to_string()]
        );
    }

    #[test]
    fn test_set_speed_takes_effect_on_the_next_tick() {
        let (mut tw, chunks, _) = default_typewriter();
        tw.push(&"y".repeat(40));
        tw.tick(Duration::ZERO);
        tw.set_speed(5);
        tw.tick(Duration::from_secs(1)); // 5 cps × 1 s = 5 chars
        assert_eq!(chunks.lock().unwrap().last().unwrap().len(), 5);
    }

    #[test]
    fn test_grapheme_clusters_are_never_split() {
        let (mut tw, chunks, _) = default_typewriter();
        // The family emoji is seven scalar values but one cluster.
        tw.push("a👨‍👩‍👧‍👦é!");
        drain(&mut tw, Duration::ZERO);
        assert_eq!(
            *chunks.lock().unwrap(),
            vec![
                "a".to_string(),
                "👨‍👩‍👧‍👦".to_string(),
                "é".to_string(),
                "!".to_string()
            ]
        );
    }

    #[test]
    fn test_start_on_empty_queue_finishes_on_first_tick() {
        let (mut tw, chunks, states) = default_typewriter();
        tw.start();
        assert_eq!(tw.state(), TypewriterState::Running);
        tw.tick(Duration::ZERO);
        assert_eq!(tw.state(), TypewriterState::Done);
        assert!(chunks.lock().unwrap().is_empty());
        assert_eq!(
            *states.lock().unwrap(),
            vec![TypewriterState::Running, TypewriterState::Done]
        );
    }

    #[test]
    fn test_at_most_one_tick_request_outstanding() {
        let (mut tw, _, _) = default_typewriter();
        tw.push("some longer text to drain over several ticks");
        let mut now = Duration::ZERO;
        while tw.state().is_running() {
            assert!(tw.scheduler().outstanding().is_some());
            tw.tick(now);
            now += Duration::from_millis(16);
        }
        assert_eq!(tw.scheduler().outstanding(), None);
    }

    #[test]
    fn test_non_monotonic_timestamps_saturate() {
        let (mut tw, chunks, _) = default_typewriter();
        tw.push("abcdef");
        tw.tick(Duration::from_secs(5));
        // An earlier timestamp behaves like zero elapsed time.
        tw.tick(Duration::from_secs(1));
        assert_eq!(
            *chunks.lock().unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn emission_reconstructs_pushed_text(
                pushes in proptest::collection::vec(".{0,40}", 1..8),
                steps in proptest::collection::vec(0u64..2000, 1..64),
            ) {
                let (mut tw, chunks, _) = default_typewriter();
                for text in &pushes {
                    tw.push(text);
                }

                let mut now = Duration::ZERO;
                let mut step = steps.iter().cycle();
                let mut guard = 0;
                while tw.state().is_running() {
                    now += Duration::from_millis(*step.next().unwrap());
                    tw.tick(now);
                    guard += 1;
                    prop_assert!(guard < 100_000, "drain did not terminate");
                }

                prop_assert_eq!(emitted(&chunks), pushes.concat());
            }

            #[test]
            fn chunks_respect_the_per_tick_cap(
                text in ".{1,400}",
                steps in proptest::collection::vec(0u64..5000, 1..32),
            ) {
                let (mut tw, chunks, _) = default_typewriter();
                tw.push(&text);

                let mut now = Duration::ZERO;
                let mut step = steps.iter().cycle();
                while tw.state().is_running() {
                    now += Duration::from_millis(*step.next().unwrap());
                    tw.tick(now);
                }

                for chunk in chunks.lock().unwrap().iter() {
                    prop_assert!(!chunk.is_empty());
                    prop_assert!(chunk.graphemes(true).count() <= 24);
                }
            }
        }
    }
}
