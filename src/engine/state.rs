//! Lifecycle states and the transition policy between them.
//!
//! The typewriter moves through five states. Which moves are permitted is
//! encoded as a per-state set of targets; anything outside the set is
//! silently rejected by the engine, and a transition to the current state is
//! always a no-op regardless of the table.

use bitflags::bitflags;

/// Lifecycle state of a [`Typewriter`](crate::Typewriter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypewriterState {
    /// Initial state; nothing queued, nothing pending.
    Idle,
    /// Actively draining the queue on the tick schedule.
    Running,
    /// Draining suspended; the queue is retained.
    Paused,
    /// Explicitly halted. Only `reset` leads back out.
    Stopped,
    /// The queue drained to empty.
    Done,
}

bitflags! {
    /// A set of [`TypewriterState`]s.
    ///
    /// Used to express the permitted targets of a transition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StateSet: u8 {
        /// Contains [`TypewriterState::Idle`].
        const IDLE = 1 << 0;
        /// Contains [`TypewriterState::Running`].
        const RUNNING = 1 << 1;
        /// Contains [`TypewriterState::Paused`].
        const PAUSED = 1 << 2;
        /// Contains [`TypewriterState::Stopped`].
        const STOPPED = 1 << 3;
        /// Contains [`TypewriterState::Done`].
        const DONE = 1 << 4;
    }
}

impl TypewriterState {
    /// The singleton set containing only this state.
    pub const fn as_set(self) -> StateSet {
        match self {
            Self::Idle => StateSet::IDLE,
            Self::Running => StateSet::RUNNING,
            Self::Paused => StateSet::PAUSED,
            Self::Stopped => StateSet::STOPPED,
            Self::Done => StateSet::DONE,
        }
    }

    /// States reachable from this state.
    ///
    /// `Stopped` is a deliberate dead-end: it reaches only `Idle` (via
    /// `reset`) and `Done`, never `Running` or `Paused`. `Paused` is only
    /// reachable from `Running`.
    pub const fn allowed_targets(self) -> StateSet {
        match self {
            Self::Idle | Self::Done => StateSet::IDLE
                .union(StateSet::RUNNING)
                .union(StateSet::STOPPED)
                .union(StateSet::DONE),
            Self::Running | Self::Paused => StateSet::IDLE
                .union(StateSet::RUNNING)
                .union(StateSet::PAUSED)
                .union(StateSet::STOPPED)
                .union(StateSet::DONE),
            Self::Stopped => StateSet::IDLE.union(StateSet::STOPPED).union(StateSet::DONE),
        }
    }

    /// Whether a transition from `self` to `target` is permitted.
    ///
    /// Self-transitions are the caller's concern: the engine short-circuits
    /// them before consulting the table, so they never commit and never fire
    /// the state-change callback.
    pub const fn can_transition_to(self, target: Self) -> bool {
        self.allowed_targets().contains(target.as_set())
    }

    /// Whether this state drains the queue on ticks.
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}
