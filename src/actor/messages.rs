//! Message types for driving a typewriter across threads.
//!
//! These enums define the protocol between a [`TypistActor`](super::TypistActor)
//! and the thread that owns it.

use crate::engine::TypewriterState;

/// Commands accepted by a typist actor.
///
/// Each variant maps onto one engine operation; the actor applies them on
/// its own thread, serialized with tick processing.
#[derive(Debug, Clone)]
pub enum TypistCommand {
    /// Append text to the queue (auto-starts from `Idle`/`Done`).
    Push(String),

    /// Begin draining.
    Start,

    /// Suspend draining, keeping the queue.
    Pause,

    /// Continue a paused drain.
    Resume,

    /// Emit the entire remaining queue at once.
    Flush,

    /// Halt output until a `Reset`.
    Stop,

    /// Clear the queue and return to `Idle`.
    Reset,

    /// Change the base emission rate (characters per second).
    SetSpeed(u32),

    /// Shut the actor thread down.
    Shutdown,
}

/// Events published by a typist actor.
#[derive(Debug, Clone)]
pub enum TypistEvent {
    /// A paced slice of output, in emission order.
    Output(String),

    /// The engine committed a state transition.
    StateChanged(TypewriterState),
}
