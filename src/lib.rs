//! # Teletype
//!
//! A rate-paced typewriter engine for streaming text in Agentic CLIs.
//!
//! Teletype sits between a bursty producer (an LLM stream, a network fetch,
//! a static string) and a display, re-emitting pushed text in small
//! time-paced increments so output reads as typing instead of arriving in
//! slabs - without per-character update storms on the consumer side.
//!
//! ## Core Concepts
//!
//! - **Budgeted draining**: each tick converts elapsed time into a character
//!   budget, boosted at structural breaks (newlines, list items, headings)
//!   and capped per tick
//! - **Explicit lifecycle**: `Idle`/`Running`/`Paused`/`Stopped`/`Done` with
//!   a strict transition table; `Stopped` requires a `reset` to leave
//! - **Injected scheduling**: the engine never reads a clock - ticks carry
//!   their own timestamps and future ticks are requested through a
//!   [`TickScheduler`], so drains are deterministic under simulated time
//! - **Actor wrapper**: [`TypistActor`] runs an engine and a [`FrameTicker`]
//!   on a dedicated thread behind a command/event channel pair
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use teletype::{ManualScheduler, Typewriter, TypewriterState};
//!
//! let mut tw = Typewriter::new(ManualScheduler::new(), |delta| print!("{delta}"));
//! tw.push("# Streaming\n- paced\n- pausable");
//!
//! tw.tick(Duration::ZERO);
//! tw.tick(Duration::from_millis(250));
//! tw.pause();
//! tw.resume();
//! tw.flush();
//! assert_eq!(tw.state(), TypewriterState::Done);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod clock;
pub mod engine;

// Re-exports for convenience
pub use actor::{TypistActor, TypistCommand, TypistEvent};
pub use clock::{FrameTicker, ManualScheduler, Tick, TickHandle, TickScheduler};
pub use engine::{PacingConfig, StateSet, Typewriter, TypewriterState};
