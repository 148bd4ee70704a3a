//! Tick scheduling: the capability trait and its two implementations.
//!
//! The engine requests future ticks through [`TickScheduler`] and receives
//! them back as explicit `tick(timestamp)` calls. [`ManualScheduler`] keeps
//! everything deterministic for tests and externally-driven hosts;
//! [`FrameTicker`] provides realtime fixed-interval ticks from a dedicated
//! thread.

mod scheduler;
mod ticker;

pub use scheduler::{ManualScheduler, TickHandle, TickScheduler};
pub use ticker::{FrameTicker, Tick};
