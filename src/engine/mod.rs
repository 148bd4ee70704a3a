//! The typewriter engine: queue, state machine, and pacing.
//!
//! # Architecture
//!
//! ```text
//! push ─────▶ ┌─────────────────────────────┐
//!             │ queue (front-drained FIFO)  │
//!             └──────────────┬──────────────┘
//!                            │ tick(now): budget = clamp(boost(rate × dt))
//!                            ▼
//!                       on_output(delta)
//! ```
//!
//! [`TypewriterState`] encodes the lifecycle, [`PacingConfig`] the budget
//! math, and [`Typewriter`] ties them to the queue and the drain loop.

mod pacing;
mod state;
mod typewriter;

pub use pacing::{starts_with_structural_marker, PacingConfig, STRUCTURAL_SCAN_CHARS};
pub use state::{StateSet, TypewriterState};
pub use typewriter::{OutputFn, StateFn, Typewriter};
