//! Actor model: a thread-owned typewriter with message-passing control.
//!
//! ```text
//! ┌──────────────┐   TypistCommand    ┌────────────────────────┐
//! │ Your thread  │ ─────────────────▶ │  Typist thread         │
//! │              │                    │  Typewriter + ticker   │
//! │              │ ◀───────────────── │                        │
//! └──────────────┘    TypistEvent     └────────────────────────┘
//! ```
//!
//! The actor keeps the engine's single-threaded model intact: every command
//! and every tick is applied on the typist thread, in arrival order.

mod messages;
mod typist;

pub use messages::{TypistCommand, TypistEvent};
pub use typist::TypistActor;
