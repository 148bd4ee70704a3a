//! Per-tick emission budgets.
//!
//! Each tick converts the time elapsed since the previous tick into a
//! character budget: `floor(chars_per_second × dt)`, floored to a minimum of
//! one so a tick always makes forward progress, multiplied by a boost factor
//! when the queue head sits on a structural marker, then clamped to the
//! per-tick cap and the queue length.
//!
//! The structural boost front-loads output at line breaks, list items and
//! headings so those breaks snap into view instead of trickling. It changes
//! pacing only, never content.

use std::time::Duration;

/// How far into the queue head the structural-marker scan looks.
pub const STRUCTURAL_SCAN_CHARS: usize = 64;

/// Pacing parameters for a typewriter.
#[derive(Debug, Clone)]
pub struct PacingConfig {
    /// Base emission rate in characters per second.
    pub chars_per_second: u32,
    /// Hard cap on characters released by a single tick.
    pub max_chars_per_tick: usize,
    /// Budget multiplier applied while the queue head starts with a
    /// structural marker.
    pub structural_boost: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            chars_per_second: 60,
            max_chars_per_tick: 24,
            structural_boost: 2.5,
        }
    }
}

impl PacingConfig {
    /// Compute how many characters a tick may release.
    ///
    /// `dt` is the time since the previous tick, `head` the front of the
    /// queue (at most [`STRUCTURAL_SCAN_CHARS`] characters are considered),
    /// and `queued` the number of characters currently buffered.
    ///
    /// For a non-empty queue the result is always in
    /// `1..=min(max_chars_per_tick, queued)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn tick_budget(&self, dt: Duration, head: &str, queued: usize) -> usize {
        let base = (f64::from(self.chars_per_second) * dt.as_secs_f64()).floor();
        let mut budget = if base < 1.0 { 1 } else { base as usize };

        if starts_with_structural_marker(head) {
            budget = (budget as f64 * self.structural_boost).floor() as usize;
        }

        budget.min(self.max_chars_per_tick).min(queued)
    }
}

/// Whether `head` begins with a structural marker.
///
/// Markers are a newline, a list hyphen, or a heading hash; a `##` heading is
/// covered by the single-`#` check. Only the first
/// [`STRUCTURAL_SCAN_CHARS`] characters of `head` are considered.
pub fn starts_with_structural_marker(head: &str) -> bool {
    let head = truncate_chars(head, STRUCTURAL_SCAN_CHARS);
    head.starts_with('\n') || head.starts_with('-') || head.starts_with('#')
}

/// Truncate `s` to at most `n` characters, on a char boundary.
fn truncate_chars(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or(s, |(idx, _)| &s[..idx])
}
