//! Configuration for the chat ordering core.
//!
//! Unlike most of this codebase's configuration, which is process-global
//! (see the source this was distilled from, where `ServerConfig` lives
//! behind a single `OnceLock`), [`ChatQueueConfig`] is a plain `Copy` value
//! handed to each [`crate::chat::ChatQueue`] at construction. A chat queue is
//! per-player, and tests routinely spin up several with different window
//! sizes in the same process, so a process-wide singleton would fight the
//! test suite rather than help it.

use serde::Deserialize;

/// Bit-width of the signed last-seen bitmap (Minecraft Secure Chat).
pub const DEFAULT_WINDOW_SIZE: u32 = 20;

/// Tunable protocol constants for the chat ordering core.
///
/// `window_size` is the only independent knob: the headroom retained in the
/// delayed-ack accumulator (`MIN_DELAYED`) and the threshold past which
/// withheld acknowledgements are forwarded are both defined in terms of it
/// (see [`ChatQueueConfig::min_delayed`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChatQueueConfig {
    /// Bit-width of the signed last-seen bitmap. Vanilla Minecraft uses 20.
    pub window_size: u32,
}

impl ChatQueueConfig {
    /// Headroom retained in the withheld-ack accumulator so an in-flight
    /// signed command can still reference recently cached bits. Equal to
    /// `window_size`, per the protocol this core implements.
    #[must_use]
    pub const fn min_delayed(&self) -> u32 {
        self.window_size
    }
}

impl Default for ChatQueueConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}
