//! Collaborators the chat ordering core depends on but does not own.

pub mod chat;
pub mod server_link;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use server_link::{Flushed, ServerLink};

use std::sync::Arc;

/// A player session, as seen by the chat ordering core: nothing more than
/// "which backend link is current right now".
///
/// Reconnection, server switches, and disconnects are all expressed purely
/// through the return value of [`Player::current_link`] changing, or
/// becoming `None`, between calls; the queue never observes the transition
/// itself, only its effect on the next task that runs.
pub trait Player<L: ServerLink>: Send + Sync + 'static {
    /// Returns the link the player is currently routed through, if any.
    ///
    /// `None` and a link whose [`ServerLink::is_open`] returns `false` are
    /// both treated as "nothing to write to" by the queue. The distinction
    /// exists only because a player mid-switch has no link object yet,
    /// while a player whose link just dropped still has the stale one.
    fn current_link(&self) -> Option<Arc<L>>;
}
