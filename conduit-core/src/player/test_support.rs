//! In-memory test doubles for [`crate::player::ServerLink`] and
//! [`crate::player::Player`].
//!
//! Mirrors the source's `FlintConnection` test connection, which exists so
//! `NetworkConnection` behavior can be asserted on without a real socket.
//! Built behind a `test-support` feature (not just `#[cfg(test)]`) so crates
//! embedding this one can reuse the same doubles in their own integration
//! tests instead of hand-rolling equivalents.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use conduit_utils::locks::SyncMutex;
use futures::future::BoxFuture;

use crate::player::{Flushed, Player, ServerLink};

/// Records every packet written to it, in order, for assertions.
pub struct RecordingLink<T> {
    open: AtomicBool,
    written: SyncMutex<Vec<T>>,
}

impl<T> Default for RecordingLink<T> {
    fn default() -> Self {
        Self {
            open: AtomicBool::new(true),
            written: SyncMutex::new(Vec::new()),
        }
    }
}

impl<T> RecordingLink<T> {
    /// Creates an open link with nothing written yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the link closed; subsequent writes become no-ops.
    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }

    /// Snapshots every packet written so far, in order.
    pub fn written(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.written.lock().clone()
    }
}

impl<T: Send + 'static> ServerLink for RecordingLink<T> {
    type Packet = T;

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn write(&self, packet: Self::Packet) -> BoxFuture<'static, Flushed> {
        if self.is_open() {
            self.written.lock().push(packet);
        }
        Box::pin(async { Flushed })
    }
}

/// A player permanently routed to one link (or none), for tests that don't
/// exercise server switching.
pub struct FixedPlayer<L> {
    link: Option<Arc<L>>,
}

impl<L> FixedPlayer<L> {
    /// A player routed to `link`.
    #[must_use]
    pub fn new(link: Arc<L>) -> Self {
        Self { link: Some(link) }
    }

    /// A player with no current server link at all.
    #[must_use]
    pub fn disconnected() -> Self {
        Self { link: None }
    }
}

impl<L: ServerLink> Player<L> for FixedPlayer<L> {
    fn current_link(&self) -> Option<Arc<L>> {
        self.link.clone()
    }
}
