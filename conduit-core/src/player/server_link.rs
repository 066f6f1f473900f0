//! The backend connection abstraction this crate writes packets onto.
//!
//! Mirrors the shape of `player::connection::NetworkConnection` in the
//! source this was distilled from (object-safe, `is_open`/`write` style),
//! generalized with an associated `Packet` type since the wire packet types
//! themselves are an external collaborator (see the crate-level docs).

use futures::future::BoxFuture;

/// Marker returned once a packet write has been handed to the transport.
///
/// Carries no data; its only purpose is to make "the write reached the
/// network layer" a distinct, checkable moment in the type system rather
/// than an implicit side effect of a `()`-returning future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flushed;

/// The backend connection a player is currently routed to.
///
/// Implementations decide what "open" means and how writes reach the wire;
/// this crate only ever observes [`ServerLink::is_open`] and awaits
/// [`ServerLink::write`]. A closed link's writes must still resolve (to
/// [`Flushed`]), just without doing anything — the queue's failure policy
/// treats "nothing to write to" as a successful no-op, never an error.
pub trait ServerLink: Send + Sync + 'static {
    /// The packet representation this link accepts. Opaque to this crate;
    /// callers supply instances via `ChatQueue`'s enqueue methods.
    type Packet: Send + 'static;

    /// Whether the link currently accepts writes.
    fn is_open(&self) -> bool;

    /// Writes a packet, resolving once it has been handed to the transport.
    ///
    /// Must never fail: a link that cannot currently send simply resolves
    /// once it has dropped the packet. Ordering, not delivery, is this
    /// crate's contract.
    fn write(&self, packet: Self::Packet) -> BoxFuture<'static, Flushed>;
}
