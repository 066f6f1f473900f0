//! The one concrete packet shape this crate constructs itself.

use std::error::Error;

/// Failure from a caller-supplied packet builder.
///
/// Opaque on purpose: the queue never inspects *why* a build failed, only
/// that it did, so it can log and drop the slot without stalling the chain.
pub type BuildError = Box<dyn Error + Send + Sync + 'static>;

/// An acknowledgement packet carrying a forwarded delayed-ack count.
///
/// Every other packet the queue writes is supplied by the caller, built
/// from protocol-version context this crate has no business knowing about.
/// This is the sole packet the chat core constructs on its own, since it
/// only ever carries a `u32` the core already computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatAcknowledgement {
    /// Number of previously withheld acknowledgements now being forwarded.
    pub count: u32,
}
