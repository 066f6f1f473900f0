//! Small shared primitives used across the proxy's player-facing subsystems.
//!
//! Kept deliberately narrow: this crate carries only what the chat ordering
//! core in `conduit-core` needs, not a general "kitchen sink" utils crate.

pub mod bitset;
pub mod locks;

pub use bitset::BitSet;
