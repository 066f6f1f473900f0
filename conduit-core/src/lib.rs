//! The per-player chat ordering core.
//!
//! Mediates chat, command, and acknowledgement packets between a connected
//! player and whichever backend server they are currently routed to, under
//! Minecraft's Secure Chat protocol (>= 1.19). It does one job: preserve the
//! exact order the client emitted packets in, while keeping enough of the
//! client's last-seen-messages bookkeeping around to synthesize signed
//! prefixes and to withhold acknowledgements the server doesn't need yet.
//!
//! Everything outside that job — the proxy runtime, packet wire codecs,
//! player identity, and the backend TCP connection itself — is a collaborator
//! this crate only ever sees through the [`player::ServerLink`] and
//! [`player::Player`] traits.

pub mod config;
pub mod player;

pub use player::chat;
