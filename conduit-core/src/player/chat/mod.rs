//! The per-player chat ordering core: last-seen bookkeeping, the mutable
//! per-session state it lives in, and the serial queue that applies both to
//! an ordered stream of outbound packets.

mod error;
mod last_seen;
mod packet;
mod queue;
mod state;

pub use error::ChatQueueError;
pub use last_seen::LastSeenMessages;
pub use packet::{BuildError, ChatAcknowledgement};
pub use queue::ChatQueue;
pub use state::ChatState;
