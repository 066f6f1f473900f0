//! Typed errors this crate reports to its embedding connection supervisor.

use thiserror::Error;

/// Conditions [`crate::chat::ChatQueue`] reports rather than swallows.
///
/// Transient build or write failures never reach this type — they're
/// logged and absorbed inside task execution, per the queue's failure
/// policy. Only malformed client input and internal invariant violations
/// are surfaced here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatQueueError {
    /// A client-supplied last-seen offset exceeded the protocol maximum.
    #[error("client supplied an out-of-range last-seen offset: {offset}")]
    MalformedLastSeen {
        /// The offending offset.
        offset: u32,
    },

    /// The delayed-acknowledgement accumulator would have gone negative.
    ///
    /// Unreachable from the `u32`-based accumulator this crate ships today;
    /// kept as a typed variant so a future signed-arithmetic accumulator (or
    /// a caller composing its own bookkeeping on top) has somewhere to
    /// report the same failure the source's dynamic check guarded against.
    #[error("delayed acknowledgement accumulator underflowed during {task}")]
    DelayedAckUnderflow {
        /// Best-effort description of the task that triggered it, for logs.
        task: &'static str,
    },
}
