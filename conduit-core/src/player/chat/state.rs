//! Per-player mutable chat bookkeeping.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::SystemTime;

use conduit_utils::BitSet;

use crate::config::ChatQueueConfig;
use crate::player::chat::last_seen::{self, LastSeenMessages};

/// The cached acknowledged bitmap, or the dummy sentinel substituted once
/// the client's own window has advanced past it. Kept as its own variant
/// rather than comparing against an all-zero `BitSet` by value, so a real
/// (if coincidentally empty) bitmap is never mistaken for the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CachedAck {
    Real(BitSet),
    Dummy,
}

impl CachedAck {
    fn as_bitset(&self, config: &ChatQueueConfig) -> BitSet {
        match self {
            CachedAck::Real(bits) => bits.clone(),
            CachedAck::Dummy => last_seen::dummy(config),
        }
    }
}

/// Per-player mutable chat bookkeeping.
///
/// Owned exclusively by one [`crate::chat::ChatQueue`] and mutated only from
/// within its running task, except for [`ChatState::delayed_ack_count`]
/// itself, which stays atomic so a diagnostic reader can sample it off-task.
#[derive(Debug)]
pub struct ChatState {
    config: ChatQueueConfig,
    last_timestamp: SystemTime,
    cached_acknowledged: CachedAck,
    delayed_ack_count: Arc<AtomicU32>,
}

impl ChatState {
    /// Creates a fresh, empty chat state for a newly connected player.
    #[must_use]
    pub fn new(config: ChatQueueConfig) -> Self {
        Self {
            config,
            last_timestamp: SystemTime::UNIX_EPOCH,
            cached_acknowledged: CachedAck::Real(BitSet::with_capacity(
                config.window_size as usize,
            )),
            delayed_ack_count: Arc::new(AtomicU32::new(0)),
        }
    }

    /// The most recent client-supplied timestamp on record.
    #[must_use]
    pub fn last_timestamp(&self) -> SystemTime {
        self.last_timestamp
    }

    /// The withheld-acknowledgement counter, current as of the last
    /// completed task.
    #[must_use]
    pub fn delayed_ack_count(&self) -> u32 {
        self.delayed_ack_count.load(Ordering::Acquire)
    }

    /// A clonable handle onto the withheld-ack counter, for diagnostic
    /// readers that sample it outside task context (e.g. a queue's own
    /// snapshot accessor, taken once at construction, before `self` moves
    /// into its worker task).
    pub(crate) fn delayed_ack_handle(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.delayed_ack_count)
    }

    /// Called by a chat/command task when a fresh client packet arrives.
    ///
    /// Folds any withheld acknowledgement count into the returned
    /// last-seen's offset, baking delayed acks into the outbound packet
    /// rather than emitting a separate acknowledgement packet — this keeps
    /// the signed command that follows verifiable against a single offset.
    pub fn update_from_message(
        &mut self,
        timestamp: Option<SystemTime>,
        last_seen: Option<LastSeenMessages>,
    ) -> Option<LastSeenMessages> {
        if let Some(timestamp) = timestamp {
            self.last_timestamp = timestamp;
        }

        let last_seen = last_seen?;

        let withheld = self.delayed_ack_count.swap(0, Ordering::AcqRel);
        self.cached_acknowledged = CachedAck::Real(last_seen.acknowledged().clone());

        Some(last_seen.shifted_by(withheld))
    }

    /// Called by an acknowledgement task. Returns the count that must now
    /// be forwarded to the server as a standalone
    /// [`crate::chat::ChatAcknowledgement`] packet, or `0` if it can keep
    /// being withheld.
    pub fn accumulate_ack(&mut self, n: u32) -> u32 {
        let min_delayed = u64::from(self.config.min_delayed());
        let window = u64::from(self.config.window_size);

        let current = u64::from(self.delayed_ack_count.load(Ordering::Acquire));
        let d = current + u64::from(n);
        let forwardable = d.saturating_sub(min_delayed);

        if forwardable < window {
            self.delayed_ack_count
                .store(u32::try_from(d).unwrap_or(u32::MAX), Ordering::Release);
            return 0;
        }

        self.cached_acknowledged = CachedAck::Dummy;
        self.delayed_ack_count
            .store(self.config.min_delayed(), Ordering::Release);
        u32::try_from(forwardable).unwrap_or(u32::MAX)
    }

    /// Builds a last-seen value from the currently cached acknowledged
    /// bitmap, for packets the proxy synthesizes rather than forwards.
    #[must_use]
    pub fn create_last_seen(&self) -> LastSeenMessages {
        LastSeenMessages::from_parts(0, self.cached_acknowledged.as_bitset(&self.config))
    }
}
