//! The signed last-seen-messages window carried inside chat/command packets.

use conduit_utils::BitSet;

use crate::config::ChatQueueConfig;
use crate::player::chat::error::ChatQueueError;

/// Protocol-maximum offset a `LastSeenMessages` may carry.
///
/// A client asking for more than this is misbehaving, not merely fast;
/// offsets this large can't arise from a real signed-message stream.
const MAX_OFFSET: u32 = u32::MAX / 2;

/// An immutable snapshot of the client's signed last-seen-messages window:
/// an offset plus the bitmap of recently-seen signed message indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastSeenMessages {
    offset: u32,
    acknowledged: BitSet,
}

impl LastSeenMessages {
    /// Builds a last-seen value from client-supplied fields, validating the
    /// offset against the protocol maximum.
    ///
    /// # Errors
    /// Returns [`ChatQueueError::MalformedLastSeen`] if `offset` exceeds the
    /// protocol maximum, rather than silently clamping it — an offset this
    /// large can only come from a misbehaving client.
    pub fn new(offset: u32, acknowledged: BitSet) -> Result<Self, ChatQueueError> {
        if offset > MAX_OFFSET {
            return Err(ChatQueueError::MalformedLastSeen { offset });
        }
        Ok(Self {
            offset,
            acknowledged,
        })
    }

    /// Builds a last-seen value directly, for internal callers that already
    /// know the offset is in range (the proxy never derives an offset it
    /// didn't validate or compute itself).
    #[must_use]
    pub(crate) fn from_parts(offset: u32, acknowledged: BitSet) -> Self {
        Self {
            offset,
            acknowledged,
        }
    }

    /// Returns a new value with `offset` advanced by `delta`, saturating at
    /// the protocol maximum instead of overflowing. Used internally to fold
    /// withheld acknowledgement counts into an outbound offset.
    #[must_use]
    pub fn shifted_by(&self, delta: u32) -> Self {
        Self {
            offset: self.offset.saturating_add(delta).min(MAX_OFFSET),
            acknowledged: self.acknowledged.clone(),
        }
    }

    /// The offset component.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// The recently-seen signed message bitmap.
    #[must_use]
    pub fn acknowledged(&self) -> &BitSet {
        &self.acknowledged
    }
}

/// The all-zero bitmap substituted once enough messages are acknowledged
/// that the server will not check the cached bitmap again.
#[must_use]
pub(crate) fn dummy(config: &ChatQueueConfig) -> BitSet {
    BitSet::zero(config.window_size as usize)
}
