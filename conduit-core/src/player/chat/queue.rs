//! The single-player serial executor.
//!
//! Modeled as a single-consumer queue drained by one worker task rather than
//! a chain of dependent futures — the queue+worker realization the source's
//! design notes call out as observably equivalent — following the same
//! mpsc-plus-`select!` shape the source uses for its per-player send loop
//! (`player/networking.rs`'s `JavaConnection::sender`).

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::SystemTime;

use futures::future::BoxFuture;
use tokio::sync::mpsc;

use crate::config::ChatQueueConfig;
use crate::player::chat::last_seen::LastSeenMessages;
use crate::player::chat::packet::{BuildError, ChatAcknowledgement};
use crate::player::chat::state::ChatState;
use crate::player::{Player, ServerLink};

type ClientBuilder<L> = Box<
    dyn FnOnce(Option<LastSeenMessages>) -> BoxFuture<'static, Result<<L as ServerLink>::Packet, BuildError>>
        + Send,
>;

type SynthesizedBuilder<L> = Box<dyn FnOnce(&ChatState) -> <L as ServerLink>::Packet + Send>;

enum Task<L: ServerLink> {
    ClientPacket {
        build: ClientBuilder<L>,
        timestamp: Option<SystemTime>,
        last_seen: Option<LastSeenMessages>,
    },
    Synthesized(SynthesizedBuilder<L>),
    Acknowledgement(u32),
}

/// The ordered chat/command/acknowledgement pipeline for one connected
/// player.
///
/// Created when the player connects, dropped when they disconnect. Dropping
/// it simply stops the worker task the next time its channel is polled;
/// nothing needs to be awaited at shutdown, and any task already in flight
/// that observes a closed link becomes a no-op rather than an error.
pub struct ChatQueue<L: ServerLink> {
    sender: mpsc::UnboundedSender<Task<L>>,
    delayed_ack_count: Arc<AtomicU32>,
}

impl<L> ChatQueue<L>
where
    L: ServerLink,
    L::Packet: From<ChatAcknowledgement>,
{
    /// Spawns the worker task and returns a handle to enqueue against it.
    pub fn spawn<P>(config: ChatQueueConfig, player: Arc<P>) -> Self
    where
        P: Player<L>,
    {
        let state = ChatState::new(config);
        let delayed_ack_count = state.delayed_ack_handle();
        let (sender, receiver) = mpsc::unbounded_channel();

        tokio::spawn(run(receiver, state, player));

        Self {
            sender,
            delayed_ack_count,
        }
    }

    /// Enqueues a client-originated chat or command packet.
    ///
    /// `build_packet` receives the effective last-seen value to embed (the
    /// client's own, shifted by any acknowledgements withheld since its
    /// last fresh last-seen), or `None` if the client didn't supply one. A
    /// build failure drops the packet but never blocks the chain — see the
    /// crate's failure policy.
    pub fn enqueue_client_packet<F>(
        &self,
        build_packet: F,
        timestamp: Option<SystemTime>,
        last_seen: Option<LastSeenMessages>,
    ) where
        F: FnOnce(Option<LastSeenMessages>) -> BoxFuture<'static, Result<L::Packet, BuildError>>
            + Send
            + 'static,
    {
        let _ = self.sender.send(Task::ClientPacket {
            build: Box::new(build_packet),
            timestamp,
            last_seen,
        });
    }

    /// Enqueues a proxy-synthesized packet built purely from the current
    /// state, without mutating it. Preserves the packet's position relative
    /// to client traffic enqueued around it.
    pub fn enqueue_synthesized<F>(&self, packet_from_state: F)
    where
        F: FnOnce(&ChatState) -> L::Packet + Send + 'static,
    {
        let _ = self.sender.send(Task::Synthesized(Box::new(packet_from_state)));
    }

    /// Enqueues a client acknowledgement of `count` previously-seen signed
    /// messages. Forwards a standalone acknowledgement packet only once the
    /// withheld total crosses the forwarding threshold.
    pub fn enqueue_acknowledgement(&self, count: u32) {
        let _ = self.sender.send(Task::Acknowledgement(count));
    }

    /// Snapshots the withheld-acknowledgement counter without routing the
    /// read through the queue itself.
    #[must_use]
    pub fn delayed_ack_count(&self) -> u32 {
        self.delayed_ack_count.load(Ordering::Acquire)
    }
}

async fn run<L, P>(mut receiver: mpsc::UnboundedReceiver<Task<L>>, mut state: ChatState, player: Arc<P>)
where
    L: ServerLink,
    L::Packet: From<ChatAcknowledgement>,
    P: Player<L>,
{
    while let Some(task) = receiver.recv().await {
        match task {
            Task::ClientPacket {
                build,
                timestamp,
                last_seen,
            } => {
                let effective_last_seen = state.update_from_message(timestamp, last_seen);
                match build(effective_last_seen).await {
                    Ok(packet) => write(player.as_ref(), packet).await,
                    Err(error) => {
                        log::warn!("dropping chat/command packet, build failed: {error}");
                    }
                }
            }
            Task::Synthesized(build) => {
                let packet = build(&state);
                write(player.as_ref(), packet).await;
            }
            Task::Acknowledgement(count) => {
                let forwarded = state.accumulate_ack(count);
                if forwarded > 0 {
                    write(player.as_ref(), L::Packet::from(ChatAcknowledgement { count: forwarded })).await;
                }
            }
        }
    }
}

async fn write<L, P>(player: &P, packet: L::Packet)
where
    L: ServerLink,
    P: Player<L>,
{
    let Some(link) = player.current_link() else {
        log::debug!("dropping packet, player has no current server link");
        return;
    };

    if !link.is_open() {
        log::debug!("dropping packet, current server link is closed");
        return;
    }

    link.write(packet).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::test_support::{FixedPlayer, RecordingLink};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TestPacket {
        Chat { last_seen: Option<(u32, bool)> },
        Ack(u32),
    }

    impl From<ChatAcknowledgement> for TestPacket {
        fn from(ack: ChatAcknowledgement) -> Self {
            TestPacket::Ack(ack.count)
        }
    }

    fn spawn_queue() -> (ChatQueue<RecordingLink<TestPacket>>, Arc<RecordingLink<TestPacket>>) {
        let link = Arc::new(RecordingLink::new());
        let player = Arc::new(FixedPlayer::new(Arc::clone(&link)));
        let queue = ChatQueue::spawn(ChatQueueConfig::default(), player);
        (queue, link)
    }

    fn chat_builder(
        marker: bool,
    ) -> impl FnOnce(Option<LastSeenMessages>) -> BoxFuture<'static, Result<TestPacket, BuildError>> {
        move |effective| {
            Box::pin(async move {
                Ok(TestPacket::Chat {
                    last_seen: effective.map(|seen| (seen.offset(), marker)),
                })
            })
        }
    }

    async fn settle() {
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
    }

    #[tokio::test]
    async fn pure_chat_forwarding_embeds_client_last_seen() {
        let (queue, link) = spawn_queue();
        let seen = LastSeenMessages::new(0, conduit_utils::BitSet::from_indices(20, [3, 5])).unwrap();
        queue.enqueue_client_packet(chat_builder(true), Some(SystemTime::UNIX_EPOCH), Some(seen));

        settle().await;

        let written = link.written();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0], TestPacket::Chat { last_seen: Some((0, true)) });
        assert_eq!(queue.delayed_ack_count(), 0);
    }

    #[tokio::test]
    async fn ack_absorption_folds_into_next_chat_offset() {
        let (queue, link) = spawn_queue();

        queue.enqueue_acknowledgement(5);
        queue.enqueue_acknowledgement(10);
        let seen = LastSeenMessages::new(0, conduit_utils::BitSet::from_indices(20, [7])).unwrap();
        queue.enqueue_client_packet(chat_builder(true), None, Some(seen));

        settle().await;

        let written = link.written();
        assert_eq!(written, vec![TestPacket::Chat { last_seen: Some((15, true)) }]);
        assert_eq!(queue.delayed_ack_count(), 0);
    }

    #[tokio::test]
    async fn ack_overflow_forwards_standalone_packet() {
        let (queue, link) = spawn_queue();

        queue.enqueue_acknowledgement(45);
        settle().await;

        assert_eq!(link.written(), vec![TestPacket::Ack(25)]);
        assert_eq!(queue.delayed_ack_count(), 20);
    }

    #[tokio::test]
    async fn closed_link_drops_writes_without_corrupting_queue() {
        let (queue, link) = spawn_queue();
        link.close();

        queue.enqueue_client_packet(chat_builder(true), None, None);
        settle().await;
        assert!(link.written().is_empty());

        let seen = LastSeenMessages::new(0, conduit_utils::BitSet::from_indices(20, [1])).unwrap();
        queue.enqueue_client_packet(chat_builder(true), None, Some(seen));
        settle().await;
        assert!(link.written().is_empty());
    }

    #[tokio::test]
    async fn synthesized_task_runs_in_order_between_chat_tasks() {
        let (queue, link) = spawn_queue();

        let first_seen = LastSeenMessages::new(0, conduit_utils::BitSet::from_indices(20, [2])).unwrap();
        queue.enqueue_client_packet(chat_builder(true), None, Some(first_seen));
        queue.enqueue_synthesized(|state| TestPacket::Chat {
            last_seen: Some((state.create_last_seen().offset(), false)),
        });
        let second_seen = LastSeenMessages::new(0, conduit_utils::BitSet::from_indices(20, [9])).unwrap();
        queue.enqueue_client_packet(chat_builder(true), None, Some(second_seen));

        settle().await;

        let written = link.written();
        assert_eq!(written.len(), 3);
        assert_eq!(written[0], TestPacket::Chat { last_seen: Some((0, true)) });
        assert_eq!(written[1], TestPacket::Chat { last_seen: Some((0, false)) });
        assert_eq!(written[2], TestPacket::Chat { last_seen: Some((0, true)) });
    }

    #[tokio::test]
    async fn build_failure_still_commits_state_but_writes_nothing() {
        let (queue, link) = spawn_queue();

        let seen = LastSeenMessages::new(0, conduit_utils::BitSet::from_indices(20, [4])).unwrap();
        queue.enqueue_client_packet(
            |_| -> BoxFuture<'static, Result<TestPacket, BuildError>> {
                Box::pin(async { Err("synthesis failed".into()) })
            },
            Some(SystemTime::UNIX_EPOCH),
            Some(seen),
        );

        settle().await;
        assert!(link.written().is_empty());

        // A later synthesized task sees the committed state even though the
        // failing build never produced a packet.
        queue.enqueue_synthesized(|state| TestPacket::Chat {
            last_seen: Some((state.create_last_seen().offset(), false)),
        });
        settle().await;

        assert_eq!(link.written(), vec![TestPacket::Chat { last_seen: Some((0, false)) }]);
    }
}
