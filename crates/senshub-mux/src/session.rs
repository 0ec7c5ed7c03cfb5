//! Per-link session: channel registry, demultiplexer, teardown.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use senshub_wire::{MsgType, MSG_TYPE_COUNT};
use tracing::{debug, warn};

use crate::channel::Channel;
use crate::parser::{FrameParser, Step};
use crate::reader::ChannelHandle;

/// Receive status of one inbound byte, as reported by the transport.
///
/// Serial transports flag bytes received during line errors; those bytes
/// carry no data and are skipped without disturbing the frame parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    Normal,
    Break,
    ParityError,
    FrameError,
    Overrun,
}

#[derive(Debug, Default)]
struct SessionStats {
    delivered: AtomicU64,
    crc_errors: AtomicU64,
    dropped: AtomicU64,
}

/// Counter snapshot for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Packets enqueued to a channel.
    pub delivered: u64,
    /// Packets discarded for integrity-code mismatch.
    pub crc_errors: u64,
    /// Packets discarded because the target channel was full.
    pub dropped: u64,
}

/// One open transport session: the six ring channels, the frame parser, and
/// drop/error accounting.
///
/// Created when the transport opens; tearing it down (explicitly via
/// [`Session::shutdown`] or by dropping it) wakes every blocked reader with
/// a cancellation error before the buffers go away. Reader handles hold
/// their channel alive, so a late reader can never observe a freed buffer.
pub struct Session {
    channels: [Arc<Channel>; MSG_TYPE_COUNT],
    parser: FrameParser,
    stats: Arc<SessionStats>,
}

impl Session {
    pub fn new() -> Self {
        let channels = MsgType::ALL.map(|ty| Arc::new(Channel::new(ty)));
        debug!("session open");
        Self {
            channels,
            parser: FrameParser::new(),
            stats: Arc::new(SessionStats::default()),
        }
    }

    /// Open a reader handle on one logical channel.
    pub fn open(&self, msg_type: MsgType) -> ChannelHandle {
        ChannelHandle::new(Arc::clone(&self.channels[msg_type.index()]))
    }

    /// Feed an inbound chunk through the parser, dispatching completed
    /// packets to their channels.
    ///
    /// Called sequentially from the single transport receive path; channel
    /// locks are taken only for the enqueue itself.
    pub fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.ingest(byte);
        }
    }

    /// Like [`Session::feed`], but honors per-byte receive status.
    ///
    /// Bytes flagged with a line error are skipped entirely; bytes past the
    /// end of `flags` are treated as [`LineStatus::Normal`].
    pub fn feed_flagged(&mut self, bytes: &[u8], flags: &[LineStatus]) {
        for (i, &byte) in bytes.iter().enumerate() {
            match flags.get(i).copied().unwrap_or(LineStatus::Normal) {
                LineStatus::Normal => self.ingest(byte),
                status => {
                    debug!(?status, "skipping byte flagged by transport");
                }
            }
        }
    }

    fn ingest(&mut self, byte: u8) {
        match self.parser.step(byte) {
            Step::Pending => {}
            Step::Complete { msg_type, packet } => {
                // Identity mapping: the type tag is the channel index.
                if self.channels[msg_type.index()].push_packet(packet) {
                    self.stats.delivered.fetch_add(1, Ordering::Relaxed);
                } else {
                    self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        channel = msg_type.channel_name(),
                        "discarding packet: no buffer space"
                    );
                }
            }
            Step::CrcMismatch {
                msg_type,
                computed,
                received,
            } => {
                self.stats.crc_errors.fetch_add(1, Ordering::Relaxed);
                warn!(
                    channel = msg_type.channel_name(),
                    computed, received, "discarding packet: crc mismatch"
                );
            }
        }
    }

    /// Current drop/error counters.
    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            delivered: self.stats.delivered.load(Ordering::Relaxed),
            crc_errors: self.stats.crc_errors.load(Ordering::Relaxed),
            dropped: self.stats.dropped.load(Ordering::Relaxed),
        }
    }

    /// Tear the session down: every blocked reader on every channel is woken
    /// and returns [`crate::ReadError::Closed`].
    pub fn shutdown(&self) {
        debug!("session shutdown");
        for channel in &self.channels {
            channel.close();
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Readers are woken before the session's channel references go away.
        self.shutdown();
    }
}
