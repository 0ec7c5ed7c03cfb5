//! Resynchronizing frame parser.
//!
//! Consumes the inbound stream one byte at a time and assembles at most one
//! packet in a fixed scratch buffer. Any framing violation throws the
//! in-progress bytes away and resumes scanning for the next start marker, so
//! the parser survives arbitrary line noise indefinitely.

use senshub_wire::{checksum, MsgType, CRC_SIZE, HEADER_SIZE, MAX_PACKET_SIZE, START_BYTE};
use tracing::trace;

/// Outcome of feeding one byte to the parser.
#[derive(Debug)]
pub enum Step<'a> {
    /// Mid-packet (or discarding noise); feed more bytes.
    Pending,
    /// A complete packet with a valid integrity code, as full wire bytes.
    Complete { msg_type: MsgType, packet: &'a [u8] },
    /// A complete packet whose integrity code did not match; discarded.
    CrcMismatch {
        msg_type: MsgType,
        computed: u32,
        received: u32,
    },
}

/// Byte-at-a-time framing state machine.
///
/// State lives for the whole transport session; it resets to scanning after
/// every completed or discarded packet.
pub struct FrameParser {
    scratch: [u8; MAX_PACKET_SIZE],
    byte_idx: usize,
    pending: Option<MsgType>,
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            scratch: [0u8; MAX_PACKET_SIZE],
            byte_idx: 0,
            pending: None,
        }
    }

    /// Feed one byte, advancing the state machine.
    pub fn step(&mut self, byte: u8) -> Step<'_> {
        if self.byte_idx >= MAX_PACKET_SIZE {
            // Index ran past the longest possible packet; only reachable if
            // the expected length was corrupted. Start over.
            self.reset();
        }

        self.scratch[self.byte_idx] = byte;
        let pos = self.byte_idx;
        self.byte_idx += 1;

        match pos {
            0 => {
                if byte != START_BYTE {
                    trace!(byte, "discarding byte while scanning for start marker");
                    self.reset();
                }
                Step::Pending
            }
            1 => {
                match MsgType::from_tag(byte) {
                    Ok(msg_type) => self.pending = Some(msg_type),
                    Err(_) => {
                        trace!(tag = byte, "invalid type tag; resynchronizing");
                        self.reset();
                    }
                }
                Step::Pending
            }
            _ => {
                let Some(msg_type) = self.pending else {
                    self.reset();
                    return Step::Pending;
                };

                let total = HEADER_SIZE + msg_type.payload_len() + CRC_SIZE;
                if self.byte_idx < total {
                    return Step::Pending;
                }

                self.reset();

                let crc_at = total - CRC_SIZE;
                let computed = checksum(&self.scratch[..crc_at]);
                let received = u32::from_le_bytes([
                    self.scratch[crc_at],
                    self.scratch[crc_at + 1],
                    self.scratch[crc_at + 2],
                    self.scratch[crc_at + 3],
                ]);

                if computed == received {
                    Step::Complete {
                        msg_type,
                        packet: &self.scratch[..total],
                    }
                } else {
                    Step::CrcMismatch {
                        msg_type,
                        computed,
                        received,
                    }
                }
            }
        }
    }

    fn reset(&mut self) {
        self.byte_idx = 0;
        self.pending = None;
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}
