//! Wire format for the sensor hub serial link.
//!
//! Every packet on the link is framed with:
//! - A 1-byte start marker (`'S'`) for stream synchronization
//! - A 1-byte message type tag selecting the logical channel
//! - A fixed-length payload determined solely by the type tag
//! - A 4-byte little-endian CRC-32 over header + payload
//!
//! Payload lengths are never self-described in the stream; both ends share
//! the type table in [`MsgType::payload_len`].

pub mod codec;
pub mod command;
pub mod crc;
pub mod error;
pub mod payload;
pub mod types;

pub use codec::{
    encode_command, encode_packet, CRC_SIZE, HEADER_SIZE, MAX_PACKET_SIZE, MAX_PAYLOAD_LEN,
    START_BYTE,
};
pub use command::Command;
pub use crc::checksum;
pub use error::{Result, WireError};
pub use payload::{
    AccelPayload, BaroPayload, CameraPayload, GyroPayload, MagPayload, McuPayload, Payload,
};
pub use types::{MsgType, MSG_TYPE_COUNT};
