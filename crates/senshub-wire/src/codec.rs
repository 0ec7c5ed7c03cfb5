use bytes::{BufMut, BytesMut};

use crate::command::Command;
use crate::crc::checksum;
use crate::error::{Result, WireError};
use crate::types::MsgType;

/// Packet start marker: `'S'`.
pub const START_BYTE: u8 = 0x53;

/// Packet header: start marker (1) + type tag (1) = 2 bytes.
pub const HEADER_SIZE: usize = 2;

/// Trailing integrity code size.
pub const CRC_SIZE: usize = 4;

/// Largest payload in the type table (accel/gyro).
pub const MAX_PAYLOAD_LEN: usize = 18;

/// Largest possible packet: header + max payload + CRC.
pub const MAX_PACKET_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_LEN + CRC_SIZE;

/// Encode a packet into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────┬────────────┬───────────────┬────────────┐
/// │ Start (1B) │ Type (1B)  │ Payload       │ CRC-32     │
/// │ 'S' (0x53) │ 0x00..0x05 │ (per type)    │ (4B LE)    │
/// └────────────┴────────────┴───────────────┴────────────┘
/// ```
///
/// The payload length must match the type table; nothing on the wire
/// describes it.
pub fn encode_packet(msg_type: MsgType, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let expected = msg_type.payload_len();
    if payload.len() != expected {
        return Err(WireError::PayloadLength {
            msg_type,
            expected,
            actual: payload.len(),
        });
    }

    let start = dst.len();
    dst.reserve(HEADER_SIZE + payload.len() + CRC_SIZE);
    dst.put_u8(START_BYTE);
    dst.put_u8(msg_type.tag());
    dst.put_slice(payload);
    let crc = checksum(&dst[start..]);
    dst.put_u32_le(crc);
    Ok(())
}

/// Encode a control packet for the hub MCU.
///
/// The command code is validated first; invalid codes never reach the wire.
pub fn encode_command(code: u32, dst: &mut BytesMut) -> Result<Command> {
    let command = Command::from_code(code)?;
    encode_packet(MsgType::Mcu, &code.to_le_bytes(), dst)?;
    Ok(command)
}
