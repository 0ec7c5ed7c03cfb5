//! Message types and the fixed payload-length table.
//!
//! The type tag doubles as the channel index: tag `0x00` is the hub MCU
//! itself (control traffic), tags `0x01..=0x05` are the attached sensors.

use crate::error::{Result, WireError};

/// Number of logical channels on the link (hub MCU + five sensors).
pub const MSG_TYPE_COUNT: usize = 6;

/// Message type tag, one per logical channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum MsgType {
    /// The sensor hub MCU itself (control commands and responses).
    Mcu = 0x00,
    /// Camera trigger events.
    Camera = 0x01,
    /// Accelerometer samples.
    Accel = 0x02,
    /// Gyroscope samples.
    Gyro = 0x03,
    /// Magnetometer samples.
    Mag = 0x04,
    /// Barometer samples.
    Baro = 0x05,
}

impl MsgType {
    /// All message types in tag order.
    pub const ALL: [MsgType; MSG_TYPE_COUNT] = [
        MsgType::Mcu,
        MsgType::Camera,
        MsgType::Accel,
        MsgType::Gyro,
        MsgType::Mag,
        MsgType::Baro,
    ];

    /// Parse a wire tag byte.
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0x00 => Ok(MsgType::Mcu),
            0x01 => Ok(MsgType::Camera),
            0x02 => Ok(MsgType::Accel),
            0x03 => Ok(MsgType::Gyro),
            0x04 => Ok(MsgType::Mag),
            0x05 => Ok(MsgType::Baro),
            other => Err(WireError::InvalidType(other)),
        }
    }

    /// The wire tag byte.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Channel index into the per-session channel registry.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Fixed payload length for this message type.
    ///
    /// This table is the single source of truth for payload sizing; the
    /// stream never carries a length field.
    pub fn payload_len(self) -> usize {
        match self {
            MsgType::Mcu => 4,
            MsgType::Camera => 12,
            MsgType::Accel => 18,
            MsgType::Gyro => 18,
            MsgType::Mag => 6,
            MsgType::Baro => 12,
        }
    }

    /// Device-node-style channel name, for diagnostics and the CLI.
    pub fn channel_name(self) -> &'static str {
        match self {
            MsgType::Mcu => "shub_mcu",
            MsgType::Camera => "shub_cam",
            MsgType::Accel => "shub_accel",
            MsgType::Gyro => "shub_gyro",
            MsgType::Mag => "shub_mag",
            MsgType::Baro => "shub_baro",
        }
    }
}
