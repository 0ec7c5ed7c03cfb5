//! Typed views of the fixed payload shapes.
//!
//! The demultiplexer core routes payloads as opaque bytes; these helpers are
//! for the endpoints: callers decoding what they read off a channel, and
//! test/tooling code building hub-side packets. All fields little-endian.

use bytes::BufMut;

use crate::error::{Result, WireError};
use crate::types::MsgType;

/// Mcu channel payload: a control command or its mirrored response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct McuPayload {
    pub code: u32,
}

/// Camera trigger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraPayload {
    pub timestamp: u64,
    pub pulse_count: u32,
}

/// Accelerometer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccelPayload {
    pub timestamp: u64,
    pub pulse_count: u32,
    pub axis: [i16; 3],
}

/// Gyroscope sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GyroPayload {
    pub timestamp: u64,
    pub pulse_count: u32,
    pub axis: [i16; 3],
}

/// Magnetometer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MagPayload {
    pub axis: [i16; 3],
}

/// Barometer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaroPayload {
    pub timestamp: u64,
    pub pressure: u32,
}

/// A decoded payload, tagged by message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Payload {
    Mcu(McuPayload),
    Camera(CameraPayload),
    Accel(AccelPayload),
    Gyro(GyroPayload),
    Mag(MagPayload),
    Baro(BaroPayload),
}

impl Payload {
    /// Decode payload bytes as read off a channel.
    pub fn decode(msg_type: MsgType, bytes: &[u8]) -> Result<Self> {
        expect_len(msg_type, bytes)?;
        let p = match msg_type {
            MsgType::Mcu => Payload::Mcu(McuPayload {
                code: read_u32(bytes, 0),
            }),
            MsgType::Camera => Payload::Camera(CameraPayload {
                timestamp: read_u64(bytes, 0),
                pulse_count: read_u32(bytes, 8),
            }),
            MsgType::Accel => Payload::Accel(AccelPayload {
                timestamp: read_u64(bytes, 0),
                pulse_count: read_u32(bytes, 8),
                axis: read_axis(bytes, 12),
            }),
            MsgType::Gyro => Payload::Gyro(GyroPayload {
                timestamp: read_u64(bytes, 0),
                pulse_count: read_u32(bytes, 8),
                axis: read_axis(bytes, 12),
            }),
            MsgType::Mag => Payload::Mag(MagPayload {
                axis: read_axis(bytes, 0),
            }),
            MsgType::Baro => Payload::Baro(BaroPayload {
                timestamp: read_u64(bytes, 0),
                pressure: read_u32(bytes, 8),
            }),
        };
        Ok(p)
    }

    /// The message type this payload travels on.
    pub fn msg_type(&self) -> MsgType {
        match self {
            Payload::Mcu(_) => MsgType::Mcu,
            Payload::Camera(_) => MsgType::Camera,
            Payload::Accel(_) => MsgType::Accel,
            Payload::Gyro(_) => MsgType::Gyro,
            Payload::Mag(_) => MsgType::Mag,
            Payload::Baro(_) => MsgType::Baro,
        }
    }

    /// Encode this payload into wire bytes.
    pub fn encode(&self, dst: &mut impl BufMut) {
        match self {
            Payload::Mcu(p) => dst.put_u32_le(p.code),
            Payload::Camera(p) => {
                dst.put_u64_le(p.timestamp);
                dst.put_u32_le(p.pulse_count);
            }
            Payload::Accel(p) => {
                dst.put_u64_le(p.timestamp);
                dst.put_u32_le(p.pulse_count);
                put_axis(dst, p.axis);
            }
            Payload::Gyro(p) => {
                dst.put_u64_le(p.timestamp);
                dst.put_u32_le(p.pulse_count);
                put_axis(dst, p.axis);
            }
            Payload::Mag(p) => put_axis(dst, p.axis),
            Payload::Baro(p) => {
                dst.put_u64_le(p.timestamp);
                dst.put_u32_le(p.pressure);
            }
        }
    }

    /// Encode to a fresh byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.msg_type().payload_len());
        self.encode(&mut out);
        out
    }
}

fn expect_len(msg_type: MsgType, bytes: &[u8]) -> Result<()> {
    let expected = msg_type.payload_len();
    if bytes.len() != expected {
        return Err(WireError::PayloadLength {
            msg_type,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(raw)
}

fn read_u64(bytes: &[u8], at: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(raw)
}

fn read_axis(bytes: &[u8], at: usize) -> [i16; 3] {
    let mut axis = [0i16; 3];
    for (i, a) in axis.iter_mut().enumerate() {
        let off = at + i * 2;
        *a = i16::from_le_bytes([bytes[off], bytes[off + 1]]);
    }
    axis
}

fn put_axis(dst: &mut impl BufMut, axis: [i16; 3]) {
    for a in axis {
        dst.put_i16_le(a);
    }
}
