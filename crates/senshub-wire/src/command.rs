//! Control commands addressed to the hub MCU.
//!
//! Responses from the hub mirror the same codes back on the Mcu channel.

use crate::error::{Result, WireError};

/// A control command carried in an Mcu packet payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u32)]
pub enum Command {
    /// Liveness probe; the hub echoes the code back.
    Ping = 0x21,
    /// Start emitting hardware timestamps.
    StartTimestamp = 0x22,
    /// Stop emitting hardware timestamps.
    StopTimestamp = 0x23,
}

impl Command {
    /// Validate a raw command code.
    ///
    /// Codes outside the defined range are rejected here, before any byte
    /// reaches the transport.
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            0x21 => Ok(Command::Ping),
            0x22 => Ok(Command::StartTimestamp),
            0x23 => Ok(Command::StopTimestamp),
            other => Err(WireError::InvalidCommand(other)),
        }
    }

    /// The wire code for this command (and its mirrored response).
    pub fn code(self) -> u32 {
        self as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_roundtrip() {
        for cmd in [Command::Ping, Command::StartTimestamp, Command::StopTimestamp] {
            assert_eq!(Command::from_code(cmd.code()).unwrap(), cmd);
        }
    }

    #[test]
    fn rejects_codes_outside_range() {
        for code in [0x00u32, 0x20, 0x24, 0xCAFE] {
            assert!(matches!(
                Command::from_code(code),
                Err(WireError::InvalidCommand(c)) if c == code
            ));
        }
    }
}
