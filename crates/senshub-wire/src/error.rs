/// Errors that can occur while encoding or decoding wire data.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The type tag is not one of the six defined message types.
    #[error("invalid message type tag {0:#04x}")]
    InvalidType(u8),

    /// The payload length does not match the type table entry.
    #[error("payload length mismatch for {msg_type:?} (expected {expected}, got {actual})")]
    PayloadLength {
        msg_type: crate::types::MsgType,
        expected: usize,
        actual: usize,
    },

    /// The trailing integrity code does not match the computed CRC-32.
    #[error("crc mismatch (computed {computed:#010x}, received {received:#010x})")]
    CrcMismatch { computed: u32, received: u32 },

    /// The command code is outside the defined control command range.
    #[error("invalid control command code {0:#04x}")]
    InvalidCommand(u32),
}

pub type Result<T> = std::result::Result<T, WireError>;
