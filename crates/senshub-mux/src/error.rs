use senshub_wire::WireError;

/// Errors surfaced to channel readers.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReadError {
    /// No complete message is buffered (non-blocking read).
    #[error("no complete message available")]
    WouldBlock,

    /// The deadline passed before a message arrived.
    #[error("timed out waiting for a message")]
    TimedOut,

    /// The session was torn down while reading (or before).
    #[error("channel closed")]
    Closed,

    /// The caller's buffer cannot hold the pending payload.
    ///
    /// The message is left in the channel; a retry with a larger buffer
    /// succeeds.
    #[error("caller buffer too small ({needed} bytes needed, {provided} provided)")]
    BufferTooSmall { needed: usize, provided: usize },
}

/// Errors surfaced to control command writers.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The command failed validation before any byte was written.
    #[error("command rejected: {0}")]
    Rejected(#[from] WireError),

    /// The transport accepted a zero-length write.
    #[error("link closed")]
    LinkClosed,

    /// The transport is in non-blocking mode and its buffer is full.
    /// A prefix of the packet may already have been sent.
    #[error("link write would block ({sent} of {total} bytes sent)")]
    WouldBlock { sent: usize, total: usize },

    /// The caller's cancellation flag was raised mid-write.
    #[error("write cancelled ({sent} of {total} bytes sent)")]
    Cancelled { sent: usize, total: usize },

    /// A hard transport error.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors terminating the inbound pump.
#[derive(Debug, thiserror::Error)]
pub enum PumpError {
    /// A hard transport error. The session has been shut down.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),
}
