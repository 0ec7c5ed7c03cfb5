//! Caller-facing channel read handles.

use std::sync::Arc;
use std::time::Duration;

use senshub_wire::MsgType;

use crate::channel::Channel;
use crate::error::ReadError;

/// An open handle on one logical channel.
///
/// Cloning yields another handle on the same channel; each clone may block
/// independently. The handle keeps the channel's buffer alive even after
/// session teardown, so reads past shutdown fail with
/// [`ReadError::Closed`] rather than touching freed memory. Closing is
/// simply dropping the handle.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    channel: Arc<Channel>,
}

impl ChannelHandle {
    pub(crate) fn new(channel: Arc<Channel>) -> Self {
        Self { channel }
    }

    /// The message type this handle reads.
    pub fn msg_type(&self) -> MsgType {
        self.channel.msg_type()
    }

    /// Read one message's payload, blocking until one arrives or the
    /// session is torn down.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, ReadError> {
        self.channel.read_message(buf)
    }

    /// Read one message's payload if one is already buffered.
    pub fn try_read(&self, buf: &mut [u8]) -> Result<usize, ReadError> {
        self.channel.try_read_message(buf)
    }

    /// Read one message's payload, waiting at most `timeout`.
    pub fn read_timeout(&self, buf: &mut [u8], timeout: Duration) -> Result<usize, ReadError> {
        self.channel.read_message_timeout(buf, timeout)
    }

    /// Readiness poll: whether a read would return without blocking.
    pub fn readable(&self) -> bool {
        self.channel.readable()
    }
}
