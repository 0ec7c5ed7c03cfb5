//! Outbound control command writer.

use std::io::{ErrorKind, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::BytesMut;
use senshub_wire::{encode_command, Command, MAX_PACKET_SIZE};
use tracing::{debug, trace};

use crate::error::WriteError;

/// Writes control packets for the hub MCU onto the transport.
///
/// The physical link is shared by every caller, so writes serialize on a
/// link-wide lock distinct from any channel's buffer lock; a packet is never
/// interleaved with another writer's bytes. Partial transport writes are
/// retried with the remaining suffix until the packet is fully sent, the
/// cancellation flag is raised, or a non-blocking transport reports
/// exhaustion.
pub struct ControlWriter<T> {
    link: Mutex<T>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<T: Write> ControlWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            link: Mutex::new(inner),
            cancel: None,
        }
    }

    /// Attach a cancellation flag checked between write attempts.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Encode and send one control command.
    pub fn send(&self, command: Command) -> Result<(), WriteError> {
        self.send_code(command.code())
    }

    /// Validate a raw command code, then encode and send it.
    ///
    /// Invalid codes are rejected before any byte reaches the link.
    pub fn send_code(&self, code: u32) -> Result<(), WriteError> {
        let mut packet = BytesMut::with_capacity(MAX_PACKET_SIZE);
        let command = encode_command(code, &mut packet)?;

        let mut link = self.lock_link();
        let total = packet.len();
        let mut sent = 0usize;

        while sent < total {
            if self.cancelled() {
                return Err(WriteError::Cancelled { sent, total });
            }
            match link.write(&packet[sent..]) {
                Ok(0) => return Err(WriteError::LinkClosed),
                Ok(n) => sent += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => {
                    return Err(WriteError::WouldBlock { sent, total });
                }
                Err(err) => return Err(WriteError::Io(err)),
            }
        }

        flush(&mut *link)?;
        debug!(?command, "control command sent");
        Ok(())
    }

    /// Borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        self.link.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consume the writer and return the transport.
    pub fn into_inner(self) -> T {
        self.link
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    fn lock_link(&self) -> std::sync::MutexGuard<'_, T> {
        self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn flush(link: &mut impl Write) -> Result<(), WriteError> {
    loop {
        match link.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                // The packet is queued in the transport; nothing left to do.
                trace!("flush would block");
                return Ok(());
            }
            Err(err) => return Err(WriteError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use senshub_wire::checksum;

    use super::*;

    #[test]
    fn ping_produces_exact_wire_bytes() {
        let mut writer = ControlWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(Command::Ping).unwrap();

        let body = [0x53u8, 0x00, 0x21, 0x00, 0x00, 0x00];
        let mut expected = body.to_vec();
        expected.extend_from_slice(&checksum(&body).to_le_bytes());

        let _ = writer.get_mut();
        assert_eq!(writer.into_inner().into_inner(), expected);
    }

    #[test]
    fn invalid_code_rejected_before_any_write() {
        let writer = ControlWriter::new(Cursor::new(Vec::<u8>::new()));
        let err = writer.send_code(0x42).unwrap_err();
        assert!(matches!(err, WriteError::Rejected(_)));
        assert!(writer.into_inner().into_inner().is_empty());
    }

    #[test]
    fn partial_writes_are_retried_to_completion() {
        struct TrickleWriter(Vec<u8>);
        impl Write for TrickleWriter {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                // One byte per call.
                self.0.push(buf[0]);
                Ok(1)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let writer = ControlWriter::new(TrickleWriter(Vec::new()));
        writer.send(Command::StartTimestamp).unwrap();
        assert_eq!(writer.into_inner().0.len(), 10);
    }

    #[test]
    fn interrupted_write_is_retried() {
        struct InterruptOnce {
            interrupted: bool,
            data: Vec<u8>,
        }
        impl Write for InterruptOnce {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(std::io::Error::from(ErrorKind::Interrupted));
                }
                self.data.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let writer = ControlWriter::new(InterruptOnce {
            interrupted: false,
            data: Vec::new(),
        });
        writer.send(Command::Ping).unwrap();
        assert_eq!(writer.into_inner().data.len(), 10);
    }

    #[test]
    fn would_block_reports_sent_prefix() {
        struct BlockAfter {
            budget: usize,
            data: Vec<u8>,
        }
        impl Write for BlockAfter {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if self.budget == 0 {
                    return Err(std::io::Error::from(ErrorKind::WouldBlock));
                }
                let n = buf.len().min(self.budget);
                self.budget -= n;
                self.data.extend_from_slice(&buf[..n]);
                Ok(n)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let writer = ControlWriter::new(BlockAfter {
            budget: 3,
            data: Vec::new(),
        });
        let err = writer.send(Command::Ping).unwrap_err();
        assert!(matches!(
            err,
            WriteError::WouldBlock { sent: 3, total: 10 }
        ));
        assert_eq!(writer.into_inner().data.len(), 3);
    }

    #[test]
    fn zero_length_write_means_link_closed() {
        struct ZeroWriter;
        impl Write for ZeroWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let writer = ControlWriter::new(ZeroWriter);
        let err = writer.send(Command::Ping).unwrap_err();
        assert!(matches!(err, WriteError::LinkClosed));
    }

    #[test]
    fn raised_cancel_flag_aborts_the_write() {
        let flag = Arc::new(AtomicBool::new(true));
        let writer =
            ControlWriter::new(Cursor::new(Vec::<u8>::new())).with_cancel_flag(Arc::clone(&flag));

        let err = writer.send(Command::StopTimestamp).unwrap_err();
        assert!(matches!(err, WriteError::Cancelled { sent: 0, total: 10 }));
        assert!(writer.into_inner().into_inner().is_empty());
    }
}
