//! Inbound transport pump.
//!
//! The transport adapter hands the session arbitrarily-chunked byte
//! arrivals; this pump is the blocking-`Read` rendition of that seam. It
//! owns the session so that losing the transport (EOF, hard error, stop
//! request) tears the session down and wakes every blocked reader.

use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::PumpError;
use crate::session::Session;

const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Drives a [`Session`] from any `Read` transport.
pub struct LinkPump<T> {
    inner: T,
    session: Session,
    stop: Option<Arc<AtomicBool>>,
}

impl<T: Read> LinkPump<T> {
    pub fn new(inner: T, session: Session) -> Self {
        Self {
            inner,
            session,
            stop: None,
        }
    }

    /// Attach a stop flag checked between inbound chunks.
    ///
    /// Raising it stops the pump at the next chunk boundary; a pump blocked
    /// in `read` reacts once the transport yields.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    /// The session this pump feeds; open reader handles from here.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Pump until EOF, a hard transport error, or the stop flag.
    ///
    /// The session is shut down on every exit path, so blocked readers
    /// never outlive the transport.
    pub fn run(&mut self) -> Result<(), PumpError> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            if self.stopped() {
                debug!("pump stop requested");
                self.session.shutdown();
                return Ok(());
            }

            let read = match self.inner.read(&mut chunk) {
                Ok(0) => {
                    info!("link closed; shutting session down");
                    self.session.shutdown();
                    return Ok(());
                }
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.session.shutdown();
                    return Err(PumpError::Io(err));
                }
            };

            self.session.feed(&chunk[..read]);
        }
    }

    fn stopped(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}
