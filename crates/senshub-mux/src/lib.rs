//! Serial stream demultiplexer for sensor hub microcontrollers.
//!
//! A sensor hub aggregates several physical sensors onto one serial link.
//! This crate splits that single byte stream into independent logical
//! channels (one per sensor, plus a control channel to the hub itself) and
//! serializes outbound control commands back onto the same link:
//!
//! - [`Session`]: owns the six ring channels and the framing state machine
//! - [`LinkPump`]: drives the session from any `Read` transport
//! - [`ChannelHandle`]: per-channel blocking/non-blocking reads
//! - [`ControlWriter`]: link-exclusive control command writes
//!
//! The parser resynchronizes on arbitrary line noise; a packet that fails
//! its CRC is never observable on any channel.

pub mod channel;
pub mod error;
pub mod parser;
pub mod pump;
pub mod reader;
pub mod session;
pub mod writer;

pub use channel::{Channel, RING_CAPACITY};
pub use error::{PumpError, ReadError, WriteError};
pub use parser::{FrameParser, Step};
pub use pump::LinkPump;
pub use reader::ChannelHandle;
pub use session::{LineStatus, Session, StatsSnapshot};
pub use writer::ControlWriter;
