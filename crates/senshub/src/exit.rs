use std::fmt;
use std::io;

use senshub_mux::{PumpError, ReadError, WriteError};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn pump_error(context: &str, err: PumpError) -> CliError {
    match err {
        PumpError::Io(source) => io_error(context, source),
    }
}

pub fn read_error(context: &str, err: ReadError) -> CliError {
    match err {
        ReadError::TimedOut | ReadError::WouldBlock => {
            CliError::new(TIMEOUT, format!("{context}: {err}"))
        }
        ReadError::Closed => CliError::new(FAILURE, format!("{context}: {err}")),
        ReadError::BufferTooSmall { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

pub fn write_error(context: &str, err: WriteError) -> CliError {
    match err {
        WriteError::Io(source) => io_error(context, source),
        WriteError::Rejected(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        WriteError::WouldBlock { .. } => CliError::new(TIMEOUT, format!("{context}: {err}")),
        WriteError::Cancelled { .. } | WriteError::LinkClosed => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}
