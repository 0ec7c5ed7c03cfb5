//! Serial device setup.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use tracing::debug;

/// Open a hub link read/write.
///
/// Device nodes are switched to raw mode so the line discipline does not
/// cook the byte stream; non-terminal paths (FIFOs, captured streams) are
/// opened as-is, which keeps the CLI usable against replayed data.
pub fn open(path: &Path) -> io::Result<File> {
    let file = OpenOptions::new().read(true).write(true).open(path)?;
    #[cfg(unix)]
    set_raw(&file)?;
    debug!(?path, "hub link open");
    Ok(file)
}

#[cfg(unix)]
fn set_raw(file: &File) -> io::Result<()> {
    use std::os::fd::AsRawFd;

    let fd = file.as_raw_fd();
    let mut termios = std::mem::MaybeUninit::<libc::termios>::uninit();

    // SAFETY: `fd` is an open descriptor owned by `file`, and `termios` is
    // a valid writable pointer for the struct size tcgetattr expects.
    let rc = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if rc != 0 {
        // Not a terminal; nothing to configure.
        return Ok(());
    }

    // SAFETY: tcgetattr initialized the struct above; cfmakeraw and
    // tcsetattr only read/write through these valid pointers.
    let rc = unsafe {
        let mut termios = termios.assume_init();
        libc::cfmakeraw(&mut termios);
        libc::tcsetattr(fd, libc::TCSANOW, &termios)
    };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
