use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use senshub_mux::{ControlWriter, LinkPump, ReadError, Session};
use senshub_wire::{Command, MsgType};

use crate::cmd::PingArgs;
use crate::exit::{
    io_error, read_error, write_error, CliError, CliResult, DATA_INVALID, SUCCESS, TIMEOUT,
};
use crate::output::OutputFormat;
use crate::tty;

pub fn run(args: PingArgs, format: OutputFormat) -> CliResult<i32> {
    let device = tty::open(&args.device).map_err(|err| io_error("open device", err))?;
    let inbound = device
        .try_clone()
        .map_err(|err| io_error("clone device handle", err))?;

    let session = Session::new();
    let mcu = session.open(MsgType::Mcu);

    let stop = Arc::new(AtomicBool::new(false));
    let mut pump = LinkPump::new(inbound, session).with_stop_flag(Arc::clone(&stop));
    // Detached on exit; it parks in read() until the device yields.
    std::thread::spawn(move || {
        let _ = pump.run();
    });

    let writer = ControlWriter::new(device);
    let started = Instant::now();
    writer
        .send(Command::Ping)
        .map_err(|err| write_error("send ping", err))?;

    let mut buf = [0u8; 4];
    let result = mcu.read_timeout(&mut buf, Duration::from_millis(args.timeout_ms));
    stop.store(true, Ordering::SeqCst);

    match result {
        Ok(_) => {
            let rtt = started.elapsed();
            let code = u32::from_le_bytes(buf);
            if code != Command::Ping.code() {
                return Err(CliError::new(
                    DATA_INVALID,
                    format!("unexpected response code {code:#04x}"),
                ));
            }
            match format {
                OutputFormat::Text => println!("hub responded in {rtt:?}"),
                OutputFormat::Json => {
                    let line = serde_json::json!({
                        "response": code,
                        "rtt_us": rtt.as_micros() as u64,
                    });
                    println!("{line}");
                }
            }
            Ok(SUCCESS)
        }
        Err(ReadError::TimedOut) => Err(CliError::new(
            TIMEOUT,
            format!("no response from hub within {}ms", args.timeout_ms),
        )),
        Err(err) => Err(read_error("await response", err)),
    }
}
