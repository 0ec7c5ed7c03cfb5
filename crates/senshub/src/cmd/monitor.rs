use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use senshub_mux::{LinkPump, ReadError, Session};
use senshub_wire::{MsgType, MAX_PAYLOAD_LEN};
use tracing::warn;

use crate::cmd::MonitorArgs;
use crate::exit::{io_error, pump_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_sample, OutputFormat};
use crate::tty;

pub fn run(args: MonitorArgs, format: OutputFormat) -> CliResult<i32> {
    let device = tty::open(&args.device).map_err(|err| io_error("open device", err))?;

    let stop = Arc::new(AtomicBool::new(false));
    install_ctrlc_handler(Arc::clone(&stop))?;

    let selected: Vec<MsgType> = match &args.channel {
        Some(list) => list.iter().map(|c| c.msg_type()).collect(),
        None => MsgType::ALL.to_vec(),
    };

    let session = Session::new();
    let printed = Arc::new(AtomicU64::new(0));
    let mut readers = Vec::new();

    for msg_type in selected {
        let handle = session.open(msg_type);
        let printed = Arc::clone(&printed);
        let stop = Arc::clone(&stop);
        let count = args.count;

        readers.push(std::thread::spawn(move || {
            let mut buf = [0u8; MAX_PAYLOAD_LEN];
            loop {
                match handle.read(&mut buf) {
                    Ok(n) => {
                        print_sample(msg_type, &buf[..n], format);
                        let total = printed.fetch_add(1, Ordering::SeqCst) + 1;
                        if count.is_some_and(|limit| total >= limit) {
                            stop.store(true, Ordering::SeqCst);
                            break;
                        }
                    }
                    Err(ReadError::Closed) => break,
                    Err(err) => {
                        warn!(channel = msg_type.channel_name(), %err, "read failed");
                        break;
                    }
                }
            }
        }));
    }

    // The pump owns the session; every exit path below wakes the readers.
    let mut pump = LinkPump::new(device, session).with_stop_flag(stop);
    let result = pump.run();

    for reader in readers {
        let _ = reader.join();
    }

    result.map_err(|err| pump_error("link pump", err))?;
    Ok(SUCCESS)
}

fn install_ctrlc_handler(stop: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        stop.store(true, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
