use senshub_mux::ControlWriter;

use crate::cmd::SendArgs;
use crate::exit::{io_error, write_error, CliResult, SUCCESS};
use crate::output::OutputFormat;
use crate::tty;

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let device = tty::open(&args.device).map_err(|err| io_error("open device", err))?;

    let command = args.command.control();
    let writer = ControlWriter::new(device);
    writer
        .send(command)
        .map_err(|err| write_error("send command", err))?;

    match format {
        OutputFormat::Text => println!("sent {command:?} ({:#04x})", command.code()),
        OutputFormat::Json => {
            let line = serde_json::json!({
                "sent": command,
                "code": command.code(),
            });
            println!("{line}");
        }
    }
    Ok(SUCCESS)
}
