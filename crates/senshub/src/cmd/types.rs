use comfy_table::Table;
use senshub_wire::MsgType;

use crate::cmd::TypesArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(_args: TypesArgs) -> CliResult<i32> {
    let mut table = Table::new();
    table.set_header(["type", "tag", "payload bytes", "device"]);

    for ty in MsgType::ALL {
        table.add_row([
            format!("{ty:?}"),
            format!("{:#04x}", ty.tag()),
            ty.payload_len().to_string(),
            ty.channel_name().to_string(),
        ]);
    }

    println!("{table}");
    Ok(SUCCESS)
}
