use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use senshub_wire::MsgType;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod monitor;
pub mod ping;
pub mod send;
pub mod types;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Attach to a hub link and print decoded sensor traffic.
    Monitor(MonitorArgs),
    /// Send a single control command to the hub.
    Send(SendArgs),
    /// Ping the hub and report the round trip.
    Ping(PingArgs),
    /// Show the wire-format message type table.
    Types(TypesArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Monitor(args) => monitor::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Ping(args) => ping::run(args, format),
        Command::Types(args) => types::run(args),
    }
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Serial device node (or any readable stream path).
    pub device: PathBuf,
    /// Channels to print (comma-separated). Default: all.
    #[arg(long, value_delimiter = ',')]
    pub channel: Option<Vec<ChannelArg>>,
    /// Exit after printing N samples.
    #[arg(long)]
    pub count: Option<u64>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial device node.
    pub device: PathBuf,
    /// Control command to send.
    #[arg(long, short = 'c')]
    pub command: CommandArg,
}

#[derive(Args, Debug)]
pub struct PingArgs {
    /// Serial device node.
    pub device: PathBuf,
    /// Milliseconds to wait for the hub's response.
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,
}

#[derive(Args, Debug, Default)]
pub struct TypesArgs {}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ChannelArg {
    Mcu,
    Cam,
    Accel,
    Gyro,
    Mag,
    Baro,
}

impl ChannelArg {
    pub fn msg_type(self) -> MsgType {
        match self {
            ChannelArg::Mcu => MsgType::Mcu,
            ChannelArg::Cam => MsgType::Camera,
            ChannelArg::Accel => MsgType::Accel,
            ChannelArg::Gyro => MsgType::Gyro,
            ChannelArg::Mag => MsgType::Mag,
            ChannelArg::Baro => MsgType::Baro,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum CommandArg {
    Ping,
    StartTs,
    StopTs,
}

impl CommandArg {
    pub fn control(self) -> senshub_wire::Command {
        match self {
            CommandArg::Ping => senshub_wire::Command::Ping,
            CommandArg::StartTs => senshub_wire::Command::StartTimestamp,
            CommandArg::StopTs => senshub_wire::Command::StopTimestamp,
        }
    }
}
