mod cmd;
mod exit;
mod logging;
mod output;
mod tty;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "senshub", version, about = "Sensor hub serial link CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    format: OutputFormat,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match cmd::run(cli.command, cli.format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_monitor_subcommand() {
        let cli = Cli::try_parse_from([
            "senshub",
            "monitor",
            "/dev/ttyTHS1",
            "--channel",
            "accel,gyro",
            "--count",
            "10",
        ])
        .expect("monitor args should parse");

        assert!(matches!(cli.command, Command::Monitor(_)));
    }

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::try_parse_from([
            "senshub",
            "send",
            "/dev/ttyTHS1",
            "--command",
            "start-ts",
        ])
        .expect("send args should parse");

        assert!(matches!(cli.command, Command::Send(_)));
    }

    #[test]
    fn parses_ping_with_timeout() {
        let cli =
            Cli::try_parse_from(["senshub", "ping", "/dev/ttyTHS1", "--timeout-ms", "500"])
                .expect("ping args should parse");
        assert!(matches!(cli.command, Command::Ping(_)));
    }

    #[test]
    fn rejects_unknown_channel_name() {
        Cli::try_parse_from(["senshub", "monitor", "/dev/ttyTHS1", "--channel", "sonar"])
            .expect_err("unknown channel should fail");
    }
}
