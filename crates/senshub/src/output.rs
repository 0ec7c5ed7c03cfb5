use clap::ValueEnum;
use senshub_wire::{MsgType, Payload};
use tracing::warn;

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print one decoded sample to stdout.
///
/// `println!` takes the stdout lock per line, so samples from concurrent
/// channel readers never shear.
pub fn print_sample(msg_type: MsgType, payload: &[u8], format: OutputFormat) {
    let sample = match Payload::decode(msg_type, payload) {
        Ok(sample) => sample,
        Err(err) => {
            warn!(channel = msg_type.channel_name(), %err, "undecodable payload");
            return;
        }
    };

    match format {
        OutputFormat::Text => {
            println!("{:<11} {}", msg_type.channel_name(), describe(&sample));
        }
        OutputFormat::Json => {
            let line = serde_json::json!({
                "channel": msg_type.channel_name(),
                "sample": sample,
            });
            println!("{line}");
        }
    }
}

fn describe(sample: &Payload) -> String {
    match sample {
        Payload::Mcu(p) => format!("code={:#04x}", p.code),
        Payload::Camera(p) => format!("ts={} pulse={}", p.timestamp, p.pulse_count),
        Payload::Accel(p) => format!(
            "ts={} pulse={} axis=[{} {} {}]",
            p.timestamp, p.pulse_count, p.axis[0], p.axis[1], p.axis[2]
        ),
        Payload::Gyro(p) => format!(
            "ts={} pulse={} axis=[{} {} {}]",
            p.timestamp, p.pulse_count, p.axis[0], p.axis[1], p.axis[2]
        ),
        Payload::Mag(p) => format!("axis=[{} {} {}]", p.axis[0], p.axis[1], p.axis[2]),
        Payload::Baro(p) => format!("ts={} pressure={}", p.timestamp, p.pressure),
    }
}
