#![cfg(unix)]

use std::path::PathBuf;
use std::process::Command;

use bytes::BytesMut;
use senshub_wire::{checksum, encode_packet, BaroPayload, MsgType, Payload};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/senshub-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

#[test]
fn send_ping_writes_exact_packet_bytes() {
    let dir = unique_temp_dir("send-ping");
    let link = dir.join("link.bin");
    std::fs::write(&link, []).expect("link file should be creatable");

    let output = Command::new(env!("CARGO_BIN_EXE_senshub"))
        .args(["--log-level", "error", "send"])
        .arg(&link)
        .args(["--command", "ping"])
        .output()
        .expect("send command should run");
    assert!(output.status.success(), "send failed: {output:?}");

    let body = [0x53u8, 0x00, 0x21, 0x00, 0x00, 0x00];
    let mut expected = body.to_vec();
    expected.extend_from_slice(&checksum(&body).to_le_bytes());

    assert_eq!(std::fs::read(&link).unwrap(), expected);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn monitor_decodes_a_captured_stream() {
    let dir = unique_temp_dir("monitor");
    let link = dir.join("capture.bin");

    let sample = Payload::Baro(BaroPayload {
        timestamp: 7,
        pressure: 101_325,
    });
    let mut wire = BytesMut::new();
    encode_packet(MsgType::Baro, &sample.to_bytes(), &mut wire).unwrap();
    std::fs::write(&link, &wire).expect("capture file should be writable");

    let output = Command::new(env!("CARGO_BIN_EXE_senshub"))
        .args(["--log-level", "error", "monitor"])
        .arg(&link)
        .args(["--channel", "baro", "--count", "1"])
        .output()
        .expect("monitor command should run");
    assert!(output.status.success(), "monitor failed: {output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("shub_baro"), "stdout: {stdout}");
    assert!(stdout.contains("pressure=101325"), "stdout: {stdout}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn types_lists_every_channel() {
    let output = Command::new(env!("CARGO_BIN_EXE_senshub"))
        .arg("types")
        .output()
        .expect("types command should run");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for ty in MsgType::ALL {
        assert!(stdout.contains(ty.channel_name()), "missing {ty:?}");
    }
}

#[test]
fn send_rejects_unknown_command_names() {
    let output = Command::new(env!("CARGO_BIN_EXE_senshub"))
        .args(["send", "/dev/null", "--command", "reboot"])
        .output()
        .expect("send command should run");
    assert!(!output.status.success());
}
