use assert_cmd::{cargo::cargo_bin_cmd, Command};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

pub const GROUP: &str = "openSUSE Tumbleweed";

/// Command for the binary, isolated from the user's configuration
pub fn openqa_review(config_dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("openqa-review");
    cmd.env("OPENQA_REVIEW_CONFIG_DIR", config_dir)
        .env_remove("OPENQA_REVIEW_CONFIG")
        .env_remove("OPENQA_REVIEW_LOG")
        .env_remove("RUST_LOG");
    cmd
}

pub fn module(name: &str, outcome: &str) -> Value {
    json!({
        "name": name,
        "outcome": outcome,
        "source_revision": "abc123",
        "needles": [{ "name": format!("{}-screen", name), "tags": ["ENV-DESKTOP"] }],
    })
}

pub fn record(id: &str, arch: &str, modules: Vec<Value>) -> Value {
    json!({
        "id": id,
        "job_group": GROUP,
        "arch": arch,
        "modules": modules,
    })
}

/// Write a record to `<dir>/<name>.json`
#[allow(dead_code)]
pub fn write_record(dir: &Path, name: &str, record: &Value) -> std::path::PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(format!("{}.json", name));
    fs::write(&path, serde_json::to_string_pretty(record).unwrap()).unwrap();
    path
}

/// Two builds on three architectures; yast2_lan regresses everywhere,
/// installer_vnc keeps failing on x86_64 and bootloader gets fixed on i586
#[allow(dead_code)]
pub fn write_tumbleweed_fixture(dir: &Path) {
    for arch in ["x86_64", "i586", "aarch64"] {
        let mut previous = vec![module("yast2_lan", "passed")];
        let mut current = vec![module("yast2_lan", "failed")];
        match arch {
            "x86_64" => {
                previous.push(module("installer_vnc", "failed"));
                current.push(module("installer_vnc", "failed"));
            }
            "i586" => {
                previous.push(module("bootloader", "failed"));
                current.push(module("bootloader", "passed"));
            }
            _ => {}
        }
        write_record(dir, &format!("0099-{}", arch), &record("0099", arch, previous));
        write_record(dir, &format!("0100-{}", arch), &record("0100", arch, current));
    }
}
