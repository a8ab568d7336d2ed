use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const CORRIDOR: &str = "#######\n#S...E#\n#######\n";

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).expect("temporary file is writable");
    path.display().to_string()
}

fn helirin(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_helirin"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to invoke helirin")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is utf-8")
}

#[test]
fn fields_summarises_the_map() {
    let dir = TempDir::new().expect("temporary directory");
    let map = write(dir.path(), "corridor.txt", CORRIDOR);

    let output = helirin(&["fields", "--map", &map]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let text = stdout(&output);
    assert!(text.contains("window: (0, 0) to (6, 2) (7x3)"), "{text}");
    assert!(text.contains("legal pixels: 5"), "{text}");
    assert!(text.contains("policy: allow"), "{text}");
}

#[test]
fn solve_prints_a_winning_plan() {
    let dir = TempDir::new().expect("temporary directory");
    let map = write(dir.path(), "corridor.txt", CORRIDOR);

    let output = helirin(&["solve", "--map", &map, "--policy", "no-wall-clip"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let plan: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("plan is json");
    assert_eq!(plan["solved"], serde_json::Value::Bool(true));
    assert_eq!(plan["start"]["x"], 1);
    let ticks = plan["ticks"].as_u64().expect("ticks is a number");
    assert!(ticks > 0);
    assert_eq!(
        plan["actions"].as_array().map(Vec::len),
        usize::try_from(ticks).ok()
    );
}

#[test]
fn config_file_overrides_tuning() {
    let dir = TempDir::new().expect("temporary directory");
    let map = write(dir.path(), "corridor.txt", CORRIDOR);
    let config = write(
        dir.path(),
        "tuning.toml",
        "[flood]\nground_speed = 1.0\nwall_speed = 1.0\n",
    );

    let output = helirin(&["fields", "--map", &map, "--config", &config, "--policy", "allow"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("max finite cost: 4.000"));
}

#[test]
fn unknown_config_keys_fail() {
    let dir = TempDir::new().expect("temporary directory");
    let map = write(dir.path(), "corridor.txt", CORRIDOR);
    let config = write(dir.path(), "tuning.toml", "[flood]\nground_sped = 1.0\n");

    let output = helirin(&["fields", "--map", &map, "--config", &config]);

    assert!(!output.status.success());
}

#[test]
fn malformed_maps_are_reported() {
    let dir = TempDir::new().expect("temporary directory");
    let map = write(dir.path(), "broken.txt", "###\n#?#\n###\n");

    let output = helirin(&["fields", "--map", &map]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse map"));
}

#[test]
fn invalid_multipliers_fail_before_flooding() {
    let dir = TempDir::new().expect("temporary directory");
    let map = write(dir.path(), "corridor.txt", CORRIDOR);

    for multiplier in ["--wgm-mult=-1", "--gwb-mult=NaN", "--gwb-mult=inf"] {
        let output = helirin(&["fields", "--map", &map, multiplier]);
        assert!(!output.status.success(), "{multiplier} was accepted");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("failed to compute the cost map"), "{stderr}");

        let output = helirin(&["solve", "--map", &map, multiplier]);
        assert!(!output.status.success(), "{multiplier} was accepted");
    }
}
