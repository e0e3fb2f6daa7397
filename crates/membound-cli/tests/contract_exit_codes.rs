use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn membound() -> Command {
    Command::new(env!("CARGO_BIN_EXE_membound"))
}

#[test]
fn short_name_echoes_and_succeeds() {
    membound()
        .args(["run", "--capacity", "10"])
        .write_stdin("Alice\n")
        .assert()
        .code(0)
        .stdout("Alice\n");
}

#[test]
fn fifteen_characters_are_truncated_to_nine() {
    membound()
        .args(["run", "--capacity", "10"])
        .write_stdin("ABCDEFGHIJKLMNO\n")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("truncated"))
        .stderr(predicate::str::contains("\"ABCDEFGHI\""));
}

#[test]
fn long_source_is_rejected() {
    let source = "This is too long for buffer!";
    assert_eq!(source.len(), 28);
    membound()
        .args(["run", "--source", source, "--dest-capacity", "10"])
        .write_stdin("Alice\n")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("copy rejected: source is 28 bytes"))
        .stderr(predicate::str::contains("destination left unchanged"));
}

#[test]
fn empty_stdin_is_end_of_stream() {
    membound()
        .arg("run")
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("end of stream"));
}

#[test]
fn zero_capacity_flag_is_a_config_error() {
    membound()
        .args(["run", "--capacity", "0"])
        .write_stdin("Alice\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("input_capacity"));
}

#[test]
fn json_output_carries_code_and_exit() {
    let out = membound()
        .args(["run", "--format", "json"])
        .write_stdin("ABCDEFGHIJKLMNO\n")
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out).expect("valid JSON");
    assert_eq!(v["status"], "error");
    assert_eq!(v["code"], "E_TRUNCATED");
    assert_eq!(v["kept"], "ABCDEFGHI");
    assert_eq!(v["exit_code"], 1);
}

#[test]
fn config_file_sets_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("membound.yaml");
    std::fs::write(&cfg, "input_capacity: 4\n").unwrap();

    membound()
        .args(["run", "--config"])
        .arg(&cfg)
        .write_stdin("Alice\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("\"Ali\""));
}

#[test]
fn prompt_goes_to_stderr() {
    membound()
        .args(["run", "--prompt"])
        .write_stdin("Bob\n")
        .assert()
        .success()
        .stdout("Bob\n")
        .stderr(predicate::str::contains("Enter your name: "));
}

#[test]
fn version_prints_package_version() {
    membound()
        .arg("version")
        .assert()
        .success()
        .stdout(format!("{}\n", env!("CARGO_PKG_VERSION")));
}
