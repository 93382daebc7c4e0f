//! Integration tests for the `encode` subcommand.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn cmd() -> Command {
    Command::cargo_bin("charmap").unwrap()
}

fn write_reference_map(dir: &Path) -> std::path::PathBuf {
    let map = dir.join("map.txt");
    fs::write(&map, "1\tSpace\n2\tTab\n3\tA\n").unwrap();
    map
}

#[test]
fn encode_writes_token_text() {
    let dir = tempfile::tempdir().unwrap();
    let map = write_reference_map(dir.path());
    let input = dir.path().join("src.c");
    let output = dir.path().join("out.txt");
    fs::write(&input, " \tAZ").unwrap();

    cmd()
        .arg("encode")
        .arg("--map")
        .arg(&map)
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 bytes, 4 tokens, 1 unmapped"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "1 2 3 0 ");
}

#[test]
fn encode_empty_file_gives_empty_output() {
    let dir = tempfile::tempdir().unwrap();
    let map = write_reference_map(dir.path());
    let input = dir.path().join("empty.c");
    let output = dir.path().join("out.txt");
    fs::write(&input, "").unwrap();

    cmd()
        .arg("encode")
        .arg("-m")
        .arg(&map)
        .arg(&input)
        .arg(&output)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn encode_numbered_paths() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("1.txt"), "1\th\n2\ti\n").unwrap();
    fs::write(dir.path().join("hello.c"), "hi!").unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["encode", "--map", "1", "hello.c", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello.c -> 2.txt"));

    assert_eq!(
        fs::read_to_string(dir.path().join("2.txt")).unwrap(),
        "1 2 0 "
    );
}

#[test]
fn encode_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let map = write_reference_map(dir.path());
    let input = dir.path().join("src.c");
    let output = dir.path().join("out.txt");
    fs::write(&input, "AAZ").unwrap();

    let result = cmd()
        .args(["encode", "--format", "json", "--map"])
        .arg(&map)
        .arg(&input)
        .arg(&output)
        .output()
        .unwrap();
    assert!(result.status.success());

    let json: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(json["operation"], "encode");
    assert_eq!(json["stats"]["tokens"], 3);
    assert_eq!(json["stats"]["sentinels"], 1);
    assert_eq!(json["map"]["size"], 3);
}

#[test]
fn encode_diagnostics_go_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let map = dir.path().join("map.txt");
    let input = dir.path().join("src.c");
    let output = dir.path().join("out.txt");
    fs::write(&map, "1\ta\n2\t\\q\n").unwrap();
    fs::write(&input, "a").unwrap();

    cmd()
        .arg("encode")
        .arg("--map")
        .arg(&map)
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("UNKNOWN_ESCAPE"))
        .stdout(predicate::str::contains("UNKNOWN_ESCAPE").not());
}

#[test]
fn encode_missing_input_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let map = write_reference_map(dir.path());
    let output = dir.path().join("out.txt");

    cmd()
        .arg("encode")
        .arg("--map")
        .arg(&map)
        .arg(dir.path().join("missing.c"))
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: failed to encode file"))
        .stderr(predicate::str::contains("missing.c"));

    assert!(!output.exists());
}

#[test]
fn encode_missing_map_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("src.c");
    fs::write(&input, "a").unwrap();

    cmd()
        .arg("encode")
        .arg("--map")
        .arg(dir.path().join("nope.txt"))
        .arg(&input)
        .arg(dir.path().join("out.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load character map"));
}
