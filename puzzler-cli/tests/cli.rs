//! End-to-end tests of the puzzle tools.
//!
//! Spawns the binaries and pipes records between them through temporary files.

use std::{
    fs::File,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

use puzzler::Registry;

fn create_input(dir: &Path, name: &str, scale: u32, seed: u64) -> PathBuf {
    let path = dir.join(format!("{name}.input"));
    let status = Command::new(env!("CARGO_BIN_EXE_create_puzzle_input"))
        .arg(name)
        .arg(scale.to_string())
        .arg("0")
        .arg("--seed")
        .arg(seed.to_string())
        .stdout(File::create(&path).expect("create input file"))
        .status()
        .expect("create_puzzle_input");
    assert!(status.success(), "create_puzzle_input {name} failed");
    path
}

fn execute(dir: &Path, input: &Path, reference: bool) -> PathBuf {
    let path = input.with_extension(if reference { "ref" } else { "got" });
    let status = Command::new(env!("CARGO_BIN_EXE_execute_puzzle"))
        .current_dir(dir)
        .args([if reference { "1" } else { "0" }, "0"])
        .stdin(File::open(input).expect("open input file"))
        .stdout(File::create(&path).expect("create output file"))
        .status()
        .expect("execute_puzzle");
    assert!(status.success(), "execute_puzzle on {} failed", input.display());
    path
}

fn compare(reference: &Path, got: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_compare_puzzle_output"))
        .arg(reference)
        .arg(got)
        .arg("0")
        .output()
        .expect("compare_puzzle_output")
}

#[test]
fn pipeline_agrees_for_every_puzzle() {
    let temp = tempfile::tempdir().expect("tempdir");
    let registry = Registry::with_builtin_puzzles().expect("registry");
    for name in registry.names() {
        let input = create_input(temp.path(), name, 12, 7);
        let reference = execute(temp.path(), &input, true);
        let got = execute(temp.path(), &input, false);
        let output = compare(&reference, &got);
        assert!(
            output.status.success(),
            "{name}: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

#[test]
fn outputs_of_different_puzzles_compare_unequal() {
    let temp = tempfile::tempdir().expect("tempdir");
    let life = execute(
        temp.path(),
        &create_input(temp.path(), "life", 6, 1),
        true,
    );
    let median = execute(
        temp.path(),
        &create_input(temp.path(), "median_bits", 6, 1),
        true,
    );
    assert_eq!(compare(&life, &median).status.code(), Some(1));
}

#[test]
fn run_puzzle_checks_each_puzzle() {
    let registry = Registry::with_builtin_puzzles().expect("registry");
    for name in registry.names() {
        let output = Command::new(env!("CARGO_BIN_EXE_run_puzzle"))
            .args([name, "10", "1", "--seed", "3"])
            .output()
            .expect("run_puzzle");
        assert!(
            output.status.success(),
            "{name}: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

#[test]
fn missing_arguments_list_puzzles() {
    let output = Command::new(env!("CARGO_BIN_EXE_run_puzzle"))
        .output()
        .expect("run_puzzle");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Puzzles:"), "{stderr}");
    assert!(stderr.contains("median_bits"), "{stderr}");
}

#[test]
fn unknown_puzzle_is_an_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_create_puzzle_input"))
        .args(["chess", "4"])
        .stdout(Stdio::null())
        .output()
        .expect("create_puzzle_input");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("chess"));
}

#[test]
fn garbage_input_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("garbage");
    std::fs::write(&path, b"\x00\x00\x00\x03abc").expect("write garbage");
    let output = Command::new(env!("CARGO_BIN_EXE_execute_puzzle"))
        .arg("1")
        .stdin(File::open(&path).expect("open garbage"))
        .output()
        .expect("execute_puzzle");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_output_file_is_an_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = compare(&temp.path().join("nope"), &temp.path().join("nope"));
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope"));
}
