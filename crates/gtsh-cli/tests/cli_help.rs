use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("gtsh")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("convoy"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_convoy_help_shows_subcommands() {
    cargo_bin_cmd!("gtsh")
        .args(["convoy", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_unknown_command_fails() {
    cargo_bin_cmd!("gtsh")
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_chat_requires_terminal() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("gtsh")
        .env("GTSH_HOME", dir.path())
        .arg("chat")
        .write_stdin("hello\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a terminal"));
}
