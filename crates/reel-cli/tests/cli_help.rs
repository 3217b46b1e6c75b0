use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("reel")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("stories"))
        .stdout(predicate::str::contains("print"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("--immediate"));
}

#[test]
fn test_print_help_shows_options() {
    cargo_bin_cmd!("reel")
        .args(["print", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--story"))
        .stdout(predicate::str::contains("--lang"));
}

#[test]
fn test_config_help_shows_subcommands() {
    cargo_bin_cmd!("reel")
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("show"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("reel")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
