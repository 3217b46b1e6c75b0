use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_stories_lists_embedded_stories() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("reel")
        .env("REEL_HOME", home.path())
        .arg("stories")
        .assert()
        .success()
        .stdout(predicate::str::contains("welcome"))
        .stdout(predicate::str::contains("support"))
        .stdout(predicate::str::contains("launch"))
        .stdout(predicate::str::contains("en, pt"));
}

#[test]
fn test_stories_dir_adds_story() {
    let home = tempdir().unwrap();
    let stories = tempdir().unwrap();
    fs::write(
        stories.path().join("extra.json"),
        r#"{
            "id": "extra",
            "name": "Extra Story",
            "languages": {
                "en": [
                    {"sender": "Bot", "text": "hi", "timestamp": "08:00", "isSentByMe": false}
                ]
            }
        }"#,
    )
    .unwrap();

    cargo_bin_cmd!("reel")
        .env("REEL_HOME", home.path())
        .args(["stories", "--stories-dir"])
        .arg(stories.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Extra Story"));
}

#[test]
fn test_broken_story_file_warns_but_succeeds() {
    let home = tempdir().unwrap();
    let stories = tempdir().unwrap();
    fs::write(stories.path().join("broken.json"), "{not json").unwrap();

    cargo_bin_cmd!("reel")
        .env("REEL_HOME", home.path())
        .args(["stories", "--stories-dir"])
        .arg(stories.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("welcome"))
        .stderr(predicate::str::contains("invalid story JSON"));
}
