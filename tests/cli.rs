// Binary smoke tests. These never reach the network: both failure paths are
// checked before any model download or HTTP call happens.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn missing_api_key_fails_fast() {
    let home = tempfile::tempdir().unwrap();

    Command::cargo_bin("agrigpt")
        .unwrap()
        .env("HOME", home.path())
        .env_remove("GEMINI_API_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn empty_api_key_fails_fast() {
    let home = tempfile::tempdir().unwrap();

    Command::cargo_bin("agrigpt")
        .unwrap()
        .env("HOME", home.path())
        .env("GEMINI_API_KEY", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn missing_corpus_file_fails_before_model_download() {
    let home = tempfile::tempdir().unwrap();

    Command::cargo_bin("agrigpt")
        .unwrap()
        .env("HOME", home.path())
        .env("GEMINI_API_KEY", "test-key")
        .args(["--corpus", "/nonexistent/facts.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("corpus file"));
}
