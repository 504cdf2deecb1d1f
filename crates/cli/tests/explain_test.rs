use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

#[test]
fn test_explain_known_operator() -> Result<()> {
    Command::cargo_bin("tregex")?
        .arg("explain")
        .arg("<<")
        .assert()
        .success()
        .stdout(contains("dominates"));
    Ok(())
}

#[test]
fn test_explain_unknown_term_fails() -> Result<()> {
    Command::cargo_bin("tregex")?
        .arg("explain")
        .arg("%%%")
        .assert()
        .failure()
        .code(1);
    Ok(())
}
