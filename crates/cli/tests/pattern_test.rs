mod common;

use anyhow::Result;
use assert_cmd::Command;
use common::create_test_files;
use predicates::prelude::*;
use predicates::str::contains;

#[test]
fn test_pattern_matches_single_file() -> Result<()> {
    let dir = create_test_files([("tree.txt", "(S (NP (NN dog)) (VP (V barks)))")])?;
    Command::cargo_bin("tregex")?
        .arg("pattern")
        .arg("NP < NN")
        .arg(dir.path().join("tree.txt"))
        .assert()
        .success()
        .stdout(contains("(NP (NN dog))"));
    Ok(())
}

#[test]
fn test_pattern_count_flag() -> Result<()> {
    let dir = create_test_files([("tree.txt", "(ROOT (MWE (N 1)(N 2)(N 3)) (MWV (A B)))")])?;
    Command::cargo_bin("tregex")?
        .arg("pattern")
        .arg("-C")
        .arg("/^MW/")
        .arg(dir.path().join("tree.txt"))
        .assert()
        .success()
        .stdout(contains("2"));
    Ok(())
}

#[test]
fn test_pattern_reads_directory() -> Result<()> {
    let dir = create_test_files([
        ("a.txt", "(A (B 1))"),
        ("b.txt", "(A (B 2))"),
    ])?;
    Command::cargo_bin("tregex")?
        .arg("pattern")
        .arg("-C")
        .arg("A < B")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("2"));
    Ok(())
}

#[test]
fn test_pattern_reads_stdin_when_no_files_given() -> Result<()> {
    Command::cargo_bin("tregex")?
        .arg("pattern")
        .arg("A < B")
        .write_stdin("(A (B 1))")
        .assert()
        .success()
        .stdout(contains("(A (B 1))"));
    Ok(())
}

#[test]
fn test_pattern_handle_prints_backref() -> Result<()> {
    let dir = create_test_files([("tree.txt", "(A (B 1)(C 2)(B 3))")])?;
    Command::cargo_bin("tregex")?
        .arg("pattern")
        .arg("-h")
        .arg("foo")
        .arg("A ?[< B=foo || < C=foo]")
        .arg(dir.path().join("tree.txt"))
        .assert()
        .success()
        .stdout(contains("foo: (B 1)"))
        .stdout(contains("foo: (C 2)"))
        .stdout(contains("foo: (B 3)"));
    Ok(())
}

#[test]
fn test_pattern_filter_mode_prints_matching_lines_verbatim() -> Result<()> {
    Command::cargo_bin("tregex")?
        .arg("pattern")
        .arg("--filter")
        .arg("A < B")
        .write_stdin("(A (B 1))\n(X (Y 1))\n")
        .assert()
        .success()
        .stdout("(A (B 1))\n");
    Ok(())
}

#[test]
fn test_bad_pattern_exits_nonzero_with_caret() -> Result<()> {
    Command::cargo_bin("tregex")?
        .arg("pattern")
        .arg("A <<<")
        .write_stdin("(A (B 1))")
        .assert()
        .failure()
        .code(1);
    Ok(())
}

#[test]
fn test_malformed_tree_input_is_reported() -> Result<()> {
    Command::cargo_bin("tregex")?
        .arg("pattern")
        .arg("A")
        .write_stdin("(A (B 1)")
        .assert()
        .failure()
        .code(1);
    Ok(())
}

#[test]
fn test_missing_file_is_reported() -> Result<()> {
    Command::cargo_bin("tregex")?
        .arg("pattern")
        .arg("A")
        .arg("/no/such/file/here.txt")
        .assert()
        .failure()
        .code(1);
    Ok(())
}
