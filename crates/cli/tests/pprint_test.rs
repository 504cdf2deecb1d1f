use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

#[test]
fn test_pprint_renders_tree() -> Result<()> {
    Command::cargo_bin("tregex")?
        .arg("pprint")
        .arg("(S (NP (NN dog)) (VP (V barks)))")
        .assert()
        .success()
        .stdout(contains("S"))
        .stdout(contains("NP"))
        .stdout(contains("NN"))
        .stdout(contains("└──").or(contains("├──")));
    Ok(())
}

#[test]
fn test_pprint_rejects_unbalanced_parens() -> Result<()> {
    Command::cargo_bin("tregex")?
        .arg("pprint")
        .arg("(S (NP dog)")
        .assert()
        .failure()
        .code(1);
    Ok(())
}
