mod common;

use predicates::prelude::*;

use common::TestEnv;

#[test]
fn help_lists_options() {
    let env = TestEnv::new();
    env.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn version_flag_succeeds() {
    let env = TestEnv::new();
    env.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("notion-posts"));
}

#[test]
fn unknown_argument_fails() {
    let env = TestEnv::new();
    env.cmd().arg("--nonexistent-flag").assert().failure();
    assert!(env.is_untouched());
}
