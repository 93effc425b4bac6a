use std::{fs, path::PathBuf, process::Command};

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn sift() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("sift"))
}

#[test]
fn dump_tree_from_source_text() {
    sift()
        .arg("dump-tree")
        .arg("union TestCase {\n  int a;\n};")
        .assert()
        .success()
        .stdout(predicate::eq(
            "Source : <source>\n  Class : TestCase\n    ClassVariable : a\n",
        ));
}

#[test]
fn dump_tree_requires_a_source() {
    sift().arg("dump-tree").assert().failure();
}

#[test]
fn dump_tree_reports_unbalanced_units() {
    sift()
        .arg("dump-tree")
        .arg("void broken() {")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unbalanced structure"));
}

#[test]
fn check_writes_report() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = temp.child("sample.cpp");
    source
        .write_str("int main() {\n  int *p;\n  p = NULL;\n  cout << p;\n  goto end;\n}\n")
        .unwrap();
    let rules = temp.child("rules.json");
    rules
        .write_str(r#"{ "rules": [ { "rule": "NoGoto" }, { "rule": "NoSuchRule" } ] }"#)
        .unwrap();
    let output = temp.child("report.txt");

    sift()
        .arg("check")
        .arg(source.path())
        .arg("--rules")
        .arg(rules.path())
        .arg("--output")
        .arg(output.path())
        .arg("-j")
        .arg("2")
        .assert()
        .success()
        .stderr(predicate::str::contains("INFO | "));

    let report = fs::read_to_string(output.path()).unwrap();
    assert!(report.contains("  NoGoto -- `goto` must not be used in Function"));
    assert!(report.contains("    L5, Character: 3: `goto` is used"));
    assert!(report.contains("  NoSuchRule -- Rule is not recognized and was ignored"));
    assert!(report.contains("    L4: `p` will throw a NULL pointer exception"));
}

#[test]
fn check_counts_failed_units_without_failing() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("fine.cpp").write_str("int fine;\n").unwrap();
    temp.child("broken.cpp").write_str("void broken() {\n").unwrap();

    sift()
        .current_dir(temp.path())
        .arg("check")
        .arg("--path")
        .arg(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains(">1/2< unparsed files (50.00%)"));
    temp.child("output.txt").assert(predicate::path::exists());
}

#[test]
fn check_fails_on_malformed_rules() {
    let temp = assert_fs::TempDir::new().unwrap();
    let rules = temp.child("rules.json");
    rules.write_str("{ not json").unwrap();

    sift()
        .current_dir(temp.path())
        .arg("check")
        .arg(fixture("shapes.cpp"))
        .arg("-r")
        .arg(rules.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed rule configuration"));
}

#[test]
fn quiet_check_only_logs_warnings() {
    let temp = assert_fs::TempDir::new().unwrap();

    sift()
        .current_dir(temp.path())
        .arg("check")
        .arg(fixture("shapes.cpp"))
        .arg("--quiet")
        .assert()
        .success()
        .stderr(predicate::str::contains("INFO").not());
}
