use assert_cmd::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn libdocs() -> Command {
    Command::cargo_bin("libdocs").unwrap()
}

fn write(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn checkout(root: &Path) {
    write(
        &root.join("src/main/java/com/acme/App.java"),
        "package com.acme;\n\nimport com.acme.util.Widget;\nimport java.util.List;\n\npublic class App {}\n",
    );
    write(
        &root.join("src/main/java/com/acme/util/Widget.java"),
        "package com.acme.util;\n\n/** Widget docs. */\npublic class Widget {}\n",
    );
}

#[test]
fn build_writes_bundle_into_checkout() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("Acme_1");
    checkout(&root);
    let bug = temp.path().join("bug.json");
    fs::write(&bug, r#"{"title":"List is empty","description":"see logs"}"#).unwrap();

    let output = libdocs()
        .arg("build")
        .arg(&bug)
        .arg("--workdir")
        .arg(&root)
        .args(["--layout", "probe", "--json"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(report["ok"], true);
    assert_eq!(report["summary"]["root_package"], "com.acme");

    let bundle = fs::read_to_string(root.join("javadoc_bundle.txt")).unwrap();
    assert_eq!(
        bundle,
        "# Library Docs Bundle for Acme_1\n\n\
         ## com.acme.util.Widget\n> Widget docs.\n\n\
         ## java.util.List\n_No Javadoc found._\n\n"
    );
}

#[test]
fn build_without_recognized_layout_writes_error_document() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("bundle.txt");

    libdocs()
        .arg("build")
        .arg("--workdir")
        .arg(temp.path())
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicates::str::contains("not a valid checkout"));

    let document = fs::read_to_string(&out).unwrap();
    assert!(document.starts_with("# Error\n\n"));
}

#[test]
fn build_rejects_zero_ceiling() {
    let temp = tempdir().unwrap();
    checkout(temp.path());

    libdocs()
        .arg("build")
        .arg("--workdir")
        .arg(temp.path())
        .args(["--layout", "probe", "--max-doc-chars", "0"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("max_doc_chars"));
}

#[test]
fn batch_collects_representative_checkouts() {
    let temp = tempdir().unwrap();
    let repos = temp.path().join("repos");
    checkout(&repos.join("Acme_1"));
    checkout(&repos.join("Acme_2"));
    fs::create_dir_all(repos.join("Broken_1")).unwrap();

    libdocs()
        .arg("batch")
        .arg("--repos")
        .arg(&repos)
        .args(["--layout", "probe", "--skip-jdk"])
        .assert()
        .success();

    let raw = fs::read_to_string(repos.join("all_javadoc_bundles.json")).unwrap();
    let bundles: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        bundles.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["Acme_1", "Broken_1"]
    );
    assert!(bundles["Acme_1"].contains("> Widget docs."));
    assert!(!bundles["Acme_1"].contains("java.util.List"));
    assert!(bundles["Broken_1"].starts_with("# Error"));
}

#[test]
fn extract_tests_keeps_first_method() {
    let temp = tempdir().unwrap();
    let src = temp.path().join("raw");
    let dest = temp.path().join("clean");
    write(
        &src.join("Lang_1_n0.txt"),
        "Sure! Here is a test:\n@Test\npublic void testIt() {\n  if (a) { b(); }\n}\npublic void other() {}\n",
    );
    write(&src.join("Lang_1_n1.txt"), "I cannot write this test.");
    write(&src.join("ignored.md"), "public void x() {}");

    let output = libdocs()
        .arg("extract-tests")
        .arg("--source-dir")
        .arg(&src)
        .arg("--dest-dir")
        .arg(&dest)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(report["extracted"], 1);
    assert_eq!(report["skipped"], 1);
    assert_eq!(
        fs::read_to_string(dest.join("Lang_1_n0.txt")).unwrap(),
        "@Test\npublic void testIt() {\n  if (a) { b(); }\n}"
    );
    assert!(!dest.join("Lang_1_n1.txt").exists());
}
