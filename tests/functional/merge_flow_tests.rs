//! End-to-end merge behavior across generate and upgrade runs

use crate::common::TestFixture;
use genpkg::snapshot::Snapshot;
use genpkg::text_merge::{MARKER_CURRENT, MARKER_UPGRADED};
use serde_json::{json, Value};

#[test]
fn test_config_merge_combines_independent_edits() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_template_file(
        "lib",
        "package.json",
        "{\n  \"name\": \"foo\",\n  \"version\": \"1.0.0\"\n}\n",
    );
    let package = fixture
        .generate("lib", r#"{"name": "foo"}"#, "pkgs/foo")
        .unwrap();

    // User adds a key; the template bumps the version
    fixture.write_live(
        &package,
        "package.json",
        "{\n  \"name\": \"foo\",\n  \"version\": \"1.0.0\",\n  \"private\": true\n}\n",
    );
    fixture.write_template_file(
        "lib",
        "package.json",
        "{\n  \"name\": \"foo\",\n  \"version\": \"2.0.0\"\n}\n",
    );
    fixture.upgrade(&package, true).unwrap();

    let merged_text = fixture.read_live(&package, "package.json");
    assert!(!merged_text.contains(MARKER_CURRENT));
    let merged: Value = serde_json::from_str(&merged_text).unwrap();
    assert_eq!(merged["version"], json!("2.0.0"));
    assert_eq!(merged["private"], json!(true));
}

#[test]
fn test_config_merge_conflict_shows_both_values() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_template_file(
        "lib",
        "package.json",
        "{\n  \"version\": \"1.0.0\"\n}\n",
    );
    let package = fixture
        .generate("lib", r#"{"name": "foo"}"#, "pkgs/foo")
        .unwrap();

    fixture.write_live(&package, "package.json", "{\n  \"version\": \"1.5.0\"\n}\n");
    fixture.write_template_file(
        "lib",
        "package.json",
        "{\n  \"version\": \"2.0.0\"\n}\n",
    );
    fixture.upgrade(&package, true).unwrap();

    let merged = fixture.read_live(&package, "package.json");
    assert!(merged.contains(MARKER_CURRENT));
    assert!(merged.contains(MARKER_UPGRADED));
    assert!(merged.contains("1.5.0"));
    assert!(merged.contains("2.0.0"));
}

#[test]
fn test_config_reformatting_alone_is_not_an_edit() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_template_file(
        "lib",
        "package.json",
        "{\n  \"version\": \"1.0.0\"\n}\n",
    );
    let package = fixture
        .generate("lib", r#"{"name": "foo"}"#, "pkgs/foo")
        .unwrap();

    // Same value, different formatting; the template's new content wins
    fixture.write_live(&package, "package.json", "{\"version\":\"1.0.0\"}");
    fixture.write_template_file(
        "lib",
        "package.json",
        "{\n  \"version\": \"2.0.0\"\n}\n",
    );
    fixture.upgrade(&package, true).unwrap();

    assert_eq!(
        fixture.read_live(&package, "package.json"),
        "{\n  \"version\": \"2.0.0\"\n}\n"
    );
}

#[test]
fn test_text_conflict_keeps_crlf_line_breaks() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_template_file("lib", "a.txt", "one\r\ntwo\r\n");
    let package = fixture
        .generate("lib", r#"{"name": "foo"}"#, "pkgs/foo")
        .unwrap();

    fixture.write_live(&package, "a.txt", "one\r\ntwo mine\r\n");
    fixture.write_template_file("lib", "a.txt", "one\r\ntwo theirs\r\n");
    fixture.upgrade(&package, true).unwrap();

    let merged = fixture.read_live(&package, "a.txt");
    assert!(merged.contains(MARKER_CURRENT));
    assert!(merged.contains("\r\n"));
    assert!(!merged.replace("\r\n", "").contains('\n'));
}

#[test]
fn test_upgrade_replaces_snapshot_wholesale() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_template_file("lib", "a.txt", "alpha\n");
    fixture.write_template_file("lib", "b.txt", "beta\n");
    let package = fixture
        .generate("lib", r#"{"name": "foo"}"#, "pkgs/foo")
        .unwrap();

    fixture.remove_template_file("lib", "b.txt");
    fixture.write_template_file("lib", "c.txt", "gamma\n");
    fixture.upgrade(&package, true).unwrap();

    let snapshot = Snapshot::load(&package.snapshot_dir).unwrap();
    let mut keys: Vec<&String> = snapshot.manifest.files.keys().collect();
    keys.sort();
    assert_eq!(keys, ["a.txt", "c.txt"]);
    assert_eq!(snapshot.config.generator_name, "lib");
    assert_eq!(snapshot.config.answers.name(), Some("foo"));
}
