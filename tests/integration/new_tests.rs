//! Integration tests for package generation

use crate::common::{ScriptedPrompt, TestFixture};
use genpkg::commands::new_command;
use genpkg::error::GenpkgError;
use genpkg::snapshot::Snapshot;
use genpkg::SNAPSHOT_DIR;

#[test]
fn test_new_generates_base_files() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_template_file("lib", "a.txt", "alpha\n");
    fixture.write_template_file("lib", "src/main.txt", "main\n");

    let package = fixture
        .generate("lib", r#"{"name": "foo"}"#, "pkgs/foo")
        .unwrap();

    assert_eq!(fixture.read_live(&package, "a.txt"), "alpha\n");
    assert_eq!(fixture.read_live(&package, "src/main.txt"), "main\n");
    assert!(package.root.join(SNAPSHOT_DIR).is_dir());
}

#[test]
fn test_new_manifest_covers_generated_files() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_template_file("lib", "a.txt", "alpha\n");
    fixture.write_template_file("lib", "src/main.txt", "main\n");

    let package = fixture
        .generate("lib", r#"{"name": "foo"}"#, "pkgs/foo")
        .unwrap();
    let snapshot = Snapshot::load(&package.snapshot_dir).unwrap();

    let mut keys: Vec<&String> = snapshot.manifest.files.keys().collect();
    keys.sort();
    assert_eq!(keys, ["a.txt", "src/main.txt"]);
}

#[test]
fn test_new_records_generator_and_answers() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_template_file("lib", "a.txt", "alpha\n");

    let package = fixture
        .generate("lib", r#"{"name": "foo"}"#, "pkgs/foo")
        .unwrap();
    let snapshot = Snapshot::load(&package.snapshot_dir).unwrap();

    assert_eq!(snapshot.config.generator_name, "lib");
    assert_eq!(snapshot.config.answers.name(), Some("foo"));
}

#[test]
fn test_new_applies_feature_overlays() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_template_file("lib", "a.txt", "alpha\n");
    fixture.write_feature_file("lib", "ci", "ci.yml", "jobs: []\n");

    let package = fixture
        .generate("lib", r#"{"name": "foo", "features": ["ci"]}"#, "pkgs/foo")
        .unwrap();
    let snapshot = Snapshot::load(&package.snapshot_dir).unwrap();

    assert_eq!(fixture.read_live(&package, "ci.yml"), "jobs: []\n");
    assert!(snapshot.manifest.files.contains_key("ci.yml"));
}

#[test]
fn test_new_skips_unselected_features() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_template_file("lib", "a.txt", "alpha\n");
    fixture.write_feature_file("lib", "ci", "ci.yml", "jobs: []\n");

    let package = fixture
        .generate("lib", r#"{"name": "foo"}"#, "pkgs/foo")
        .unwrap();
    let snapshot = Snapshot::load(&package.snapshot_dir).unwrap();

    assert!(!package.live_path("ci.yml").exists());
    assert!(!snapshot.manifest.files.contains_key("ci.yml"));
}

#[test]
fn test_new_prompts_for_missing_name() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_template_file("lib", "a.txt", "alpha\n");

    let mut prompt = ScriptedPrompt {
        confirm_with: true,
        answers: vec!["My Package".to_string()],
    };
    let dest = fixture.root().join("pkgs/foo");
    let package = new_command(&fixture.registry(), "lib", Some(&dest), None, true, &mut prompt)
        .unwrap();

    let snapshot = Snapshot::load(&package.snapshot_dir).unwrap();
    assert_eq!(snapshot.config.answers.name(), Some("My Package"));
}

#[test]
fn test_new_requires_a_name() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_template_file("lib", "a.txt", "alpha\n");

    // Empty answer to the name prompt
    let mut prompt = ScriptedPrompt::confirming(true);
    let dest = fixture.root().join("pkgs/foo");
    let err = new_command(&fixture.registry(), "lib", Some(&dest), None, true, &mut prompt)
        .unwrap_err();

    assert!(matches!(err, GenpkgError::InvalidInput { .. }));
    assert!(!dest.exists());
}

#[test]
fn test_new_rejects_unknown_generator() {
    let fixture = TestFixture::new().unwrap();
    fixture.write_template_file("lib", "a.txt", "alpha\n");

    let err = fixture
        .generate("nope", r#"{"name": "foo"}"#, "pkgs/foo")
        .unwrap_err();
    assert!(matches!(err, GenpkgError::Generator { .. }));
}
