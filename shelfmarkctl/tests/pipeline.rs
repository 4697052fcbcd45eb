use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

#[test]
fn end_to_end_scan_parse_render() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source");
    let output = dir.path().join("vault").join("films");
    fs::create_dir_all(&source).unwrap();

    fs::write(source.join("EDRG-009.mp4"), b"video bytes").unwrap();
    fs::write(
        source.join("EDRG-009.nfo"),
        "<movie>\
           <title>Sample &amp; Title</title>\
           <rating>6.5</rating>\
           <genre>Drama</genre>\
           <premiered>2024-05-01</premiered>\
           <actor><name>Jane Doe</name></actor>\
         </movie>",
    )
    .unwrap();
    // Bare ampersand: recovered by the sanitize pass, not a failure.
    fs::write(source.join("XYZ-001.mp4"), b"video bytes").unwrap();
    fs::write(
        source.join("XYZ-001.nfo"),
        "<movie><title>Tom & Jerry</title></movie>",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("shelfmarkctl");
    cmd.arg("--source-dir")
        .arg(&source)
        .arg("--output-dir")
        .arg(&output)
        .assert()
        .success();

    let note = fs::read_to_string(output.join("EDRG-009.md")).unwrap();
    assert!(note.contains("CN: Sample & Title"));
    assert!(note.contains("VideoRank: 6.5"));
    assert!(note.contains("  - - - Jane Doe"));
    assert!(note.contains("Year: 2024"));

    let recovered = fs::read_to_string(output.join("XYZ-001.md")).unwrap();
    assert!(recovered.contains("CN: Tom & Jerry"));

    // Category pages land next to the notes directory.
    let vault = output.parent().unwrap();
    assert!(vault.join("actor").join("Jane Doe.md").exists());
    assert!(vault.join("keywords").join("Drama.md").exists());
    assert!(vault.join("ranks").join("6.5.md").exists());
    assert!(vault.join("years").join("2024.md").exists());
}

#[test]
fn categories_only_rebuilds_from_notes() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("vault").join("films");
    fs::create_dir_all(&output).unwrap();
    fs::write(
        output.join("EDRG-009.md"),
        "---\nCode: EDRG-009\nActor:\n  - - - Jane Doe\nYear: 2024\nVideoRank: 7\n---\nbody\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("shelfmarkctl");
    cmd.arg("--output-dir")
        .arg(&output)
        .arg("--categories-only")
        .assert()
        .success();

    let vault = output.parent().unwrap();
    assert!(vault.join("actor").join("Jane Doe.md").exists());
    assert!(vault.join("ranks").join("7.0.md").exists());
    assert!(vault.join("years").join("2024.md").exists());
}

#[test]
fn empty_source_set_still_succeeds() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("films");

    let mut cmd = cargo_bin_cmd!("shelfmarkctl");
    cmd.arg("--output-dir").arg(&output).assert().success();
}
