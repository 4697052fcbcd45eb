use assert_cmd::cargo::cargo_bin_cmd;

#[test]
fn help_mentions_pipeline_flags() {
    let mut cmd = cargo_bin_cmd!("shelfmarkctl");
    let output = cmd
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    assert!(text.contains("--config"), "help missing --config");
    assert!(text.contains("--source-dir"), "help missing --source-dir");
    assert!(text.contains("--output-dir"), "help missing --output-dir");
    assert!(
        text.contains("--categories-only"),
        "help missing --categories-only"
    );
}

#[test]
fn invalid_config_path_fails() {
    let mut cmd = cargo_bin_cmd!("shelfmarkctl");
    cmd.arg("--config")
        .arg("/nonexistent/shelfmark.toml")
        .assert()
        .failure();
}
