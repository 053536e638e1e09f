use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn template(source: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".dv").tempfile().unwrap();
    write!(file, "{}", source).unwrap();
    file
}

#[test]
fn compiles_to_return_statement_by_default() {
    let file = template("p Hello");
    let mut cmd = cargo_bin_cmd!("directiv");
    cmd.arg(file.path());

    cmd.assert().success().stdout(
        predicate::str::starts_with("return [")
            .and(predicate::str::contains(r#""name":"p""#))
            .and(predicate::str::contains(r#"\"Hello\""#)),
    );
}

#[test]
fn emits_ir_json() {
    let file = template("if ok\n  p yes");
    let mut cmd = cargo_bin_cmd!("directiv");
    cmd.arg(file.path()).arg("--emit").arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with(r#"[{"type":"if""#));
}

#[test]
fn emits_parse_tree() {
    let file = template("p Hello");
    let mut cmd = cargo_bin_cmd!("directiv");
    cmd.arg(file.path()).args(["--emit", "ast", "--pretty"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""type": "Block""#).and(predicate::str::contains('\n')));
}

#[test]
fn config_file_changes_options() {
    let file = template(":capture\n  p x");
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "[compiler]\ncapture_variable = \"snippet\"").unwrap();

    let mut cmd = cargo_bin_cmd!("directiv");
    cmd.arg(file.path()).arg("--config").arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("snippet = "));
}

#[test]
fn compile_errors_exit_non_zero() {
    let file = template("doctype html");
    let mut cmd = cargo_bin_cmd!("directiv");
    cmd.arg(file.path());

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Doctypes are not supported at this time"));
}

#[test]
fn missing_file_is_reported() {
    let mut cmd = cargo_bin_cmd!("directiv");
    cmd.arg("/no/such/template.dv");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read /no/such/template.dv"));
}

#[test]
fn rejects_unknown_emit_format() {
    let file = template("p");
    let mut cmd = cargo_bin_cmd!("directiv");
    cmd.arg(file.path()).args(["--emit", "yaml"]);

    cmd.assert().failure();
}

#[test]
fn local_config_is_picked_up_and_overridden_by_flag() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.dv"), ":capture\n  p x").unwrap();
    std::fs::write(
        dir.path().join("directiv.toml"),
        "[compiler]\ncapture_variable = \"local\"\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("directiv");
    cmd.arg(dir.path().join("index.dv"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("local = "));

    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(config, "[compiler]\ncapture_variable = \"flagged\"").unwrap();
    let mut cmd = cargo_bin_cmd!("directiv");
    cmd.arg(dir.path().join("index.dv")).arg("--config").arg(config.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("flagged = ").and(predicate::str::contains("local = ").not()));
}
