//! Integration tests for the tfstyle binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_module(main_tf: &str, config: Option<&str>) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("main.tf"), main_tf).unwrap();
    if let Some(config) = config {
        fs::write(temp.path().join(".tfstyle.yml"), config).unwrap();
    }
    temp
}

fn tfstyle() -> Command {
    let mut cmd = Command::new(cargo_bin("tfstyle"));
    cmd.env_remove("TFSTYLE_CONFIG").env("NO_COLOR", "1");
    cmd
}

const CLEAN: &str = r#"
locals {
  tags = {
    env = "prod"
  }
}

variable "region" {
  type = string
}
"#;

const MISPLACED_SOURCE: &str = r#"
locals {
  tags = {}
}

module "vpc" {
  name   = "main"
  source = "./modules/vpc"
}
"#;

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    tfstyle()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Terraform"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    tfstyle()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn lint_clean_module() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_module(CLEAN, None);
    tfstyle()
        .arg("lint")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
    Ok(())
}

#[test]
fn no_subcommand_lints_current_directory() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_module(MISPLACED_SOURCE, None);
    tfstyle()
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Invalid 'source' argument arrangement in module 'vpc'",
        ));
    Ok(())
}

#[test]
fn warnings_fail_only_with_strict() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_module(MISPLACED_SOURCE, None);

    tfstyle()
        .arg("lint")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("warning[terraform_meta_arguments]"));

    tfstyle()
        .args(["lint", "--strict"])
        .arg(temp.path())
        .assert()
        .code(1);
    Ok(())
}

#[test]
fn configured_error_severity_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_module(
        MISPLACED_SOURCE,
        Some("rules:\n  terraform_meta_arguments:\n    severity: error\n"),
    );
    tfstyle()
        .arg("lint")
        .arg(temp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("error[terraform_meta_arguments]"));
    Ok(())
}

#[test]
fn disabled_rule_is_silent() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_module(
        MISPLACED_SOURCE,
        Some("rules:\n  terraform_meta_arguments:\n    enabled: false\n"),
    );
    tfstyle()
        .arg("lint")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found"));
    Ok(())
}

#[test]
fn invalid_rule_config_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_module(
        CLEAN,
        Some("rules:\n  terraform_module_dependencies:\n    style: loose\n"),
    );
    tfstyle()
        .arg("lint")
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Invalid configuration for rule"))
        .stderr(predicate::str::contains(
            "invalid style 'loose', expected 'semver' or 'flexible'",
        ));
    Ok(())
}

#[test]
fn unknown_rule_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_module(CLEAN, Some("rules:\n  terraform_typo:\n    enabled: true\n"));
    tfstyle()
        .arg("lint")
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("terraform_typo"));
    Ok(())
}

#[test]
fn explicit_config_must_exist() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_module(CLEAN, None);
    tfstyle()
        .arg("lint")
        .arg(temp.path())
        .arg("--config")
        .arg(temp.path().join("missing.yml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Configuration not found"));
    Ok(())
}

#[test]
fn explicit_config_replaces_module_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_module(
        MISPLACED_SOURCE,
        Some("rules:\n  terraform_meta_arguments:\n    severity: error\n"),
    );
    let other = temp.path().join("ci.yml");
    fs::write(&other, "rules:\n  terraform_meta_arguments:\n    enabled: false\n")?;

    tfstyle()
        .arg("lint")
        .arg(temp.path())
        .arg("--config")
        .arg(&other)
        .assert()
        .success();
    Ok(())
}

#[test]
fn syntax_errors_are_reported() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_module("variable \"a\" {\n", None);
    tfstyle()
        .arg("lint")
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Failed to parse"));
    Ok(())
}

#[test]
fn json_format() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_module(MISPLACED_SOURCE, None);
    let output = tfstyle()
        .args(["lint", "--format", "json"])
        .arg(temp.path())
        .output()?;

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed["summary"]["warnings"], 1);
    assert_eq!(
        parsed["diagnostics"][0]["rule_id"],
        "terraform_meta_arguments"
    );
    Ok(())
}

#[test]
fn sarif_format() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_module(MISPLACED_SOURCE, None);
    let output = tfstyle()
        .args(["lint", "--format", "sarif"])
        .arg(temp.path())
        .output()?;

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(parsed["version"], "2.1.0");
    assert_eq!(
        parsed["runs"][0]["results"][0]["ruleId"],
        "terraform_meta_arguments"
    );
    Ok(())
}

#[test]
fn unpinned_module_source() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_module(
        r#"
locals {
  tags = {}
}

module "consul" {
  source = "git::https://example.com/consul.git"
}
"#,
        Some("rules:\n  terraform_module_dependencies:\n    style: semver\n"),
    );
    tfstyle()
        .arg("lint")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "module 'consul' source 'git::https://example.com/consul.git' is not pinned",
        ));
    Ok(())
}

#[test]
fn rules_lists_builtins() -> Result<(), Box<dyn std::error::Error>> {
    tfstyle()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("terraform_meta_arguments"))
        .stdout(predicate::str::contains("terraform_naming_standards"))
        .stdout(predicate::str::contains("terraform_module_dependencies"))
        .stdout(predicate::str::contains("terraform_required_tags"))
        .stdout(predicate::str::contains("terraform_any_type_variables"));
    Ok(())
}

#[test]
fn completions_for_bash() -> Result<(), Box<dyn std::error::Error>> {
    tfstyle()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tfstyle"));
    Ok(())
}
