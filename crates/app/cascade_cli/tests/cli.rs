use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const RULES: &str = r#"
systems:
  - developerName: BILLING
    label: Billing
    isActive: true
    maxRetries: 3
objectRules:
  - developerName: Opp_Billing
    sObjectName: Opportunity
    systemApiName: BILLING
    isActive: true
fieldMappings:
  - sObjectName: Opportunity
    systemApiName: BILLING
    sourceFieldAPI: Amount
    targetFieldName: amount
    dataType: Text
objects:
  - label: Opportunity
    apiName: Opportunity
    fields:
      - label: Amount
        apiName: Amount
        dataType: Currency
"#;

const DUPLICATE_RULE: &str = r#"
  - developerName: Opp_Billing_2
    sObjectName: Opportunity
    systemApiName: BILLING
    isActive: true
"#;

fn fixture(text: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

/// The base fixture with a second Opportunity → BILLING rule.
fn duplicate_fixture() -> NamedTempFile {
    let extra = format!("{}fieldMappings:", DUPLICATE_RULE.trim_start_matches('\n'));
    fixture(&RULES.replacen("fieldMappings:", &extra, 1))
}

fn cascade() -> Command {
    let mut cmd = Command::cargo_bin("cascade").unwrap();
    cmd.env_remove("CASCADE_FIXTURE").env("RUST_LOG", "info");
    cmd
}

#[test]
fn version_prints_name_and_version() {
    cascade()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cascade "));
}

#[test]
fn version_does_not_read_the_fixture() {
    cascade()
        .args(["--fixture", "does-not-exist.yaml", "version"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cascade "))
        .stderr(predicate::str::contains("loading fixture").not());
}

#[test]
fn check_passes_on_clean_fixture() {
    let file = fixture(RULES);
    cascade()
        .arg("--fixture")
        .arg(file.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 1 systems, 1 object rules, 1 mapping contexts"));
}

#[test]
fn check_fails_on_duplicate_rule() {
    let file = duplicate_fixture();
    cascade()
        .arg("--fixture")
        .arg(file.path())
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Duplicate mapping"));
}

#[test]
fn mappings_prints_derived_data_type() {
    let file = fixture(RULES);
    cascade()
        .env("CASCADE_FIXTURE", file.path())
        .args(["mappings", "--object", "Opportunity", "--system", "BILLING"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""dataType": "Currency""#))
        .stdout(predicate::str::contains(r#""sourceFieldAPI": "Amount""#));
}

#[test]
fn show_lists_only_the_requested_tier() {
    let file = fixture(RULES);
    cascade()
        .arg("--fixture")
        .arg(file.path())
        .args(["show", "--tier", "rules"])
        .assert()
        .success()
        .stdout(predicate::str::contains("objectRules"))
        .stdout(predicate::str::contains("Opp_Billing"))
        .stdout(predicate::str::contains("\"systems\"").not());
}

#[test]
fn missing_fixture_is_an_error() {
    cascade()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No fixture given"));
}
