//! End-to-end tests for the `aspmig` binary.
//!
//! Azure calls go to a closed loopback port so they fail fast without network access.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const UNREACHABLE_CONFIG: &str = r#"
[azure]
management_endpoint = "http://127.0.0.1:9"
timeout_secs = 5
"#;

fn aspmig() -> Command {
    let mut cmd = Command::cargo_bin("aspmig").expect("aspmig binary");
    cmd.env_remove("AZURE_SUBSCRIPTION_ID")
        .env_remove("AZURE_ACCESS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn create_workdir(package_results: &str) -> TempDir {
    let td = tempfile::tempdir().expect("tempdir");
    fs::write(td.path().join("aspmig.toml"), UNREACHABLE_CONFIG).unwrap();
    fs::write(td.path().join("PackageResults.json"), package_results).unwrap();
    td
}

fn three_sites() -> &'static str {
    r#"[
  { "SiteName": "Default Web Site", "SitePackagePath": "packages/default.zip" },
  { "SiteName": "intranet", "SitePackagePath": "packages/intranet.zip" },
  { "SiteName": "legacy", "SitePackagePath": null },
  { "SiteName": "api", "SitePackagePath": "C:\\packages\\api.zip" }
]"#
}

/// Same arguments as `generate`, but without a token and with no `az` on the PATH.
fn generate_without_credentials(dir: &Path, empty_path: &Path) -> Command {
    let mut cmd = aspmig();
    cmd.current_dir(dir).env("PATH", empty_path).args([
        "generate",
        "--region",
        "East US",
        "--subscription-id",
        "00000000-0000-0000-0000-000000000001",
        "--resource-group",
        "migrated-rg",
    ]);
    cmd
}

fn generate(dir: &Path) -> Command {
    let mut cmd = aspmig();
    cmd.current_dir(dir).args([
        "generate",
        "--input",
        "PackageResults.json",
        "--region",
        "East US",
        "--subscription-id",
        "00000000-0000-0000-0000-000000000001",
        "--resource-group",
        "migrated-rg",
        "--access-token",
        "test-token",
    ]);
    cmd
}

#[test]
fn test_tiers_text_lists_every_tier() {
    aspmig()
        .arg("tiers")
        .assert()
        .success()
        .stdout(predicate::str::contains("PremiumV2"))
        .stdout(predicate::str::contains("PremiumV3"))
        .stdout(predicate::str::contains("IsolatedV2"))
        .stdout(predicate::str::contains("ASEV2"));
}

#[test]
fn test_tiers_json_is_parseable() {
    let output = aspmig()
        .args(["tiers", "--format", "json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let rows = rows.as_array().expect("array");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["tier"], "Isolated");
    assert_eq!(rows[0]["sites_per_plan"], 8);
    assert_eq!(rows[2]["tier"], "PremiumV3");
    assert_eq!(rows[2]["sites_per_plan"], 16);
}

#[test]
fn test_tiers_rejects_unknown_format() {
    aspmig()
        .args(["tiers", "--format", "yaml"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_generate_requires_region() {
    let temp = create_workdir(three_sites());

    aspmig()
        .current_dir(temp.path())
        .args([
            "generate",
            "--input",
            "PackageResults.json",
            "--subscription-id",
            "sub",
            "--resource-group",
            "rg",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--region"));
}

#[test]
fn test_subscription_id_from_environment() {
    let temp = create_workdir(three_sites());

    aspmig()
        .current_dir(temp.path())
        .env("AZURE_SUBSCRIPTION_ID", "00000000-0000-0000-0000-000000000002")
        .args([
            "generate",
            "--input",
            "PackageResults.json",
            "--region",
            "eastus",
            "--resource-group",
            "rg",
            "--access-token",
            "t",
        ])
        .assert()
        .success();

    let written = fs::read_to_string(temp.path().join("MigrationSettings.json")).unwrap();
    assert!(written.contains("00000000-0000-0000-0000-000000000002"));
}

#[test]
fn test_generate_falls_back_to_premium_v2_when_probe_fails() {
    let temp = create_workdir(three_sites());

    generate(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("MigrationSettings.json"))
        .stderr(predicate::str::contains("could not check PremiumV3 availability"));

    let written = fs::read_to_string(temp.path().join("MigrationSettings.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&written).expect("json");
    let plans = doc.as_array().expect("array");
    assert_eq!(plans.len(), 1);

    let plan = &plans[0];
    assert_eq!(plan["Tier"], "PremiumV2");
    assert_eq!(plan["Region"], "East US");
    assert_eq!(plan["NumberOfWorkers"], 1);
    assert_eq!(plan["WorkerSize"], "Small");
    assert!(plan.get("AppServiceEnvironment").is_none());
    assert!(
        plan["AppServicePlan"]
            .as_str()
            .unwrap()
            .starts_with("Migration-ASP-")
    );

    let sites = plan["Sites"].as_array().expect("sites");
    let names: Vec<&str> = sites
        .iter()
        .map(|s| s["IISSiteName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Default Web Site", "intranet", "api"]);
    assert_eq!(sites[0]["AzureSiteName"], "Default Web Site");
    assert_eq!(sites[2]["SitePackagePath"], "C:\\packages\\api.zip");
    assert!(
        sites[1]["SitePackagePath"]
            .as_str()
            .unwrap()
            .ends_with("intranet.zip")
    );
}

#[test]
fn test_worker_flags_override_config() {
    let temp = create_workdir(three_sites());
    fs::write(
        temp.path().join("aspmig.toml"),
        format!("{UNREACHABLE_CONFIG}\n[defaults]\nnumber_of_workers = 2\nworker_size = \"Medium\"\n"),
    )
    .unwrap();

    generate(temp.path())
        .args(["--worker-size", "Large", "--output", "out/settings.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("settings.json"));

    let written = fs::read_to_string(temp.path().join("out").join("settings.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&written).expect("json");
    assert_eq!(doc[0]["NumberOfWorkers"], 2);
    assert_eq!(doc[0]["WorkerSize"], "Large");
}

#[test]
fn test_existing_output_without_force_is_untouched() {
    let temp = create_workdir(three_sites());
    let output = temp.path().join("MigrationSettings.json");
    fs::write(&output, "hand edited\n").unwrap();

    generate(temp.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "hand edited\n");
}

#[test]
fn test_existing_output_is_reported_before_credentials_are_needed() {
    let temp = create_workdir(three_sites());
    let no_tools = tempfile::tempdir().expect("tempdir");
    let output = temp.path().join("MigrationSettings.json");
    fs::write(&output, "hand edited\n").unwrap();

    generate_without_credentials(temp.path(), no_tools.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "hand edited\n");
}

#[test]
fn test_malformed_input_is_reported_before_credentials_are_needed() {
    let temp = create_workdir("{ not json");
    let no_tools = tempfile::tempdir().expect("tempdir");

    generate_without_credentials(temp.path(), no_tools.path())
        .assert()
        .failure()
        .code(3);
}

#[test]
fn test_missing_azure_cli_is_internal_error() {
    let temp = create_workdir(three_sites());
    let no_tools = tempfile::tempdir().expect("tempdir");

    generate_without_credentials(temp.path(), no_tools.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("access token"));

    assert!(!temp.path().join("MigrationSettings.json").exists());
}

#[test]
fn test_input_defaults_to_package_results_in_working_dir() {
    let temp = create_workdir(three_sites());

    aspmig()
        .current_dir(temp.path())
        .args([
            "generate",
            "--region",
            "eastus",
            "--subscription-id",
            "sub",
            "--resource-group",
            "rg",
            "--access-token",
            "t",
        ])
        .assert()
        .success();

    let written = fs::read_to_string(temp.path().join("MigrationSettings.json")).unwrap();
    assert!(written.contains("intranet.zip"));
}

#[test]
fn test_force_replaces_existing_output() {
    let temp = create_workdir(three_sites());
    let output = temp.path().join("MigrationSettings.json");
    fs::write(&output, "hand edited\n").unwrap();

    generate(temp.path()).arg("--force").assert().success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"Tier\": \"PremiumV2\""));
}

#[test]
fn test_input_without_packages_exits_4() {
    let temp = create_workdir(r#"[{ "SiteName": "legacy", "SitePackagePath": null }]"#);

    generate(temp.path()).assert().failure().code(4);
    assert!(!temp.path().join("MigrationSettings.json").exists());
}

#[test]
fn test_malformed_input_exits_3() {
    let temp = create_workdir("{ not json");

    generate(temp.path())
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("PackageResults.json"));
}

#[test]
fn test_missing_input_exits_3() {
    let temp = create_workdir("[]");
    fs::remove_file(temp.path().join("PackageResults.json")).unwrap();

    generate(temp.path()).assert().failure().code(3);
}

#[test]
fn test_unreachable_environment_lookup_exits_5() {
    let temp = create_workdir(three_sites());

    generate(temp.path())
        .args(["--app-service-environment", "contoso-ase"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("contoso-ase"));

    assert!(!temp.path().join("MigrationSettings.json").exists());
}

#[test]
fn test_blank_access_token_is_internal_error() {
    let temp = create_workdir(three_sites());

    aspmig()
        .current_dir(temp.path())
        .args([
            "generate",
            "--input",
            "PackageResults.json",
            "--region",
            "eastus",
            "--subscription-id",
            "sub",
            "--resource-group",
            "rg",
            "--access-token",
            " ",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("access token"));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = create_workdir(three_sites());
    fs::write(temp.path().join("aspmig.toml"), "[defaults\n").unwrap();

    generate(temp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("aspmig.toml"));
}

#[test]
fn test_zero_workers_is_rejected() {
    let temp = create_workdir(three_sites());

    generate(temp.path())
        .args(["--number-of-workers", "0"])
        .assert()
        .failure()
        .code(2);
}
