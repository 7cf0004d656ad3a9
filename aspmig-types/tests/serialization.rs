use aspmig_types::plan::{MigrationSettings, PlanAllocation, SiteAssignment};
use aspmig_types::site::PackageRecord;
use aspmig_types::tier::Tier;
use aspmig_types::wire::{AppServicePlanV1, SettingsV1, WireError};
use camino::Utf8PathBuf;
use pretty_assertions::assert_eq;

fn plan(ase: Option<&str>) -> PlanAllocation {
    PlanAllocation {
        plan_name: "Migration-ASP-2026-10-15-4821".to_string(),
        region: "westeurope".to_string(),
        subscription_id: "00000000-0000-0000-0000-000000000001".to_string(),
        resource_group: "migrated-sites".to_string(),
        tier: Tier::IsolatedV2,
        worker_count: 1,
        worker_size: "Small".to_string(),
        app_service_environment: ase.map(str::to_string),
        sites: vec![SiteAssignment::same_name(
            "Default Web Site",
            Utf8PathBuf::from("/data/packages/default.zip"),
        )],
    }
}

#[test]
fn plan_uses_downstream_field_names() {
    let wire = SettingsV1::from(&MigrationSettings::new(vec![plan(Some("my-ase"))]));
    let value = serde_json::to_value(&wire).expect("serialize");

    assert_eq!(
        value,
        serde_json::json!([{
            "AppServicePlan": "Migration-ASP-2026-10-15-4821",
            "SubscriptionId": "00000000-0000-0000-0000-000000000001",
            "Region": "westeurope",
            "ResourceGroup": "migrated-sites",
            "Tier": "IsolatedV2",
            "NumberOfWorkers": 1,
            "WorkerSize": "Small",
            "AppServiceEnvironment": "my-ase",
            "Sites": [{
                "IISSiteName": "Default Web Site",
                "SitePackagePath": "/data/packages/default.zip",
                "AzureSiteName": "Default Web Site"
            }]
        }])
    );
}

#[test]
fn environment_is_omitted_when_absent() {
    let wire = AppServicePlanV1::from(&plan(None));
    let value = serde_json::to_value(&wire).expect("serialize");
    assert!(value.get("AppServiceEnvironment").is_none());
}

#[test]
fn settings_read_back_into_internal_model() {
    let settings = MigrationSettings::new(vec![plan(Some("my-ase")), plan(None)]);
    let json = serde_json::to_string_pretty(&SettingsV1::from(&settings)).expect("serialize");

    let wire: SettingsV1 = serde_json::from_str(&json).expect("parse");
    let back = MigrationSettings::try_from(wire).expect("convert");
    assert_eq!(back, settings);
}

#[test]
fn unknown_tier_is_rejected_on_read() {
    let json = r#"[{
        "AppServicePlan": "asp",
        "SubscriptionId": "sub",
        "Region": "eastus",
        "ResourceGroup": "rg",
        "Tier": "Basic",
        "NumberOfWorkers": 1,
        "WorkerSize": "Small",
        "Sites": []
    }]"#;
    let wire: SettingsV1 = serde_json::from_str(json).expect("parse");
    let err = MigrationSettings::try_from(wire).unwrap_err();
    assert!(matches!(err, WireError::UnknownTier { ref tier, .. } if tier == "Basic"));
}

#[test]
fn package_record_accepts_null_and_missing_paths() {
    let records: Vec<PackageRecord> = serde_json::from_str(
        r#"[
            { "SiteName": "a", "SitePackagePath": "a.zip" },
            { "SiteName": "b", "SitePackagePath": null },
            { "SiteName": "c", "Extra": true }
        ]"#,
    )
    .expect("parse");

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].site_package_path.as_deref(), Some("a.zip"));
    assert!(records[1].site_package_path.is_none());
    assert!(records[2].site_package_path.is_none());
}
