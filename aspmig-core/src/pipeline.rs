//! The generate pipeline: load → resolve tier → allocate → emit.
//!
//! This entry point is I/O-agnostic: file access, Azure lookups, telemetry and plan naming
//! all go through the port traits.

use crate::emit::emit_settings;
use crate::error::ToolError;
use crate::ports::{AzureResources, PackageSource, PlanNamer, SettingsWriter, TelemetrySink};
use crate::settings::GenerateSettings;
use crate::telemetry::{Telemetry, TelemetryEventKind};
use aspmig_domain::{PackagePaths, PlanTemplate, TierRequest, TierResolution, TierResolver, allocate};
use aspmig_types::plan::MigrationSettings;
use camino::Utf8PathBuf;
use tracing::{debug, info};

/// The collaborators a run talks to.
#[derive(Clone, Copy)]
pub struct Ports<'a> {
    pub packages: &'a dyn PackageSource,
    pub azure: &'a dyn AzureResources,
    pub writer: &'a dyn SettingsWriter,
    pub telemetry: &'a dyn TelemetrySink,
    pub namer: &'a dyn PlanNamer,
}

/// Outcome of `run_generate`.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub output_path: Utf8PathBuf,
    pub settings: MigrationSettings,
    pub resolution: TierResolution,
}

/// Run the generate pipeline and write the settings document.
///
/// Every fatal error is reported to telemetry before it is returned.
pub fn run_generate(settings: &GenerateSettings, ports: Ports<'_>) -> Result<GenerateOutcome, ToolError> {
    let telemetry = Telemetry::new(ports.telemetry);
    debug!(run_id = %telemetry.run_id(), "starting run");
    telemetry.emit(TelemetryEventKind::Started {
        has_environment: settings.environment().is_some(),
    });

    match generate(settings, ports, &telemetry) {
        Ok(outcome) => {
            telemetry.emit(TelemetryEventKind::Succeeded {
                tier: outcome.resolution.decision.tier,
                plans: outcome.settings.plans.len(),
                sites: outcome.settings.site_count(),
            });
            Ok(outcome)
        }
        Err(err) => {
            telemetry.emit(TelemetryEventKind::Failed {
                error_kind: err.kind(),
                exit_code: err.exit_code(),
            });
            Err(err)
        }
    }
}

fn generate(
    settings: &GenerateSettings,
    ports: Ports<'_>,
    telemetry: &Telemetry<'_>,
) -> Result<GenerateOutcome, ToolError> {
    validate(settings)?;

    // Refuse early so no Azure calls are made for a run that cannot write its result.
    let output_path = settings.resolved_output_path();
    if !settings.force && ports.writer.exists(&output_path) {
        return Err(ToolError::OutputExists { path: output_path });
    }

    let input_path = settings.resolved_input_path();
    let sites = ports.packages.load_sites(&input_path)?;
    info!(input = %input_path, sites = sites.len(), "loaded packaged sites");

    ports.azure.ensure_authenticated().map_err(ToolError::Internal)?;

    let request = TierRequest {
        subscription_id: settings.subscription_id.trim().to_string(),
        region: settings.region.trim().to_string(),
        app_service_environment: settings.environment().map(str::to_string),
    };
    let resolution = TierResolver::new().resolve(&request, ports.azure)?;
    for warning in resolution.warnings.iter().filter(|w| w.is_tier_fallback()) {
        telemetry.emit(TelemetryEventKind::TierFallback {
            tier: resolution.decision.tier,
            reason: warning.to_string(),
        });
    }

    let template = PlanTemplate {
        subscription_id: request.subscription_id.clone(),
        region: resolution.effective_region.clone(),
        resource_group: settings.resource_group.trim().to_string(),
        tier: resolution.decision.tier,
        worker_count: settings.defaults.number_of_workers,
        worker_size: settings.defaults.worker_size.clone(),
        app_service_environment: request.app_service_environment.clone(),
    };
    let paths = PackagePaths::for_input(&input_path, &settings.working_dir);
    let plans = allocate(
        &sites,
        resolution.decision.sites_per_plan,
        &template,
        &paths,
        ports.namer,
    )?;
    info!(
        plans = plans.len(),
        capacity = resolution.decision.sites_per_plan,
        tier = %resolution.decision.tier,
        "allocated sites to plans"
    );

    let document = MigrationSettings::new(plans);
    let output_path = emit_settings(&document, &output_path, settings.force, ports.writer)?;

    Ok(GenerateOutcome {
        output_path,
        settings: document,
        resolution,
    })
}

fn validate(settings: &GenerateSettings) -> Result<(), ToolError> {
    let required = [
        ("input path", settings.input_path.as_str()),
        ("region", settings.region.as_str()),
        ("subscription id", settings.subscription_id.as_str()),
        ("resource group", settings.resource_group.as_str()),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(ToolError::Validation(format!(
            "missing required value(s): {}",
            missing.join(", ")
        )));
    }

    if settings.defaults.number_of_workers == 0 {
        return Err(ToolError::Validation(
            "number of workers must be at least 1".to_string(),
        ));
    }
    if settings.defaults.worker_size.trim().is_empty() {
        return Err(ToolError::Validation("worker size must not be empty".to_string()));
    }
    Ok(())
}
