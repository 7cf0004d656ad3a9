mod config;
mod explain;

use anyhow::{Context, anyhow};
use aspmig_azure::{ArmClient, AzCliTokenProvider, StaticTokenProvider, TokenProvider};
use aspmig_core::DatedPlanNamer;
use aspmig_core::adapters::{FsPackageSource, FsSettingsWriter, NullTelemetrySink, TracingTelemetrySink};
use aspmig_core::error::ToolError;
use aspmig_core::pipeline::{Ports, run_generate};
use aspmig_core::ports::TelemetrySink;
use aspmig_core::settings::GenerateSettings;
use aspmig_types::files::DEFAULT_PACKAGE_RESULTS_FILE;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::ConfigMerger;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "aspmig",
    version,
    about = "Generate Azure App Service migration settings from packaged IIS sites."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Pick a tier, group sites into plans and write the settings file.
    Generate(GenerateArgs),
    /// Print the tier decision table.
    Tiers(TiersArgs),
}

#[derive(Debug, Parser)]
struct GenerateArgs {
    /// Package results file written by the packaging step.
    #[arg(long, default_value = DEFAULT_PACKAGE_RESULTS_FILE)]
    input: Utf8PathBuf,

    /// Target Azure region (e.g. "eastus" or "East US").
    #[arg(long)]
    region: String,

    /// Target subscription.
    #[arg(long, env = "AZURE_SUBSCRIPTION_ID")]
    subscription_id: String,

    /// Resource group the plans will be created in.
    #[arg(long)]
    resource_group: String,

    /// Existing App Service Environment to host the plans.
    #[arg(long)]
    app_service_environment: Option<String>,

    /// Settings file to write (default: MigrationSettings.json in the current directory).
    #[arg(long)]
    output: Option<Utf8PathBuf>,

    /// Replace the settings file if it already exists.
    #[arg(long, default_value_t = false)]
    force: bool,

    /// Workers per plan.
    #[arg(long)]
    number_of_workers: Option<u32>,

    /// Worker size per plan (e.g. Small, Medium, Large).
    #[arg(long)]
    worker_size: Option<String>,

    /// Config file (default: ./aspmig.toml if present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Bearer token for Azure Resource Manager. Falls back to the Azure CLI.
    #[arg(long, env = "AZURE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
}

#[derive(Debug, Parser)]
struct TiersArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match real_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(kind = e.kind(), "{e}");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn real_main() -> Result<(), ToolError> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Tiers(args) => cmd_tiers(args).map_err(ToolError::from),
    }
}

fn cmd_generate(args: GenerateArgs) -> Result<(), ToolError> {
    let cwd = std::env::current_dir().context("read current directory")?;
    let working_dir = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|p| anyhow!("current directory is not valid UTF-8: {}", p.display()))?;

    let file_config = config::load_or_default(&working_dir, args.config.as_deref())
        .context("load aspmig.toml config")?;
    let merged = ConfigMerger::new(file_config)
        .merge_generate_args(args.number_of_workers, args.worker_size.as_deref());
    debug!(
        "merged config: defaults={:?}, endpoint={}, telemetry={}",
        merged.defaults, merged.arm.endpoint, merged.telemetry_enabled
    );

    let mut settings = GenerateSettings::new(
        args.input,
        working_dir,
        args.region,
        args.subscription_id,
        args.resource_group,
    );
    settings.app_service_environment = args.app_service_environment;
    settings.output_path = args.output;
    settings.force = args.force;
    settings.defaults = merged.defaults;

    // The token is only requested once the input has been loaded.
    let tokens: Box<dyn TokenProvider> = match args.access_token {
        Some(token) => Box::new(StaticTokenProvider::new(token)),
        None => Box::new(AzCliTokenProvider::new(merged.arm.endpoint.clone())),
    };
    let azure = ArmClient::new(&merged.arm, tokens)?;

    let telemetry: Box<dyn TelemetrySink> = if merged.telemetry_enabled {
        Box::new(TracingTelemetrySink)
    } else {
        Box::new(NullTelemetrySink)
    };
    let namer = DatedPlanNamer::default();

    let outcome = run_generate(
        &settings,
        Ports {
            packages: &FsPackageSource,
            azure: &azure,
            writer: &FsSettingsWriter,
            telemetry: telemetry.as_ref(),
            namer: &namer,
        },
    )?;

    info!(
        tier = %outcome.resolution.decision.tier,
        region = %outcome.resolution.effective_region,
        plans = outcome.settings.plans.len(),
        "done"
    );
    println!("{}", outcome.output_path);
    Ok(())
}

fn cmd_tiers(args: TiersArgs) -> anyhow::Result<()> {
    use explain::TIER_RULES;

    match args.format {
        OutputFormat::Text => {
            println!("Tier decision table (first matching row wins):\n");
            println!("  {:<56} {:<12} SITES/PLAN", "CONDITION", "TIER");
            println!("  {:<56} {:<12} ----------", "---------", "----");
            for rule in TIER_RULES {
                let decision = rule.decision();
                println!(
                    "  {:<56} {:<12} {}",
                    rule.condition,
                    decision.tier.as_str(),
                    decision.sites_per_plan
                );
            }
            println!();
            for rule in TIER_RULES {
                println!("  * {}", rule.note);
            }
        }
        OutputFormat::Json => {
            let rows: Vec<_> = TIER_RULES
                .iter()
                .map(|r| {
                    let decision = r.decision();
                    serde_json::json!({
                        "condition": r.condition,
                        "tier": decision.tier,
                        "sites_per_plan": decision.sites_per_plan,
                        "note": r.note,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}
