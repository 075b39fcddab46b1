//! xccdf-tailor CLI - CIS tailoring generator
//!
//! Decides which CIS-cited rules of a ComplianceAsCode baseline profile to
//! unselect and hands the list to OpenSCAP's `autotailor`.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod autotailor;
mod config;
mod error;
mod output;

use autotailor::AutotailorInvocation;
use config::{TailorConfig, DEFAULT_CONFIG_FILE};
use error::{CliError, Result};
use xccdf_tailor::benchmark::{BenchmarkDocument, ExclusionList};
use xccdf_tailor::observability::{self, ObservabilityConfig};
use xccdf_tailor::TailoringPlan;

/// xccdf-tailor - derive CIS tailorings from SCAP content
#[derive(Parser)]
#[command(name = "xccdf-tailor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to tailor.toml (defaults to ./tailor.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rule ids that would be unselected
    Plan {
        #[command(flatten)]
        inputs: InputArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// List excluded and unselected rules with their citations
        #[arg(long)]
        explain: bool,
    },

    /// Compute the plan and run autotailor with it
    Tailor {
        #[command(flatten)]
        inputs: InputArgs,

        /// Tailoring file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Id of the new tailored profile
        #[arg(long)]
        new_profile: Option<String>,

        /// Baseline profile name passed to autotailor
        #[arg(long)]
        base_profile: Option<String>,

        /// Print the autotailor command instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// List profiles defined in the data stream
    Profiles {
        /// SCAP source data stream or XCCDF benchmark
        #[arg(short, long)]
        datastream: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a tailor.toml template
    Init {
        /// Overwrite existing configuration
        #[arg(long)]
        force: bool,
    },
}

/// Overrides for the benchmark and exclusion inputs
#[derive(Args, Debug, Default)]
struct InputArgs {
    /// SCAP source data stream or XCCDF benchmark
    #[arg(short, long)]
    datastream: Option<PathBuf>,

    /// Full id of the baseline profile
    #[arg(short, long)]
    profile: Option<String>,

    /// Exclusion pattern file
    #[arg(short, long)]
    exclusions: Option<PathBuf>,
}

impl InputArgs {
    fn apply(self, config: &mut TailorConfig) {
        if let Some(datastream) = self.datastream {
            config.benchmark.datastream = datastream;
        }
        if let Some(profile) = self.profile {
            config.benchmark.profile = profile;
        }
        if let Some(exclusions) = self.exclusions {
            config.exclusions.file = exclusions;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut obs_config = ObservabilityConfig::from_env();
    if cli.verbose {
        obs_config = obs_config.verbose();
    }
    if let Err(e) = observability::init_tracing(&obs_config) {
        output::warning(&e.to_string());
    }

    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Plan {
            inputs,
            json,
            explain,
        } => cmd_plan(config_path, inputs, json, explain),

        Commands::Tailor {
            inputs,
            output: output_path,
            new_profile,
            base_profile,
            dry_run,
        } => cmd_tailor(config_path, inputs, output_path, new_profile, base_profile, dry_run),

        Commands::Profiles { datastream, json } => cmd_profiles(config_path, datastream, json),

        Commands::Init { force } => cmd_init(config_path, force),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

fn cmd_plan(config_path: Option<&Path>, inputs: InputArgs, json: bool, explain: bool) -> Result<()> {
    let mut config = TailorConfig::discover(config_path)?;
    inputs.apply(&mut config);

    let plan = build_plan(&config)?;

    if json {
        output::print_json(&plan)?;
    } else {
        output::print_plan_summary(&plan, explain);
        output::print_unselect(&plan);
    }

    Ok(())
}

fn cmd_tailor(
    config_path: Option<&Path>,
    inputs: InputArgs,
    output_path: Option<PathBuf>,
    new_profile: Option<String>,
    base_profile: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let mut config = TailorConfig::discover(config_path)?;
    inputs.apply(&mut config);
    if let Some(output_path) = output_path {
        config.tailoring.output = output_path;
    }
    if let Some(new_profile) = new_profile {
        config.tailoring.profile = new_profile;
    }
    if base_profile.is_some() {
        config.tailoring.base_profile = base_profile;
    }

    // Any load failure aborts here, before the tool is started
    let plan = build_plan(&config)?;
    output::print_plan_summary(&plan, false);

    if plan.is_empty() {
        output::warning("No rules to unselect; the tailoring will match the baseline");
    }

    let invocation = AutotailorInvocation {
        program: config.tailoring.command.clone(),
        datastream: config.benchmark.datastream.clone(),
        base_profile: config.base_profile(),
        output: config.tailoring.output.clone(),
        new_profile: config.tailoring.profile.clone(),
        unselect: plan.unselect.iter().cloned().collect(),
    };

    if dry_run {
        println!("{}", invocation.command_line());
        return Ok(());
    }

    invocation.run()?;

    output::success(&format!(
        "Wrote {} ({} rule(s) unselected from {})",
        invocation.output.display(),
        invocation.unselect.len(),
        invocation.base_profile
    ));

    Ok(())
}

fn cmd_profiles(config_path: Option<&Path>, datastream: Option<PathBuf>, json: bool) -> Result<()> {
    let mut config = TailorConfig::discover(config_path)?;
    if let Some(datastream) = datastream {
        config.benchmark.datastream = datastream;
    }

    let document = load_document(&config.benchmark.datastream)?;

    if json {
        let report: Vec<_> = document
            .profiles()
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "title": p.title,
                    "selections": p.selections.len(),
                })
            })
            .collect();
        output::print_json(&report)?;
    } else {
        output::print_profiles(document.profiles());
    }

    Ok(())
}

fn cmd_init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));

    if path.exists() && !force {
        return Err(CliError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    std::fs::write(path, config::init_template())?;

    output::success(&format!("Created {}", path.display()));
    output::info("Edit the exclusions file, then run 'xccdf-tailor tailor'");

    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn load_document(path: &Path) -> Result<BenchmarkDocument> {
    let spinner = output::Spinner::new(&format!("Loading {}...", path.display()));
    match BenchmarkDocument::load(path) {
        Ok(document) => {
            let stats = document.stats();
            spinner.finish_success(&format!(
                "Loaded {} profile(s), {} rule(s)",
                stats.profiles, stats.rules
            ));
            Ok(document)
        }
        Err(e) => {
            spinner.finish_error("Failed to load benchmark");
            Err(xccdf_tailor::Error::from(e).into())
        }
    }
}

fn build_plan(config: &TailorConfig) -> Result<TailoringPlan> {
    let document = load_document(&config.benchmark.datastream)?;
    let exclusions =
        ExclusionList::from_file(&config.exclusions.file).map_err(xccdf_tailor::Error::from)?;

    Ok(TailoringPlan::build(
        &document,
        &config.plan_options(),
        &exclusions,
    ))
}
