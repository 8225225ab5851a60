//! `retitlectl`: reconcile media filenames against canonical metadata.

mod cli;
mod prompt;
mod report;

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Parser;
use retitle_config::{ConfigSource, EngineConfig};
use retitle_core::{
    AlwaysAccept, AlwaysDecline, AuditLog, ConfirmationProvider,
    ManifestSource, Reconciler, RenameExecutor, RunOptions,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, ConfigAction, RunArgs};
use crate::prompt::TerminalPrompt;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Command::Run(args) => run(args),
        Command::Inspect { filenames, config } => {
            let (config, _) = load_config(config.as_deref())?;
            let settings = config.to_settings();
            for (idx, raw) in filenames.iter().enumerate() {
                if idx > 0 {
                    println!();
                }
                report::print_inspection(raw, &settings.noise_words);
            }
            Ok(())
        }
        Command::Config {
            action: ConfigAction::Check { config },
        } => {
            let (config, source) = load_config(config.as_deref())?;
            println!("Configuration: {source}");
            println!("  noise words:    {}", config.noise_words.len());
            println!("  auto threshold: {}", config.auto_threshold);
            println!("  ask threshold:  {}", config.ask_threshold);
            println!("  year tolerance: {}", config.year_tolerance);
            println!("  audit log:      {}", config.audit_log.display());
            println!("Configuration OK");
            Ok(())
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Resolve, validate and report warnings; validation errors are fatal.
fn load_config(
    explicit: Option<&std::path::Path>,
) -> Result<(EngineConfig, ConfigSource)> {
    let (mut config, source) = EngineConfig::load(explicit)?;
    let warnings = config
        .validate()
        .with_context(|| format!("invalid configuration from {source}"))?;

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => warn!("{} (hint: {hint})", warning.message),
            None => warn!("{}", warning.message),
        }
    }
    info!("configuration loaded from {source}");
    Ok((config, source))
}

fn run(args: RunArgs) -> Result<()> {
    let (config, _) = load_config(args.config.as_deref())?;
    let manifest = ManifestSource::load(&args.manifest)
        .with_context(|| format!("failed to load manifest {}", args.manifest.display()))?;

    let audit_path = args.audit_log.unwrap_or_else(|| config.audit_log.clone());
    let executor = RenameExecutor::new(Some(AuditLog::new(audit_path)));
    let reconciler = Reconciler::new(
        config.to_settings(),
        executor,
        RunOptions {
            dry_run: args.dry_run,
        },
    );

    let mut confirm: Box<dyn ConfirmationProvider> = if args.yes {
        Box::new(AlwaysAccept)
    } else if args.no_prompt || !std::io::stdin().is_terminal() {
        Box::new(AlwaysDecline)
    } else {
        Box::new(TerminalPrompt)
    };

    let batch = reconciler.run(
        &manifest,
        &manifest,
        confirm.as_mut(),
        report::print_item,
    )?;
    report::print_summary(&batch.summary, args.dry_run);
    Ok(())
}
