//! Move prediction service CLI
//!
//! Trains a decision tree on the game log, prints cross-validation
//! diagnostics, then answers move requests on stdin until told to shut down.
//! Logs go to stderr; stdout carries only the protocol.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use ttt_move_core::DecisionTreeClassifier;
use ttt_move_service::{report, Cli, RequestLoop};
use ttt_move_trainer::{train_from_csv, CrossValidation};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Move prediction service v{}", env!("CARGO_PKG_VERSION"));

    let mut stdout = io::stdout().lock();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(err) => {
            error!("Configuration rejected: {}", err);
            report::write_fatal(&mut stdout, &err)?;
            return Err(err).context("Invalid configuration");
        }
    };

    // resolve_config guarantees a path
    let path = config.dataset.path.clone().unwrap_or_default();
    report::write_dataset_path(&mut stdout, &path)?;

    info!("Tree config: {:?}", config.tree);
    let trained = train_from_csv(
        &path,
        &config.dataset.options,
        config.validation.clone(),
        DecisionTreeClassifier::new(config.tree.clone()),
    );

    let CrossValidation {
        model,
        report: validation,
    } = match trained {
        Ok(result) => result,
        Err(err) => {
            error!("Training failed: {}", err);
            report::write_fatal(&mut stdout, &err)?;
            return Err(err).context("Training failed");
        }
    };

    match model.classifier().model_hash_hex() {
        Some(Ok(hash)) => info!("Model hash: {}", hash),
        Some(Err(err)) => warn!("Could not hash model: {}", err),
        None => warn!("Classifier reports no fitted tree"),
    }
    if let Some(tree) = model.classifier().tree() {
        info!("Tree depth {} with {} leaves", tree.depth(), tree.leaf_count());
    }

    report::write_diagnostics(&mut stdout, &validation)?;

    let stdin = io::stdin().lock();
    let mut service = RequestLoop::new(&model, stdin, stdout);
    service.announce_ready().context("Failed to announce readiness")?;

    let stats = service.run().context("Request channel failed")?;
    info!(
        "Served {} lines: {} predictions, {} acknowledgments, {} errors",
        stats.lines, stats.predictions, stats.acknowledgments, stats.errors
    );

    service.into_output().flush()?;
    Ok(())
}
