//! # Stockbook Back-Office CLI
//!
//! Thin orchestration over the import pipeline and the REST collaborators.
//!
//! ```text
//! stockbook template purchase template.xlsx     write a sample import file
//! stockbook import purchase orders.xlsx         validate + submit a batch
//! stockbook import sales orders.csv --dry-run   validate only
//! ```

mod config;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockbook_api::BackofficeClient;
use stockbook_core::OrderKind;
use stockbook_import::{
    execute_batch, prepare_import, write_template_csv_file, write_template_xlsx, ImportPreview,
    VALIDATION_PREVIEW_LIMIT,
};

use crate::config::CliConfig;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Parser)]
#[command(name = "stockbook", about = "Stockbook back-office tools", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a sample import template with the expected column contract
    Template {
        /// Order kind the template is for
        kind: KindArg,
        /// Output path; .xlsx or .csv picks the format
        out: PathBuf,
    },
    /// Validate an import file and submit its orders
    Import {
        /// Order kind the file contains
        kind: KindArg,
        /// The .xlsx/.xls/.csv file to import
        file: PathBuf,
        /// Stop after validation, submit nothing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Purchase,
    Sales,
}

impl From<KindArg> for OrderKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Purchase => OrderKind::Purchase,
            KindArg::Sales => OrderKind::Sales,
        }
    }
}

// =============================================================================
// Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_target(true)
        .init();

    match cli.command {
        Command::Template { kind, out } => write_template(kind.into(), &out),
        Command::Import {
            kind,
            file,
            dry_run,
        } => run_import(&config, kind.into(), &file, dry_run).await,
    }
}

// =============================================================================
// Commands
// =============================================================================

fn write_template(kind: OrderKind, out: &Path) -> anyhow::Result<()> {
    let ext = out
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" => write_template_xlsx(out, kind)?,
        "csv" => write_template_csv_file(out, kind)?,
        other => bail!("unsupported template format: .{other} (use .xlsx or .csv)"),
    }

    println!("Wrote {kind:?} template to {}", out.display());
    Ok(())
}

async fn run_import(
    config: &CliConfig,
    kind: OrderKind,
    file: &Path,
    dry_run: bool,
) -> anyhow::Result<()> {
    let preview = prepare_import(file, kind)
        .with_context(|| format!("could not read {}", file.display()))?;

    print_preview(&preview);

    if !preview.report.is_valid() {
        bail!("validation failed, nothing was submitted");
    }
    if preview.records.is_empty() {
        bail!(
            "no valid records found - the file needs invoiceNo, a counterparty \
             name and at least one item group (item1Name, item2Name, ...)"
        );
    }

    if dry_run {
        println!("Dry run: {} records ready to import", preview.records.len());
        return Ok(());
    }

    info!(api_url = %config.api_url, "Submitting batch");
    let client = BackofficeClient::new(&config.api_url);
    let result = execute_batch(&client, &preview.records).await;

    println!(
        "Import completed. Success: {}, Failures: {}",
        result.succeeded, result.failed
    );
    if !result.is_complete() {
        bail!("{} of {} records failed to submit", result.failed, result.attempted);
    }
    Ok(())
}

fn print_preview(preview: &ImportPreview) {
    println!(
        "{} rows ingested, {} valid records with {} total items",
        preview.rows.len(),
        preview.records.len(),
        preview.total_items()
    );

    let report = &preview.report;
    if !report.is_valid() {
        println!("The file has the following errors:");
        for error in report.preview(VALIDATION_PREVIEW_LIMIT) {
            println!("  - {error}");
        }
        let hidden = report.overflow(VALIDATION_PREVIEW_LIMIT);
        if hidden > 0 {
            println!("  ... and {hidden} more errors");
        }
    }
}
