//! lossbook — inventory-loss tracking with file-based hand-off.
//!
//! Usage:
//!     lossbook entry add --product 7891234567890 --reason 1 --quantity 2 --unit-cost 25.99
//!     lossbook export
//!     lossbook import ./reason01_20260807.txt

mod context;
mod render;

use std::path::PathBuf;

use chrono::{NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use lossbook_core::entries::{DateRange, EntryDraft};
use lossbook_core::products::ProductRepositoryTrait;
use lossbook_core::reasons::ReasonRepositoryTrait;

use context::{resolve_data_dir, ServiceContext};

#[derive(Parser, Debug)]
#[command(name = "lossbook", about = "Track inventory losses and hand them off as flat files")]
struct Cli {
    /// Application data directory (the database lives here)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record and list loss entries
    Entry {
        #[command(subcommand)]
        command: EntryCommand,
    },
    /// Export pending entries to one file per reason
    Export {
        /// Destination directory (defaults to <data-dir>/exports)
        #[arg(long)]
        out: Option<PathBuf>,
        /// List previously exported files instead of running an export
        #[arg(long)]
        list_files: bool,
    },
    /// Import entries from a pipe-delimited file
    Import {
        /// Path of the file to import
        file: PathBuf,
    },
    /// Loss totals, overall and per reason
    Stats {
        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// List the reason catalog
    Reasons,
    /// List catalog products
    Products,
}

#[derive(Subcommand, Debug)]
enum EntryCommand {
    /// Record a new loss entry
    Add {
        /// Product business code
        #[arg(long)]
        product: String,
        /// Reason id (see `lossbook reasons`)
        #[arg(long)]
        reason: String,
        #[arg(long)]
        quantity: Decimal,
        #[arg(long, default_value = "0")]
        unit_cost: Decimal,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show recent entries
    List {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

fn date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<DateRange> {
    if from.is_none() && to.is_none() {
        return None;
    }
    let start_date = from.unwrap_or_else(|| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    let end_date = to.unwrap_or_else(|| Utc::now().date_naive());
    Some(DateRange {
        start: Utc.from_utc_datetime(&start_date.and_hms_opt(0, 0, 0).unwrap()),
        end: Utc.from_utc_datetime(&end_date.and_hms_opt(23, 59, 59).unwrap()),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let context = ServiceContext::initialize(resolve_data_dir(cli.data_dir)).await?;

    match cli.command {
        Command::Entry { command } => match command {
            EntryCommand::Add {
                product,
                reason,
                quantity,
                unit_cost,
                notes,
            } => {
                let id = context
                    .entry_service
                    .add_entry(EntryDraft {
                        product_code: product,
                        reason_id: reason,
                        quantity,
                        unit_cost,
                        notes,
                    })
                    .await?;
                println!("Recorded entry #{id}");
            }
            EntryCommand::List { limit } => {
                let entries = context.entry_service.recent_entries(limit)?;
                if entries.is_empty() {
                    println!("No entries recorded yet.");
                }
                for entry in entries {
                    println!("{}", render::entry_row(&entry));
                }
            }
        },
        Command::Export { out, list_files } => {
            let base_dir = out.unwrap_or_else(|| context.default_export_dir());
            let service = context.export_service(&base_dir);
            if list_files {
                let artifacts = service.list_exported_files().await?;
                if artifacts.is_empty() {
                    println!("No exported files under {}.", base_dir.display());
                }
                for artifact in artifacts {
                    println!("{}", render::artifact_row(&artifact));
                }
            } else {
                let summary = service.export_pending().await?;
                println!("{}", render::export_summary(&summary));
            }
        }
        Command::Import { file } => {
            let summary = context.import_service().import_file(&file).await?;
            println!("{}", render::import_summary(&summary));
        }
        Command::Stats { from, to } => {
            let range = date_range(from, to);
            let aggregate = context.entry_service.loss_summary(range.as_ref())?;
            let breakdown = context.entry_service.loss_by_reason(range.as_ref())?;
            println!("{}", render::loss_report(&aggregate, &breakdown));
        }
        Command::Reasons => {
            for reason in context.reason_repository.list_active()? {
                println!("{}", render::reason_row(&reason));
            }
        }
        Command::Products => {
            let products = context.product_repository.list()?;
            if products.is_empty() {
                println!("No products in the catalog.");
            }
            for product in products {
                println!("{}", render::product_row(&product));
            }
        }
    }

    Ok(())
}
