use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use feedbackstore::DocumentStore;
use feedbackstore::cli::{Cli, Command};
use feedbackstore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn format_ts(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ms.to_string())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("feedbackstore starting");
    let store = DocumentStore::open(&config.store_path)?;

    match cli.command {
        Command::Collections => {
            let collections = store.list_collections()?;
            if collections.is_empty() {
                println!("No collections found");
            } else {
                for name in collections {
                    println!("{}", name);
                }
            }
        }
        Command::List { collection, limit } => {
            let docs = store.list(&collection)?;
            let skip = limit.map(|n| docs.len().saturating_sub(n)).unwrap_or(0);
            for doc in docs.into_iter().skip(skip) {
                println!(
                    "{} {} {}",
                    doc.id.yellow(),
                    format_ts(doc.created_at).dimmed(),
                    serde_json::to_string(&doc.data)?
                );
            }
        }
        Command::Get { collection, id } => {
            let doc = store.get(&collection, &id)?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Command::Stats { collection } => {
            let stats = store.stats(&collection)?;
            println!("Collection: {}", collection.cyan());
            println!("  Documents: {}", stats.document_count);
            println!("  Total bytes: {}", stats.total_bytes);
            if let Some(first) = stats.first_created_at {
                println!("  First: {}", format_ts(first));
            }
            if let Some(last) = stats.last_created_at {
                println!("  Last: {}", format_ts(last));
            }
        }
        Command::Delete { collection } => {
            store.delete(&collection)?;
            println!("{} Deleted collection: {}", "✓".green(), collection);
        }
    }

    Ok(())
}
