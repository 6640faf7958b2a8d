//! CLI argument parsing for feedbackstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fb")]
#[command(author, version, about = "Inspect the okrcoach feedback document store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all collections
    Collections,

    /// List documents in a collection
    List {
        /// Collection name
        #[arg(default_value = crate::DEFAULT_COLLECTION)]
        collection: String,

        /// Show only the newest N documents
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print a single document as JSON
    Get {
        /// Collection name
        #[arg(required = true)]
        collection: String,

        /// Document ID
        #[arg(required = true)]
        id: String,
    },

    /// Show statistics for a collection
    Stats {
        /// Collection name
        #[arg(default_value = crate::DEFAULT_COLLECTION)]
        collection: String,
    },

    /// Delete a collection
    Delete {
        /// Collection name
        #[arg(required = true)]
        collection: String,
    },
}
