//! Command-line surface: one subcommand per user action.
//!
//! Matching the single-action event model of the editor, each invocation
//! opens the configured store, runs exactly one operation to completion,
//! prints its outcome and exits.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Quotation editor for laboratory service estimates.
#[derive(Parser, Debug)]
#[command(name = "quote-app")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "quotes.toml")]
    pub config: PathBuf,

    /// Store backend override (e.g. "sqlite", "memory")
    #[arg(long)]
    pub backend: Option<String>,

    /// Store connection override (database path or ":memory:")
    #[arg(long)]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save a quote document (JSON with quote and lines) to the history
    Save {
        /// Path to the quote document
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Load the last-saved quotation and print a summary
    Load,

    /// Render the printable preview of the last-saved quotation
    Preview,

    /// List saved quotations, most recent first
    List,

    /// Filter saved quotations by text and date window
    Filter {
        /// Substring matched against reference and sponsor
        #[arg(short, long, default_value = "")]
        query: String,

        /// Only quotations dated on or after (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Only quotations dated on or before (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Open one saved quotation and print a summary
    Open {
        /// Snapshot identifier (see `list`)
        id: String,
    },

    /// Duplicate one saved quotation under a fresh reference
    Duplicate {
        /// Snapshot identifier (see `list`)
        id: String,
    },

    /// Rename one saved quotation's reference
    Rename {
        /// Snapshot identifier (see `list`)
        id: String,
        /// The new reference
        reference: String,
    },

    /// Delete one saved quotation
    Delete {
        /// Snapshot identifier (see `list`)
        id: String,
    },

    /// Delete the entire history. Non-recoverable
    Clear {
        /// Confirm the destructive operation
        #[arg(long)]
        yes: bool,
    },

    /// Write a backup bundle (history plus current quote) to a file
    Export {
        #[arg(short, long, default_value = "quotes-backup.json")]
        out: PathBuf,
    },

    /// Replace the entire history from a backup bundle
    Import {
        /// Path to the backup bundle
        #[arg(short, long)]
        file: PathBuf,
    },
}
