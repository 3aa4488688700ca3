//! CLI argument parsing for the route-table-worker binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::types::ColumnSort;

#[derive(Parser)]
#[command(name = "route-table-worker", about = "Delivery route table worker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker server (default if no subcommand given)
    Serve,
    /// Run database migrations and exit
    Migrate,
    /// Print the computed table for a CSV row snapshot
    View {
        /// CSV file with a header row (id, order, route, code, location, ...)
        #[arg(long)]
        rows: PathBuf,
        /// Day of week, 0 = Sunday .. 6 = Saturday (defaults to today)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=6))]
        weekday: Option<u8>,
        /// Use the three-tier schedule grouping
        #[arg(long)]
        tiered: bool,
        /// Column sort, e.g. `code` or `route:desc`
        #[arg(long)]
        sort: Option<ColumnSort>,
        /// Case-insensitive search over route, code, location and delivery
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
        /// Show every row on one page
        #[arg(long)]
        all: bool,
    },
}
