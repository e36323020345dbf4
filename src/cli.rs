// Command-line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::format::ReportOptions;
use crate::models::{CycleNumber, FridgeId};

/// Fridge cycle monitor: watches a cooldown/warmup log and keeps running statistics.
#[derive(Parser, Debug)]
#[command(name = "fridgetop")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "FRIDGETOP_CONFIG")]
    pub config: Option<PathBuf>,

    /// History database path (overrides config).
    #[arg(long, global = true)]
    pub history_db: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a log file, print the report, then update it whenever the file changes.
    Watch(WatchArgs),

    /// List persisted history records or print one of them.
    History(HistoryArgs),
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Log file to read and monitor.
    pub input_file: PathBuf,

    #[command(flatten)]
    pub display: DisplayArgs,

    /// Print the report once and exit without watching.
    #[arg(long)]
    pub once: bool,

    /// Also serve the HTTP/WebSocket query API.
    #[arg(long)]
    pub serve: bool,

    /// Keep history in memory only.
    #[arg(long)]
    pub no_history: bool,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Record to print (1-based, as listed). Lists all records when omitted.
    #[arg(short, long)]
    pub record: Option<usize>,

    #[command(flatten)]
    pub display: DisplayArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DisplayArgs {
    /// Only show this fridge.
    #[arg(long)]
    pub fridge: Option<FridgeId>,

    /// Only show this cycle in cycle tables.
    #[arg(long)]
    pub cycle: Option<CycleNumber>,

    /// Suppress summary tables.
    #[arg(long)]
    pub no_summary: bool,

    /// Suppress cycle tables.
    #[arg(long)]
    pub no_cycles: bool,
}

impl DisplayArgs {
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            fridge: self.fridge,
            cycle: self.cycle,
            show_summary: !self.no_summary,
            show_cycles: !self.no_cycles,
        }
    }
}
