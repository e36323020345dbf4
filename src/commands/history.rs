// `history`: list persisted batches or print the report of one of them

use std::path::Path;

use chrono::SecondsFormat;

use crate::cli::HistoryArgs;
use crate::config::AppConfig;
use crate::format::{self, ReportOptions};
use crate::history_repo::HistoryStore;
use crate::models::HistoryEntry;

pub async fn run(config: &AppConfig, args: HistoryArgs) -> anyhow::Result<()> {
    // Opening would create an empty database at a mistyped path.
    anyhow::ensure!(
        Path::new(&config.history.path).is_file(),
        "History database {} not found",
        config.history.path
    );
    let repo = super::open_history_repo(&config.history).await?;
    let entries = repo.load().await?;
    let output = match args.record {
        Some(record) => render_record(&entries, record, &args.display.report_options())?,
        None => list_records(&entries),
    };
    println!("{output}");
    Ok(())
}

/// One line per entry, numbered from 1, oldest first.
pub fn list_records(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No history records".to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "  Record {}: Date {}  ({} lines, {} fridges)",
                i + 1,
                entry.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
                entry.raw.len(),
                entry.snapshot.cycles.num_fridges(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Report of the 1-based `record` as it stood after that batch.
pub fn render_record(
    entries: &[HistoryEntry],
    record: usize,
    options: &ReportOptions,
) -> anyhow::Result<String> {
    anyhow::ensure!(
        record >= 1 && record <= entries.len(),
        "record must be between 1 and {}, got {}",
        entries.len(),
        record
    );
    let entry = &entries[record - 1];
    Ok(format!(
        "Record {}: Date {}\n{}",
        record,
        entry.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
        format::format_report(&entry.snapshot.summaries, &entry.snapshot.cycles, options)
    ))
}
