//! Statcast-style pitch CSV → `PitchEvent` rows.
//!
//! Columns are matched by header name; extra columns are ignored. Rows that
//! do not deserialize are counted and skipped.

use anyhow::{Context, Result};
use bb_core::PitchEvent;
use std::io::Read;
use std::path::Path;

/// CSV parsing statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub failed: u32,
}

pub fn read_events_csv(path: &Path) -> Result<(Vec<PitchEvent>, ParseStats)> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open events CSV: {}", path.display()))?;
    let (events, stats) = parse_events(reader)?;
    log::info!(
        "read {} events from {} ({} rows failed)",
        stats.parsed,
        path.display(),
        stats.failed
    );
    Ok((events, stats))
}

pub fn parse_events<R: Read>(mut reader: csv::Reader<R>) -> Result<(Vec<PitchEvent>, ParseStats)> {
    // Fails early on a file with no usable header.
    reader.headers().context("Failed to read CSV header")?;

    let mut events = Vec::new();
    let mut stats = ParseStats::default();
    for row in reader.deserialize::<PitchEvent>() {
        stats.total_rows += 1;
        match row {
            Ok(event) => {
                stats.parsed += 1;
                events.push(event);
            }
            Err(e) => {
                stats.failed += 1;
                log::warn!("skipping events row {}: {}", stats.total_rows, e);
            }
        }
    }
    Ok((events, stats))
}
