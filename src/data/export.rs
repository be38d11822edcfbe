//! Lineup export in the FanDuel upload layout: one column per roster slot, headed by the slot's
//! position code, each cell `playerId:playerName`, CRLF-terminated rows.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use crate::optimizer::lineup::LineupResult;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write lineup CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush lineup CSV: {0}")]
    Io(#[from] std::io::Error),
    #[error("lineup CSV is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Write `lineups` to `writer`. The header comes from the first lineup's positions; nothing is
/// written for an empty slice.
pub fn write_lineups_csv<W: Write>(writer: W, lineups: &[LineupResult]) -> Result<(), ExportError> {
    let Some(first) = lineups.first() else {
        return Ok(());
    };
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .flexible(true)
        .from_writer(writer);

    csv_writer.write_record(first.entries.iter().map(|entry| entry.position.code()))?;
    for lineup in lineups {
        csv_writer.write_record(
            lineup
                .entries
                .iter()
                .map(|entry| format!("{}:{}", entry.player_id, entry.name)),
        )?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn lineups_to_csv(lineups: &[LineupResult]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_lineups_csv(&mut buffer, lineups)?;
    Ok(String::from_utf8(buffer)?)
}

/// Suggested download name, e.g. `fanduel_lineup_2024-01-05T18:30:00Z.csv`.
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!(
        "fanduel_lineup_{}.csv",
        at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}
