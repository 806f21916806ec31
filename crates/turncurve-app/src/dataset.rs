use std::path::{Path, PathBuf};

use csv::StringRecord;
use thiserror::Error;

use turncurve_core::WinRateRecord;

pub const CARD_NAME_COLUMN: &str = "Card Name";
pub const TURN_COLUMN: &str = "Turn";
pub const WIN_RATE_COLUMN: &str = "Win Rate";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read win-rate table {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("win-rate table {path:?} is missing required columns: {}", .missing.join(", "))]
    Schema { path: PathBuf, missing: Vec<String> },
    #[error("row {row} of {path:?}: invalid {column} value '{value}'")]
    Value {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Load the raw win-rate table. The header is resolved by exact column name;
/// any missing required column aborts before a single row is parsed.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<WinRateRecord>, DatasetError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader
        .headers()
        .map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let columns = ColumnMap::resolve(path, &headers)?;

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.map_err(|source| DatasetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        // Header occupies line 1, so data rows start at line 2.
        records.push(columns.parse_row(path, index + 2, &row)?);
    }

    Ok(records)
}

struct ColumnMap {
    card_name: usize,
    turn: usize,
    win_rate: usize,
}

impl ColumnMap {
    fn resolve(path: &Path, headers: &StringRecord) -> Result<Self, DatasetError> {
        let position = |name: &str| headers.iter().position(|header| header.trim() == name);

        let card_name = position(CARD_NAME_COLUMN);
        let turn = position(TURN_COLUMN);
        let win_rate = position(WIN_RATE_COLUMN);

        match (card_name, turn, win_rate) {
            (Some(card_name), Some(turn), Some(win_rate)) => Ok(Self {
                card_name,
                turn,
                win_rate,
            }),
            _ => {
                let missing = [
                    (CARD_NAME_COLUMN, card_name),
                    (TURN_COLUMN, turn),
                    (WIN_RATE_COLUMN, win_rate),
                ]
                .iter()
                .filter(|(_, found)| found.is_none())
                .map(|(name, _)| name.to_string())
                .collect();

                Err(DatasetError::Schema {
                    path: path.to_path_buf(),
                    missing,
                })
            }
        }
    }

    fn parse_row(
        &self,
        path: &Path,
        row_number: usize,
        row: &StringRecord,
    ) -> Result<WinRateRecord, DatasetError> {
        let field = |index: usize| row.get(index).unwrap_or("").trim();

        let card_name = field(self.card_name);
        if card_name.is_empty() {
            return Err(DatasetError::Value {
                path: path.to_path_buf(),
                row: row_number,
                column: CARD_NAME_COLUMN,
                value: String::new(),
            });
        }

        let turn_text = field(self.turn);
        let turn = parse_turn(turn_text).ok_or_else(|| DatasetError::Value {
            path: path.to_path_buf(),
            row: row_number,
            column: TURN_COLUMN,
            value: turn_text.to_string(),
        })?;

        let win_rate_text = field(self.win_rate);
        let win_rate = win_rate_text
            .parse::<f64>()
            .map_err(|_| DatasetError::Value {
                path: path.to_path_buf(),
                row: row_number,
                column: WIN_RATE_COLUMN,
                value: win_rate_text.to_string(),
            })?;

        Ok(WinRateRecord {
            card_name: card_name.to_string(),
            turn,
            win_rate,
        })
    }
}

/// Turns arrive as integer or float literals; floats are truncated the way
/// the source table's integer coercion behaves. Negative turns are invalid.
fn parse_turn(text: &str) -> Option<u32> {
    if let Ok(turn) = text.parse::<u32>() {
        return Some(turn);
    }

    let value = text.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.trunc() as u32)
}
