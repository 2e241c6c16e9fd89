// Roster import from a `name,surname,number` CSV file.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::db::Database;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("failed to store roster: {0:#}")]
    Storage(anyhow::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// One roster row, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub surname: String,
    pub number: String,
}

#[derive(Debug, Deserialize)]
struct RawRosterRow {
    name: String,
    surname: String,
    /// Read as text so "00" and "07" keep their leading zeros.
    #[serde(default)]
    number: String,
}

/// Parse roster rows. Malformed rows and rows with a blank name are
/// skipped with a warning.
fn load_roster_from_reader<R: Read>(rdr: R) -> Result<Vec<RosterEntry>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut entries = Vec::new();
    for result in reader.deserialize::<RawRosterRow>() {
        match result {
            Ok(raw) => {
                if raw.name.is_empty() && raw.surname.is_empty() {
                    warn!("skipping roster row with no name");
                    continue;
                }
                entries.push(RosterEntry {
                    name: raw.name,
                    surname: raw.surname,
                    number: raw.number,
                });
            }
            Err(e) => {
                warn!("skipping malformed roster row: {}", e);
            }
        }
    }
    Ok(entries)
}

/// Read a roster CSV file.
pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>, ImportError> {
    let file = std::fs::File::open(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_roster_from_reader(file).map_err(|e| ImportError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Read a roster CSV and upsert every row into the database in one
/// transaction. Returns how many players were written.
pub fn import_roster(db: &Database, path: &Path) -> Result<usize, ImportError> {
    let entries = load_roster(path)?;
    if entries.is_empty() {
        return Err(ImportError::Validation(format!(
            "no players found in {}",
            path.display()
        )));
    }

    let rows: Vec<(&str, &str, &str)> = entries
        .iter()
        .map(|e| (e.name.as_str(), e.surname.as_str(), e.number.as_str()))
        .collect();
    let written = db.import_players(&rows).map_err(ImportError::Storage)?;
    info!("Imported {} players from {}", written, path.display());
    Ok(written)
}
