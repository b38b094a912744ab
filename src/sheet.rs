//! Time-sheet input: row model, CSV ingest, month names, and the year
//! consistency check.

use crate::error::{Result, SheetError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Canonical English month names, case- and spelling-exact.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One raw row as entered on the time sheet.
#[derive(Debug, Deserialize, Clone)]
pub struct SheetRow {
    /// First four characters are the calendar year.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Name")]
    pub name: String,
    /// Raw activity-code string, sanitized and decoded downstream.
    #[serde(rename = "Activities")]
    pub activities: String,
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Notes", default)]
    pub notes: Option<String>,
    #[serde(rename = "Story", default)]
    pub story: Option<String>,
}

/// Maps a data-row index (0-based) to the sheet line number a human sees:
/// the header is line 1, so the first data row is line 2.
pub fn line_number(index: usize) -> usize {
    index + 2
}

/// Maps a canonical month name to its index 0-11.
pub fn month_index(name: &str) -> Option<usize> {
    MONTHS.iter().position(|&m| m == name)
}

/// Reads all rows from a time-sheet CSV file.
pub fn read_sheet(path: &Path) -> Result<Vec<SheetRow>> {
    let file = std::fs::File::open(path)?;
    read_sheet_from_reader(file)
}

/// Reads all rows from any CSV source with the expected header line.
pub fn read_sheet_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<SheetRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in rdr.deserialize() {
        let row: SheetRow = row?;
        rows.push(row);
    }
    Ok(rows)
}

/// Extracts the 4-digit year prefix of a row's timestamp.
fn timestamp_year(row: &SheetRow, index: usize) -> std::result::Result<&str, SheetError> {
    let year = row.timestamp.get(..4).filter(|y| y.chars().all(|c| c.is_ascii_digit()));
    year.ok_or(SheetError::BadTimestamp {
        row: line_number(index),
    })
}

/// Returns the single calendar year covered by the sheet.
///
/// Fails with [`SheetError::YearConflict`] when more than one year is
/// present, listing every line except those in the largest group -- the
/// majority year is presumed correct and the minority rows are likely
/// data-entry typos. When group sizes tie, the lexicographically smallest
/// tied year is treated as the majority.
pub fn check_year(rows: &[SheetRow]) -> std::result::Result<i32, SheetError> {
    if rows.is_empty() {
        return Err(SheetError::EmptySheet);
    }

    let mut year_to_lines: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, row) in rows.iter().enumerate() {
        let year = timestamp_year(row, i)?;
        year_to_lines.entry(year).or_default().push(line_number(i));
    }

    // Largest group wins; Reverse breaks count ties toward the
    // lexicographically smallest year.
    let majority = year_to_lines
        .iter()
        .max_by_key(|(year, lines)| (lines.len(), std::cmp::Reverse(*year)))
        .map(|(year, _)| *year)
        .ok_or(SheetError::EmptySheet)?;

    if year_to_lines.len() == 1 {
        return majority.parse::<i32>().map_err(|_| SheetError::BadTimestamp {
            row: line_number(0),
        });
    }

    let mut offending: Vec<usize> = year_to_lines
        .iter()
        .filter(|(year, _)| **year != majority)
        .flat_map(|(_, lines)| lines.iter().copied())
        .collect();
    offending.sort_unstable();

    Err(SheetError::YearConflict { rows: offending })
}
