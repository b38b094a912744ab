//! Fixed-column tabular views of the aggregated records: one table per
//! month plus the merged annual summary.

use crate::activity::letter_columns;
use crate::aggregate::PersonMonthRecord;
use std::collections::BTreeMap;

/// Column label for the optional row-wise sum of the letter columns.
pub const ACTIVITY_TOTAL_COLUMN: &str = "Activity Total";

/// Row label of the synthetic column-sum row.
pub const TOTAL_ROW_LABEL: &str = "Total";

/// One person's rendered row: numeric cells aligned with
/// [`MonthTable::numeric_columns`], then the two annotation cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub name: String,
    pub counts: Vec<u64>,
    pub notes: String,
    pub stories: String,
}

/// A rectangular table: one row per person in case-sensitive lexical
/// order, plus the synthetic Total row.
///
/// Column order is fixed: letters A..max_letter excluding S/P, the
/// optional "Activity Total", then S, then P, then Notes, then Stories.
#[derive(Debug, Clone)]
pub struct MonthTable {
    pub numeric_columns: Vec<String>,
    pub rows: Vec<TableRow>,
    pub total: TableRow,
}

impl MonthTable {
    /// Full header: person-name column, numeric columns, annotation columns.
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["Name".to_string()];
        header.extend(self.numeric_columns.iter().cloned());
        header.push("Notes".to_string());
        header.push("Stories".to_string());
        header
    }
}

/// The ordered numeric column labels for the configured letter range.
pub fn numeric_columns(max_letter: char, activity_total: bool) -> Vec<String> {
    let mut columns: Vec<String> = letter_columns(max_letter)
        .into_iter()
        .map(String::from)
        .collect();
    if activity_total {
        columns.push(ACTIVITY_TOTAL_COLUMN.to_string());
    }
    columns.push("S".to_string());
    columns.push("P".to_string());
    columns
}

fn total_row(numeric_len: usize, rows: &[TableRow]) -> TableRow {
    let mut sums = vec![0u64; numeric_len];
    for row in rows {
        for (sum, &count) in sums.iter_mut().zip(&row.counts) {
            *sum = sum.saturating_add(count);
        }
    }
    // String cells on the Total row stay blank rather than concatenated.
    TableRow {
        name: TOTAL_ROW_LABEL.to_string(),
        counts: sums,
        notes: String::new(),
        stories: String::new(),
    }
}

/// Builds the fixed-column table for one month's records.
pub fn build_month_table(
    records: &BTreeMap<String, PersonMonthRecord>,
    max_letter: char,
    activity_total: bool,
) -> MonthTable {
    let letters = letter_columns(max_letter);
    let columns = numeric_columns(max_letter, activity_total);

    // BTreeMap iteration yields persons already sorted by name.
    let rows: Vec<TableRow> = records
        .iter()
        .map(|(name, record)| {
            let letter_counts: Vec<u64> = letters.iter().map(|&c| record.hours(c)).collect();
            let mut counts = letter_counts.clone();
            if activity_total {
                counts.push(letter_counts.iter().sum());
            }
            counts.push(record.hours('S'));
            counts.push(record.hours('P'));
            TableRow {
                name: name.clone(),
                counts,
                notes: record.joined_notes(),
                stories: record.joined_stories(),
            }
        })
        .collect();

    let total = total_row(columns.len(), &rows);
    MonthTable {
        numeric_columns: columns,
        rows,
        total,
    }
}

/// Merges the twelve month tables into the annual summary.
///
/// Numeric columns are summed per person across the months containing
/// that person (absent months contribute 0); Notes and Stories are
/// concatenated across those months with a single space and trimmed.
/// The reduction operator deliberately differs per column type.
pub fn build_annual_summary(tables: &[MonthTable]) -> MonthTable {
    let columns = tables
        .first()
        .map(|t| t.numeric_columns.clone())
        .unwrap_or_default();

    struct Merged {
        counts: Vec<u64>,
        notes: Vec<String>,
        stories: Vec<String>,
    }

    let mut merged: BTreeMap<String, Merged> = BTreeMap::new();
    for table in tables {
        for row in &table.rows {
            let entry = merged.entry(row.name.clone()).or_insert_with(|| Merged {
                counts: vec![0; columns.len()],
                notes: Vec::new(),
                stories: Vec::new(),
            });
            for (sum, &count) in entry.counts.iter_mut().zip(&row.counts) {
                *sum = sum.saturating_add(count);
            }
            entry.notes.push(row.notes.clone());
            entry.stories.push(row.stories.clone());
        }
    }

    let rows: Vec<TableRow> = merged
        .into_iter()
        .map(|(name, m)| TableRow {
            name,
            counts: m.counts,
            notes: m.notes.join(" ").trim().to_string(),
            stories: m.stories.join(" ").trim().to_string(),
        })
        .collect();

    let total = total_row(columns.len(), &rows);
    MonthTable {
        numeric_columns: columns,
        rows,
        total,
    }
}
