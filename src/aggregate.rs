//! Per-person, per-month accumulation of decoded rows.
//!
//! Records are created lazily on the first row referencing a
//! (person, month) key and accumulated into thereafter, never overwritten.
//! Row processing is strictly sequential: the order notes and stories are
//! appended in is observable in the joined output strings.

use crate::activity::{decode, is_invalid, sanitize, DecodeMode, NOTE_SEPARATOR};
use crate::error::{DecodeError, Result, SheetError};
use crate::sheet::{line_number, month_index, SheetRow};
use std::collections::BTreeMap;

/// Running totals and annotations for one person in one month.
#[derive(Debug, Default, Clone)]
pub struct PersonMonthRecord {
    activities: BTreeMap<char, u64>,
    notes: Vec<String>,
    stories: Vec<String>,
}

impl PersonMonthRecord {
    /// Hour count for one activity code, defaulting to 0 for unseen codes.
    pub fn hours(&self, code: char) -> u64 {
        self.activities.get(&code).copied().unwrap_or(0)
    }

    /// Folds one row's decoded activities, notes, and story text into the
    /// running record. Absent notes/story are recorded as empty strings so
    /// the join stays positional.
    pub fn apply_row(
        &mut self,
        decoded: &BTreeMap<char, u64>,
        notes: Option<&str>,
        story: Option<&str>,
    ) {
        for (&code, &count) in decoded {
            let total = self.activities.entry(code).or_insert(0);
            *total = total.saturating_add(count);
        }
        self.notes.push(notes.unwrap_or("").to_string());
        self.stories.push(story.unwrap_or("").to_string());
    }

    /// All note strings in row arrival order, joined with `"||"`.
    pub fn joined_notes(&self) -> String {
        self.notes.join(NOTE_SEPARATOR)
    }

    /// All story strings in row arrival order, joined with `"||"`.
    pub fn joined_stories(&self) -> String {
        self.stories.join(NOTE_SEPARATOR)
    }
}

/// Twelve months of per-person records, keyed by person name.
///
/// BTreeMap keeps persons in case-sensitive lexical order, which is the
/// row order of the rendered tables.
#[derive(Debug)]
pub struct SheetData {
    months: [BTreeMap<String, PersonMonthRecord>; 12],
}

impl Default for SheetData {
    fn default() -> Self {
        SheetData {
            months: std::array::from_fn(|_| BTreeMap::new()),
        }
    }
}

impl SheetData {
    /// All records for one month, ordered by person name.
    pub fn month(&self, index: usize) -> &BTreeMap<String, PersonMonthRecord> {
        &self.months[index]
    }

    /// Get-or-create accessor: the record for (person, month), zeroed on
    /// first use.
    pub fn record_mut(&mut self, person: &str, month: usize) -> &mut PersonMonthRecord {
        self.months[month].entry(person.to_string()).or_default()
    }
}

/// Result of a full collection pass over the sheet.
#[derive(Debug)]
pub struct CollectOutcome {
    pub data: SheetData,
    /// Sheet line numbers whose activity codes failed validation and were
    /// recorded with zero hours (lenient mode only).
    pub flagged: Vec<usize>,
}

/// Folds every row into per-(person, month) records.
///
/// In lenient mode a row with a malformed activity code contributes zero
/// hours, is flagged for human review, and processing continues; one bad
/// row must not block the rest of the sheet. In strict mode the first
/// malformed code aborts with the offending character and line. Unknown
/// month names are always fatal.
pub fn collect(rows: &[SheetRow], max_letter: char, mode: DecodeMode) -> Result<CollectOutcome> {
    let mut data = SheetData::default();
    let mut flagged = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let line = line_number(i);
        let month = month_index(&row.month).ok_or_else(|| SheetError::UnknownMonth {
            name: row.month.clone(),
            row: line,
        })?;

        let sanitized = sanitize(&row.activities);
        let decoded = match mode {
            DecodeMode::Lenient => {
                if is_invalid(&sanitized, max_letter) {
                    tracing::warn!(
                        line,
                        code = %row.activities,
                        "invalid activity code, counting zero hours"
                    );
                    flagged.push(line);
                    BTreeMap::new()
                } else {
                    decode(&sanitized, max_letter, DecodeMode::Lenient)
                        .map_err(|DecodeError::InvalidCharacter(ch)| SheetError::ActivitySyntax {
                            ch,
                            row: line,
                        })?
                }
            }
            DecodeMode::Strict => decode(&sanitized, max_letter, DecodeMode::Strict).map_err(
                |DecodeError::InvalidCharacter(ch)| SheetError::ActivitySyntax { ch, row: line },
            )?,
        };

        data.record_mut(&row.name, month)
            .apply_row(&decoded, row.notes.as_deref(), row.story.as_deref());
    }

    Ok(CollectOutcome { data, flagged })
}
