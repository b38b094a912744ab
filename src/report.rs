//! Renders the thirteen tables (twelve months plus the annual summary)
//! as CSV files under the output directory.

use crate::error::{Result, TallyError};
use crate::sheet::MONTHS;
use crate::table::MonthTable;
use std::path::{Path, PathBuf};

/// Writes `Summary.csv` and one CSV per month into
/// `<output_dir>/<year>_summary/`, creating the directory as needed.
/// Returns the report directory path.
pub fn write_report(
    output_dir: &Path,
    year: i32,
    months: &[MonthTable],
    summary: &MonthTable,
) -> Result<PathBuf> {
    let report_dir = output_dir.join(format!("{}_summary", year));
    std::fs::create_dir_all(&report_dir)?;

    write_table_csv(&report_dir.join("Summary.csv"), summary)?;
    for (month, table) in MONTHS.iter().zip(months) {
        write_table_csv(&report_dir.join(format!("{}.csv", month)), table)?;
    }

    tracing::info!(dir = %report_dir.display(), "report written");
    Ok(report_dir)
}

/// Writes one table: header line, person rows in order, then the Total row.
pub fn write_table_csv(path: &Path, table: &MonthTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        TallyError::Other(format!(
            "Error saving file! Make sure no spreadsheet is open with the name {}. ({})",
            path.display(),
            e
        ))
    })?;

    writer.write_record(table.header())?;
    for row in table.rows.iter().chain(std::iter::once(&table.total)) {
        let mut record = Vec::with_capacity(row.counts.len() + 3);
        record.push(row.name.clone());
        record.extend(row.counts.iter().map(u64::to_string));
        record.push(row.notes.clone());
        record.push(row.stories.clone());
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(())
}
