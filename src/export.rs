use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Record;

const HEADER: [&str; 4] = ["Date", "Item", "Amount", "Reimbursed"];

/// Write records to a CSV file with a header row. Unlike the records file,
/// fields are quoted where needed, so the output is safe for spreadsheets.
pub(crate) fn export_to_csv(records: &[Record], path: &Path) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;

    wtr.write_record(HEADER)
        .context("Failed to write CSV header")?;
    for record in records {
        wtr.write_record([
            record.date.as_str(),
            record.item.as_str(),
            format!("{:.2}", record.amount).as_str(),
            record.reimbursed.as_str(),
        ])
        .context("Failed to write CSV record")?;
    }
    wtr.flush().context("Failed to flush CSV file")?;

    Ok(records.len())
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
