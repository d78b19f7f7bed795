//! Comma-separated export of the full ledger ("compliance report").

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::record::LedgerRecord;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Header row of every export.
pub const CSV_HEADER: [&str; 6] = ["Timestamp", "Type", "From", "To", "Amount", "Note"];

/// Quote a field if it contains a delimiter, quote or line break.
fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_row<W: Write>(out: &mut W, fields: &[&str]) -> std::io::Result<()> {
    let line = fields
        .iter()
        .map(|f| escape(f))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(out, "{line}")
}

fn write_record<W: Write>(out: &mut W, record: &LedgerRecord) -> std::io::Result<()> {
    let timestamp = record.timestamp.to_string();
    let amount = record.amount.decimal_label();
    write_row(
        out,
        &[
            timestamp.as_str(),
            record.kind.as_str(),
            record.from.as_str(),
            record.to.as_str(),
            amount.as_str(),
            record.note.as_str(),
        ],
    )
}

impl Ledger {
    /// Write the full ledger, in insertion order, as CSV.
    pub fn write_csv<W: Write>(&self, mut out: W) -> Result<(), LedgerError> {
        write_row(&mut out, &CSV_HEADER)?;
        for record in self.iter() {
            write_record(&mut out, record)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Render the CSV export in memory.
    pub fn to_csv_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_csv(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Write the CSV export to a file, replacing it if it exists.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<(), LedgerError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))?;
        tracing::info!(path = %path.display(), records = self.len(), "ledger exported");
        Ok(())
    }
}
