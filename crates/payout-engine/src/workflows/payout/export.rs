use std::io::Write;

use super::domain::CalculatedRecord;

/// CSV rendering for the external spreadsheet collaborator. Headers come
/// from the record's serde names, so the column set matches the JSON
/// output exactly.
pub fn write_csv<W: Write>(records: &[CalculatedRecord], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn render_csv(records: &[CalculatedRecord]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv render failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
