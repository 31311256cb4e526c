//! CSV text codec for a single page.
//!
//! Rules:
//!
//! - The first line is the header `id,country,status,amount`, in exactly that order.
//! - One line per record follows; numbers use their shortest round-trip decimal form.

use crate::error::{PipelineError, PipelineResult};
use crate::types::{Record, RECORD_FIELDS};

/// Serialize records to CSV text (header + one row per record).
///
/// The header is written even when `records` is empty.
pub fn write_records_csv(records: &[Record]) -> PipelineResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(RECORD_FIELDS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| PipelineError::Io(e.into_error()))?;
    // The writer only ever receives UTF-8 strings and ASCII numbers.
    String::from_utf8(bytes).map_err(|e| PipelineError::Io(std::io::Error::other(e)))
}

/// Parse CSV text produced by [`write_records_csv`] back into records.
///
/// `page_number` is only used to label errors. Row numbers in errors are 1-based and count the
/// header as row 1.
pub fn read_records_csv(text: &str, page_number: u32) -> PipelineResult<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = rdr.headers().map_err(|e| PipelineError::ParseError {
        page_number,
        row: 1,
        message: e.to_string(),
    })?;
    if headers.iter().ne(RECORD_FIELDS) {
        return Err(PipelineError::ParseError {
            page_number,
            row: 1,
            message: format!(
                "expected header {:?}, found {:?}",
                RECORD_FIELDS,
                headers.iter().collect::<Vec<_>>()
            ),
        });
    }

    let mut records = Vec::new();
    for (row_idx0, result) in rdr.deserialize::<Record>().enumerate() {
        let user_row = row_idx0 + 2;
        let record = result.map_err(|e| PipelineError::ParseError {
            page_number,
            row: user_row,
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}
