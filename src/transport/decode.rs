//! Envelope decoding.
//!
//! Pages are processed strictly in stored order; `page_number` is never used for reordering.
//! Decoding stops right after the first page whose continuation flag is falsy, even when more
//! pages follow. A single mis-flagged middle page therefore truncates the result; this is kept
//! for compatibility with existing producers and reported through a `tracing` warning.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{Dataset, Record};

use super::csv::read_records_csv;
use super::envelope::{Envelope, PageRecord};

/// Reassemble a [`Dataset`] from an envelope, consuming it.
pub fn decode(envelope: Envelope) -> PipelineResult<Dataset> {
    let total = envelope.pages.len();
    let mut records: Vec<Record> = Vec::new();

    for (idx0, page) in envelope.pages.into_iter().enumerate() {
        let next_page = page.next_page;
        let page_number = page.page_number;
        let mut page_records = decode_page(page)?;
        tracing::debug!(page_number, rows = page_records.len(), "decoded page");
        records.append(&mut page_records);

        if !next_page {
            let skipped = total - idx0 - 1;
            if skipped > 0 {
                tracing::warn!(
                    page_number,
                    skipped,
                    "continuation flag is false before the last page; remaining pages ignored"
                );
            }
            break;
        }
    }

    Ok(Dataset::new(records))
}

/// Parse an envelope JSON document and decode it.
///
/// Returns [`PipelineError::MalformedEnvelope`] if the document has no `pages` array.
pub fn decode_str(input: &str) -> PipelineResult<Dataset> {
    decode(Envelope::from_json_str(input)?)
}

/// Decode one page record into its records.
pub fn decode_page(page: PageRecord) -> PipelineResult<Vec<Record>> {
    let page_number = page.page_number;
    let encoded = page.csv_data.ok_or_else(|| PipelineError::MalformedEnvelope {
        page_number,
        message: "missing 'csv_data'".to_string(),
    })?;

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| PipelineError::DecodeError {
            page_number,
            message: format!("invalid base64: {e}"),
        })?;
    let text = String::from_utf8(bytes).map_err(|e| PipelineError::DecodeError {
        page_number,
        message: format!("csv data is not utf-8: {e}"),
    })?;

    read_records_csv(&text, page_number)
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_page, decode_str};
    use crate::error::PipelineError;
    use crate::transport::envelope::{Envelope, PageRecord};
    use crate::transport::{encode, paginate};
    use crate::types::{Dataset, Record};

    fn dataset_of_n(n: u64) -> Dataset {
        Dataset::new(
            (1..=n)
                .map(|i| Record::new(i, "Italy", "completed", i as f64 * 1.25))
                .collect(),
        )
    }

    #[test]
    fn round_trip_reproduces_dataset() {
        let ds = dataset_of_n(7);
        let env = encode(&paginate(&ds, 3).unwrap()).unwrap();
        assert_eq!(decode(env).unwrap(), ds);
    }

    #[test]
    fn false_flag_on_middle_page_truncates() {
        let ds = dataset_of_n(9);
        let mut env = encode(&paginate(&ds, 3).unwrap()).unwrap();
        env.pages[1].next_page = false;

        let out = decode(env).unwrap();
        assert_eq!(out.records, ds.records[..6].to_vec());
    }

    #[test]
    fn stored_order_is_not_resorted() {
        let ds = dataset_of_n(4);
        let mut env = encode(&paginate(&ds, 2).unwrap()).unwrap();
        env.pages.swap(0, 1);
        // The swapped-in first page is page 2, whose flag is false: decoding stops there.
        let out = decode(env).unwrap();
        let ids: Vec<u64> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn missing_csv_data_is_malformed() {
        let err = decode_page(PageRecord {
            page_number: 3,
            next_page: false,
            csv_data: None,
        })
        .unwrap_err();
        assert!(matches!(err, PipelineError::MalformedEnvelope { page_number: 3, .. }));
    }

    #[test]
    fn invalid_base64_is_decode_error() {
        let env = Envelope {
            pages: vec![PageRecord::new(1, false, "***not base64***")],
        };
        let err = decode(env).unwrap_err();
        assert!(matches!(err, PipelineError::DecodeError { page_number: 1, .. }));
    }

    #[test]
    fn non_utf8_payload_is_decode_error() {
        // 0xFF 0xFE
        let env = Envelope {
            pages: vec![PageRecord::new(1, false, "//4=")],
        };
        assert!(matches!(decode(env).unwrap_err(), PipelineError::DecodeError { .. }));
    }

    #[test]
    fn wrong_header_is_parse_error() {
        // "a,b\n1,2\n"
        let env = Envelope {
            pages: vec![PageRecord::new(1, false, "YSxiCjEsMgo=")],
        };
        assert!(matches!(decode(env).unwrap_err(), PipelineError::ParseError { .. }));
    }

    #[test]
    fn document_without_pages_is_malformed() {
        let err = decode_str(r#"{"data": []}"#).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedEnvelope { .. }));
    }

    #[test]
    fn empty_envelope_decodes_to_empty_dataset() {
        assert!(decode(Envelope::default()).unwrap().is_empty());
    }
}
