//! Envelope encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{PipelineError, PipelineResult};
use crate::types::Page;

use super::csv::write_records_csv;
use super::envelope::{Envelope, PageRecord};

/// Encode pages into an [`Envelope`].
///
/// Page `i` of `n` (1-based, in slice order) becomes a [`PageRecord`] with `page_number = i`,
/// `next_page = (i != n)` and the page's CSV text base64-encoded into `csv_data`.
pub fn encode(pages: &[Page]) -> PipelineResult<Envelope> {
    let total = pages.len();
    let mut out = Vec::with_capacity(total);

    for (idx0, page) in pages.iter().enumerate() {
        let page_number = idx0 + 1;
        let page_number = u32::try_from(page_number).map_err(|_| PipelineError::InvalidConfiguration {
            message: format!("page count {total} exceeds the envelope limit of {}", u32::MAX),
        })?;
        out.push(encode_page(page, page_number, idx0 + 1 != total)?);
    }

    tracing::debug!(pages = total, "encoded envelope");
    Ok(Envelope { pages: out })
}

/// Encode a single page into a [`PageRecord`].
pub fn encode_page(page: &Page, page_number: u32, next_page: bool) -> PipelineResult<PageRecord> {
    let text = write_records_csv(&page.records)?;
    Ok(PageRecord::new(page_number, next_page, STANDARD.encode(text.as_bytes())))
}
