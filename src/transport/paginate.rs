//! Dataset pagination.

use crate::error::{PipelineError, PipelineResult};
use crate::types::{Dataset, Page};

/// Split `dataset` into consecutive pages of at most `page_size` records.
///
/// Pages are numbered from 1, partition the dataset exactly and keep record order. Every page
/// except the last holds exactly `page_size` records; an empty dataset yields no pages.
///
/// Returns [`PipelineError::InvalidConfiguration`] if `page_size == 0`.
pub fn paginate(dataset: &Dataset, page_size: usize) -> PipelineResult<Vec<Page>> {
    if page_size == 0 {
        return Err(PipelineError::InvalidConfiguration {
            message: "page_size must be > 0".to_string(),
        });
    }

    Ok(dataset
        .records
        .chunks(page_size)
        .enumerate()
        .map(|(idx0, chunk)| Page {
            number: idx0 + 1,
            records: chunk.to_vec(),
        })
        .collect())
}

/// Number of pages [`paginate`] produces for `row_count` records.
pub fn page_count(row_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    row_count.div_ceil(page_size)
}
