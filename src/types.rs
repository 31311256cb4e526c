//! Core data model types.
//!
//! Every stage of the pipeline works on a [`Dataset`] of fixed-shape [`Record`]s. Pagination
//! slices a dataset into [`Page`]s; the envelope types live in [`crate::transport::envelope`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// CSV header names, in the order records are written.
pub const RECORD_FIELDS: [&str; 4] = ["id", "country", "status", "amount"];

/// A single transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique positive identifier.
    pub id: u64,
    /// Free-text country name (may contain typos until cleaned).
    pub country: String,
    /// Free-text status (may contain typos until cleaned).
    pub status: String,
    /// Positive transaction amount.
    pub amount: f64,
}

impl Record {
    /// Create a new record.
    pub fn new(id: u64, country: impl Into<String>, status: impl Into<String>, amount: f64) -> Self {
        Self {
            id,
            country: country.into(),
            status: status.into(),
            amount,
        }
    }
}

/// In-memory ordered dataset.
///
/// Record order is insertion order and is preserved by every transformation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Records in insertion order.
    pub records: Vec<Record>,
}

impl Dataset {
    /// Create a dataset from records.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Number of records in the dataset.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Create a new dataset containing only records that match `predicate`.
    pub fn filter_records<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Record) -> bool,
    {
        let records = self
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        Self { records }
    }

    /// Create a new dataset by applying `mapper` to every record.
    pub fn map_records<F>(&self, mapper: F) -> Self
    where
        F: FnMut(&Record) -> Record,
    {
        Self {
            records: self.records.iter().map(mapper).collect(),
        }
    }

    /// Check the dataset invariants: ids are positive and unique, amounts are positive and finite.
    pub fn validate(&self) -> PipelineResult<()> {
        let mut seen = HashSet::with_capacity(self.records.len());
        for (idx, r) in self.records.iter().enumerate() {
            if r.id == 0 {
                return Err(PipelineError::InvalidConfiguration {
                    message: format!("record at index {idx} has id 0 (ids must be positive)"),
                });
            }
            if !seen.insert(r.id) {
                return Err(PipelineError::InvalidConfiguration {
                    message: format!("duplicate record id {} at index {idx}", r.id),
                });
            }
            if !(r.amount.is_finite() && r.amount > 0.0) {
                return Err(PipelineError::InvalidConfiguration {
                    message: format!("record {} has non-positive amount {}", r.id, r.amount),
                });
            }
        }
        Ok(())
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl IntoIterator for Dataset {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A contiguous slice of a [`Dataset`] prepared for transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    /// Records on this page, in dataset order.
    pub records: Vec<Record>,
}

impl Page {
    /// Number of records on the page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
