//! In-memory data quality and analytics.
//!
//! The processing layer operates on a decoded [`crate::types::Dataset`]:
//!
//! - [`fuzzy`]: approximate matching of a value against a canonical vocabulary
//! - [`cleaning`]: alias replacement + fuzzy correction of `country` and `status`
//! - [`aggregate`]: per-country statistics joined into an [`AggregationReport`]
//!
//! ## Example: clean → aggregate
//!
//! ```rust
//! use txn_pipeline::processing::{aggregate, clean, AggregationOptions, CleaningRules};
//! use txn_pipeline::types::{Dataset, Record};
//!
//! let ds = Dataset::new(vec![
//!     Record::new(1, "Sopain", "pendhing", 100.0),
//!     Record::new(2, "Spain", "compoletd", 200.0),
//!     Record::new(3, "United States of America", "fialed", 2_000_000.0),
//! ]);
//!
//! let cleaned = clean(&ds, &CleaningRules::default());
//! let report = aggregate(&cleaned, &AggregationOptions::default())?;
//!
//! assert_eq!(report.row("Spain").unwrap().average_outstanding, Some(100.0));
//! assert_eq!(report.row("USA").unwrap().critical_rate, 1.0);
//! # Ok::<(), txn_pipeline::PipelineError>(())
//! ```

pub mod aggregate;
pub mod cleaning;
pub mod fuzzy;

pub use aggregate::{aggregate, AggregationOptions, AggregationReport, ReportIndex, ReportRow};
pub use cleaning::{clean, CleaningRules};
pub use fuzzy::{correct, FuzzyCorrector};
