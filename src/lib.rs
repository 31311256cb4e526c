//! `txn-pipeline` moves a transactional dataset through a paginated, base64-encoded CSV envelope,
//! repairs data-entry typos with approximate string matching, and summarizes the result per
//! country.
//!
//! ## Pipeline
//!
//! 1. [`generate::generate`]: seeded synthetic [`types::Dataset`] of `(id, country, status, amount)` records
//! 2. [`transport::paginate()`]: fixed-size, ordered [`types::Page`]s
//! 3. [`transport::encode()`]: one base64 CSV [`transport::PageRecord`] per page inside an
//!    [`transport::Envelope`], persisted as JSON by [`transport::store`]
//! 4. [`transport::decode()`]: dataset reassembly, stopping after the first page whose
//!    `next_page` flag is false
//! 5. [`processing::clean()`]: alias replacement + fuzzy correction of `country` and `status`
//! 6. [`processing::aggregate()`]: per-country average pending amount, completed total, error
//!    rate and critical-failure rate
//! 7. [`sink`]: store the report once (local CSV, object store, or SQLite)
//!
//! [`pipeline::run`] wires all of the above and reports each stage to an optional
//! [`observability::PipelineObserver`].
//!
//! ## Round trip
//!
//! ```rust
//! use txn_pipeline::transport::{decode, encode, paginate};
//! use txn_pipeline::types::{Dataset, Record};
//!
//! let ds = Dataset::new(vec![
//!     Record::new(1, "Spain", "pending", 100.0),
//!     Record::new(2, "Spain", "completed", 200.0),
//!     Record::new(3, "Spain", "failed", 50.0),
//!     Record::new(4, "USA", "failed", 2_000_000.0),
//! ]);
//!
//! let envelope = encode(&paginate(&ds, 3)?)?;
//! let flags: Vec<bool> = envelope.pages.iter().map(|p| p.next_page).collect();
//! assert_eq!(flags, vec![true, false]);
//! assert_eq!(decode(envelope)?, ds);
//! # Ok::<(), txn_pipeline::PipelineError>(())
//! ```
//!
//! ## Full run
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use txn_pipeline::observability::StdErrObserver;
//! use txn_pipeline::pipeline::{run, PipelineOptions};
//! use txn_pipeline::sink::LocalFileSink;
//!
//! # fn main() -> Result<(), txn_pipeline::PipelineError> {
//! let opts = PipelineOptions {
//!     observer: Some(Arc::new(StdErrObserver)),
//!     ..Default::default()
//! };
//! let summary = run(&opts, &LocalFileSink::new("final_dataset.csv"))?;
//! println!("{}", summary.receipt);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: record, dataset and page types
//! - [`transport`]: pagination, envelope encode/decode, persistence
//! - [`processing`]: fuzzy correction, cleaning, aggregation
//! - [`generate`]: synthetic data
//! - [`sink`]: report storage backends
//! - [`pipeline`]: end-to-end driver
//! - [`observability`]: observer hooks
//! - [`error`]: error type shared by every stage

pub mod error;
pub mod generate;
pub mod observability;
pub mod pipeline;
pub mod processing;
pub mod sink;
pub mod transport;
pub mod types;

pub use error::{PipelineError, PipelineResult};
