//! Paginated envelope transport.
//!
//! The round-trip protocol is:
//!
//! - [`paginate()`]: split a [`crate::types::Dataset`] into fixed-size pages
//! - [`encode()`]: serialize each page to CSV, base64 it, and wrap it in an [`Envelope`]
//! - [`store`]: persist page artifacts and the envelope, and read the envelope back
//! - [`decode()`]: reassemble the dataset, honoring each page's continuation flag
//!
//! ```rust
//! use txn_pipeline::transport::{decode, encode, paginate};
//! use txn_pipeline::types::{Dataset, Record};
//!
//! let ds = Dataset::new(vec![
//!     Record::new(1, "Spain", "pending", 100.0),
//!     Record::new(2, "Sopain", "compoletd", 250.5),
//!     Record::new(3, "USA", "failed", 75.0),
//! ]);
//!
//! let envelope = encode(&paginate(&ds, 2)?)?;
//! assert_eq!(envelope.page_count(), 2);
//! assert_eq!(decode(envelope)?, ds);
//! # Ok::<(), txn_pipeline::PipelineError>(())
//! ```

pub mod csv;
pub mod decode;
pub mod encode;
pub mod envelope;
pub mod paginate;
pub mod store;

pub use decode::{decode, decode_str};
pub use encode::encode;
pub use envelope::{Envelope, PageRecord};
pub use paginate::{page_count, paginate};
pub use store::{read_dataset, read_envelope, write_envelope, write_page_artifacts};
