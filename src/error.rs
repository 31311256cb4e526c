use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type returned by pagination, envelope transport, aggregation and report sinks.
///
/// Fuzzy correction never fails and therefore has no variant here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Underlying I/O error (e.g. envelope file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading/writing error outside of page parsing (page artifacts, report output).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The envelope document is not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "sqlite")]
    /// SQLite report sink error (feature-gated behind `sqlite`).
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A configuration value is out of range (e.g. `page_size == 0`).
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// The envelope is structurally incomplete (missing `pages`, missing `csv_data`).
    #[error("malformed envelope: page {page_number}: {message}")]
    MalformedEnvelope { page_number: u32, message: String },

    /// A page's `csv_data` is not valid base64 or does not decode to UTF-8.
    #[error("failed to decode page {page_number}: {message}")]
    DecodeError { page_number: u32, message: String },

    /// A page's decoded text is not a CSV table with the expected header and row shape.
    #[error("failed to parse page {page_number} at row {row}: {message}")]
    ParseError {
        page_number: u32,
        row: usize,
        message: String,
    },

    /// Derived aggregation series disagree on their group keys.
    #[error("aggregation inconsistency: {message}")]
    AggregationInconsistency { message: String },

    /// A report sink could not be used (e.g. disabled backend, bad destination).
    #[error("sink '{sink}' failed: {message}")]
    Sink { sink: String, message: String },
}
