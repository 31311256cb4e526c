//! Report sinks.
//!
//! A sink stores the final [`AggregationReport`] exactly once per run. The pipeline only depends on
//! the [`ReportSink`] trait; [`build_sink`] maps an [`OutputType`] to a concrete backend:
//!
//! - [`LocalFileSink`]: a CSV file on local disk
//! - [`ObjectStoreSink`]: a filesystem-backed object store (`<root>/<bucket>/<key>`)
//! - `SqliteSink`: a table in a SQLite database (feature-gated behind `sqlite`)

mod local;
mod object_store;
#[cfg(feature = "sqlite")]
mod sqlite;

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::error::{PipelineError, PipelineResult};
use crate::processing::AggregationReport;

pub use local::LocalFileSink;
pub use object_store::ObjectStoreSink;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSink;

/// Where a sink put the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkReceipt {
    /// Sink name (see [`ReportSink::name`]).
    pub sink: &'static str,
    /// Human-readable location of the stored report.
    pub location: String,
    /// Number of report rows stored.
    pub rows: usize,
}

impl fmt::Display for SinkReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows stored via {} at {}", self.rows, self.sink, self.location)
    }
}

/// Backend-agnostic report storage.
pub trait ReportSink {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Store the report.
    fn store(&self, report: &AggregationReport) -> PipelineResult<SinkReceipt>;
}

/// Output sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputType {
    /// CSV file on local disk.
    Local,
    /// Filesystem-backed object store.
    #[value(name = "object-store", alias = "s3")]
    ObjectStore,
    /// Relational database table.
    #[value(alias = "pg")]
    Database,
}

/// Destinations for every sink type; only the selected one is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkOptions {
    /// Local CSV output path.
    pub output_path: PathBuf,
    /// Object store root directory.
    pub object_root: PathBuf,
    /// Object store bucket.
    pub bucket: String,
    /// Object key inside the bucket.
    pub object_key: String,
    /// SQLite database path.
    pub database_path: PathBuf,
    /// Table receiving report rows.
    pub table: String,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("final_dataset.csv"),
            object_root: PathBuf::from("object-store"),
            bucket: "transactions".to_string(),
            object_key: "reports/final_dataset.csv".to_string(),
            database_path: PathBuf::from("transactions.db"),
            table: "transactions_report".to_string(),
        }
    }
}

/// Build the sink selected by `output_type`.
pub fn build_sink(output_type: OutputType, options: &SinkOptions) -> PipelineResult<Box<dyn ReportSink>> {
    match output_type {
        OutputType::Local => Ok(Box::new(LocalFileSink::new(&options.output_path))),
        OutputType::ObjectStore => Ok(Box::new(ObjectStoreSink::new(
            &options.object_root,
            options.bucket.clone(),
            options.object_key.clone(),
        )?)),
        OutputType::Database => build_database_sink(options),
    }
}

fn build_database_sink(options: &SinkOptions) -> PipelineResult<Box<dyn ReportSink>> {
    #[cfg(feature = "sqlite")]
    {
        Ok(Box::new(SqliteSink::new(&options.database_path, options.table.clone())?))
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = options;
        Err(PipelineError::Sink {
            sink: "database".to_string(),
            message: "database sink not enabled (enable cargo feature 'sqlite')".to_string(),
        })
    }
}

pub(crate) fn sink_error(sink: &str, message: impl Into<String>) -> PipelineError {
    PipelineError::Sink {
        sink: sink.to_string(),
        message: message.into(),
    }
}
