use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::PipelineResult;
use crate::processing::AggregationReport;
use crate::transport::store::write_atomic;

use super::{sink_error, ReportSink, SinkReceipt};

/// Stores the report as an object in a filesystem-backed bucket layout.
///
/// The object for `bucket`/`key` lives at `<root>/<bucket>/<key>`; `/` in the key creates
/// nested prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectStoreSink {
    root: PathBuf,
    bucket: String,
    key: String,
}

impl ObjectStoreSink {
    /// Create a sink after validating the bucket name and object key.
    ///
    /// Buckets must be non-empty lowercase ASCII letters, digits, `-` or `.`. Keys must be
    /// relative and may not contain `..` segments.
    pub fn new(root: impl AsRef<Path>, bucket: impl Into<String>, key: impl Into<String>) -> PipelineResult<Self> {
        let bucket = bucket.into();
        let key = key.into();

        let bucket_ok = !bucket.is_empty()
            && bucket
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
        if !bucket_ok {
            return Err(sink_error("object-store", format!("invalid bucket name '{bucket}'")));
        }

        let key_ok = !key.is_empty()
            && Path::new(&key)
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !key_ok {
            return Err(sink_error("object-store", format!("invalid object key '{key}'")));
        }

        Ok(Self {
            root: root.as_ref().to_path_buf(),
            bucket,
            key,
        })
    }

    /// Filesystem path of the stored object.
    pub fn object_path(&self) -> PathBuf {
        self.root.join(&self.bucket).join(&self.key)
    }
}

impl ReportSink for ObjectStoreSink {
    fn name(&self) -> &'static str {
        "object-store"
    }

    fn store(&self, report: &AggregationReport) -> PipelineResult<SinkReceipt> {
        let path = self.object_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_atomic(&path, report.to_csv_string()?.as_bytes())?;
        Ok(SinkReceipt {
            sink: self.name(),
            location: format!("{}/{}", self.bucket, self.key),
            rows: report.len(),
        })
    }
}
