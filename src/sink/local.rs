use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineResult;
use crate::processing::AggregationReport;
use crate::transport::store::write_atomic;

use super::{ReportSink, SinkReceipt};

/// Writes the report as a CSV file on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileSink {
    path: PathBuf,
}

impl LocalFileSink {
    /// Create a sink writing to `path`. Parent directories are created on store.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for LocalFileSink {
    fn name(&self) -> &'static str {
        "local"
    }

    fn store(&self, report: &AggregationReport) -> PipelineResult<SinkReceipt> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        write_atomic(&self.path, report.to_csv_string()?.as_bytes())?;
        Ok(SinkReceipt {
            sink: self.name(),
            location: self.path.display().to_string(),
            rows: report.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::LocalFileSink;
    use crate::processing::{aggregate, AggregationOptions};
    use crate::sink::ReportSink;
    use crate::types::{Dataset, Record};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn writes_report_csv() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("txn-pipeline-local-{nanos}"));
        let sink = LocalFileSink::new(dir.join("out").join("final_dataset.csv"));

        let ds = Dataset::new(vec![Record::new(1, "Italy", "pending", 4.0)]);
        let report = aggregate(&ds, &AggregationOptions::default()).unwrap();
        let receipt = sink.store(&report).unwrap();

        assert_eq!(receipt.rows, 1);
        let text = std::fs::read_to_string(sink.path()).unwrap();
        assert!(text.starts_with("country,average_outstanding,total_completed,critical_rate,error_rate\n"));
        assert!(text.contains("Italy,4.0,0.0,0.0,0.0"));

        let _ = std::fs::remove_dir_all(dir);
    }
}
