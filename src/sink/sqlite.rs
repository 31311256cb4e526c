use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use crate::error::PipelineResult;
use crate::processing::AggregationReport;

use super::{sink_error, ReportSink, SinkReceipt};

/// Replaces the contents of a report table in a SQLite database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteSink {
    path: PathBuf,
    table: String,
}

impl SqliteSink {
    /// Create a sink for `table` in the database at `path`.
    ///
    /// The table name must be a plain identifier (ASCII letters, digits, `_`; not starting with
    /// a digit) since it is interpolated into SQL.
    pub fn new(path: impl AsRef<Path>, table: impl Into<String>) -> PipelineResult<Self> {
        let table = table.into();
        let valid = table
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(sink_error("database", format!("invalid table name '{table}'")));
        }
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            table,
        })
    }

    /// Table receiving report rows.
    pub fn table(&self) -> &str {
        &self.table
    }

    fn write(&self, conn: &mut Connection, report: &AggregationReport) -> PipelineResult<()> {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                country TEXT PRIMARY KEY NOT NULL,
                average_outstanding REAL,
                total_completed REAL NOT NULL,
                critical_rate REAL NOT NULL,
                error_rate REAL
            );",
            table = self.table
        ))?;

        let tx = conn.transaction()?;
        tx.execute(&format!("DELETE FROM {}", self.table), [])?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {}
                 (country, average_outstanding, total_completed, critical_rate, error_rate)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                self.table
            ))?;
            for row in report.rows() {
                stmt.execute(params![
                    row.country,
                    row.average_outstanding,
                    row.total_completed,
                    row.critical_rate,
                    row.error_rate,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

impl ReportSink for SqliteSink {
    fn name(&self) -> &'static str {
        "database"
    }

    fn store(&self, report: &AggregationReport) -> PipelineResult<SinkReceipt> {
        let mut conn = Connection::open(&self.path)?;
        self.write(&mut conn, report)?;
        Ok(SinkReceipt {
            sink: self.name(),
            location: format!("{}#{}", self.path.display(), self.table),
            rows: report.len(),
        })
    }
}
