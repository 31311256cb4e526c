//! Pipeline observer hooks.
//!
//! [`crate::pipeline::run`] reports every stage to an optional [`PipelineObserver`]. Observers can
//! record metrics, write logs, or trigger alerts when a failure meets a severity threshold.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::PipelineError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the run failed on bad data or configuration).
    Error,
    /// Critical error (I/O or storage backend failures).
    Critical,
}

impl PipelineSeverity {
    /// Severity of a pipeline failure.
    pub fn for_error(e: &PipelineError) -> Self {
        match e {
            PipelineError::Io(_) => Self::Critical,
            PipelineError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            #[cfg(feature = "sqlite")]
            PipelineError::Sqlite(_) => Self::Critical,
            PipelineError::Sink { .. } => Self::Critical,
            PipelineError::Json(_)
            | PipelineError::InvalidConfiguration { .. }
            | PipelineError::MalformedEnvelope { .. }
            | PipelineError::DecodeError { .. }
            | PipelineError::ParseError { .. }
            | PipelineError::AggregationInconsistency { .. } => Self::Error,
        }
    }
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Generate,
    Paginate,
    Encode,
    Persist,
    Decode,
    Clean,
    Aggregate,
    Store,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Generate => "generate",
            Self::Paginate => "paginate",
            Self::Encode => "encode",
            Self::Persist => "persist",
            Self::Decode => "decode",
            Self::Clean => "clean",
            Self::Aggregate => "aggregate",
            Self::Store => "store",
        };
        f.write_str(name)
    }
}

/// Stats reported when a stage finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageStats {
    /// Items produced by the stage (records, pages or report rows).
    pub items: usize,
    /// Wall-clock time spent in the stage.
    pub elapsed: Duration,
}

/// Observer interface for pipeline outcomes.
pub trait PipelineObserver: Send + Sync {
    /// Called when a stage succeeds.
    fn on_stage(&self, _stage: PipelineStage, _stats: StageStats) {}

    /// Called once when the whole run succeeds.
    fn on_success(&self, _elapsed: Duration) {}

    /// Called when a stage fails.
    fn on_failure(&self, _stage: PipelineStage, _severity: PipelineSeverity, _error: &PipelineError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, stage: PipelineStage, severity: PipelineSeverity, error: &PipelineError) {
        self.on_failure(stage, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_stage(&self, stage: PipelineStage, stats: StageStats) {
        for o in &self.observers {
            o.on_stage(stage, stats);
        }
    }

    fn on_success(&self, elapsed: Duration) {
        for o in &self.observers {
            o.on_success(elapsed);
        }
    }

    fn on_failure(&self, stage: PipelineStage, severity: PipelineSeverity, error: &PipelineError) {
        for o in &self.observers {
            o.on_failure(stage, severity, error);
        }
    }

    fn on_alert(&self, stage: PipelineStage, severity: PipelineSeverity, error: &PipelineError) {
        for o in &self.observers {
            o.on_alert(stage, severity, error);
        }
    }
}

/// Logs pipeline events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl PipelineObserver for StdErrObserver {
    fn on_stage(&self, stage: PipelineStage, stats: StageStats) {
        eprintln!(
            "[pipeline][ok] stage={stage} items={} elapsed={:?}",
            stats.items, stats.elapsed
        );
    }

    fn on_success(&self, elapsed: Duration) {
        eprintln!("[pipeline][done] elapsed={elapsed:?}");
    }

    fn on_failure(&self, stage: PipelineStage, severity: PipelineSeverity, error: &PipelineError) {
        eprintln!("[pipeline][{severity:?}] stage={stage} err={error}");
    }

    fn on_alert(&self, stage: PipelineStage, severity: PipelineSeverity, error: &PipelineError) {
        eprintln!("[ALERT][pipeline][{severity:?}] stage={stage} err={error}");
    }
}

/// Forwards pipeline events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_stage(&self, stage: PipelineStage, stats: StageStats) {
        tracing::info!(%stage, items = stats.items, elapsed = ?stats.elapsed, "stage finished");
    }

    fn on_success(&self, elapsed: Duration) {
        tracing::info!(?elapsed, "pipeline finished");
    }

    fn on_failure(&self, stage: PipelineStage, severity: PipelineSeverity, error: &PipelineError) {
        tracing::error!(%stage, ?severity, %error, "stage failed");
    }

    fn on_alert(&self, stage: PipelineStage, severity: PipelineSeverity, error: &PipelineError) {
        tracing::error!(%stage, ?severity, %error, alert = true, "stage failed");
    }
}

/// Appends pipeline events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_stage(&self, stage: PipelineStage, stats: StageStats) {
        self.append_line(&format!(
            "{} ok stage={stage} items={} elapsed_ms={}",
            unix_ts(),
            stats.items,
            stats.elapsed.as_millis()
        ));
    }

    fn on_success(&self, elapsed: Duration) {
        self.append_line(&format!("{} done elapsed_ms={}", unix_ts(), elapsed.as_millis()));
    }

    fn on_failure(&self, stage: PipelineStage, severity: PipelineSeverity, error: &PipelineError) {
        self.append_line(&format!(
            "{} fail severity={severity:?} stage={stage} err={error}",
            unix_ts()
        ));
    }

    fn on_alert(&self, stage: PipelineStage, severity: PipelineSeverity, error: &PipelineError) {
        self.append_line(&format!(
            "{} ALERT severity={severity:?} stage={stage} err={error}",
            unix_ts()
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
