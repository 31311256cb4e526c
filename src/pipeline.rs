//! End-to-end pipeline driver.
//!
//! [`run`] executes, in order:
//!
//! generate → paginate → encode → persist (page artifacts + envelope) → read envelope → decode
//! and validate ids → clean → aggregate → store
//!
//! Each stage is reported to the configured [`PipelineObserver`]; the first failure aborts the run
//! and is returned unchanged.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::PipelineResult;
use crate::generate::{generate, GeneratorOptions};
use crate::observability::{PipelineObserver, PipelineSeverity, PipelineStage, StageStats};
use crate::processing::{aggregate, clean, AggregationOptions, AggregationReport, CleaningRules};
use crate::sink::{ReportSink, SinkReceipt};
use crate::transport::{
    encode, paginate, read_dataset, write_envelope, write_page_artifacts, Envelope,
};
use crate::types::Dataset;

/// Options controlling a pipeline run.
///
/// Use [`Default`] for the standard 50,000-row, 1,000-rows-per-page run.
#[derive(Clone)]
pub struct PipelineOptions {
    /// Synthetic dataset options.
    pub generator: GeneratorOptions,
    /// Records per page.
    pub page_size: usize,
    /// Directory receiving per-page CSV artifacts.
    pub dataset_dir: PathBuf,
    /// File stem of page artifacts (`<stem>_page<n>.csv`).
    pub artifact_stem: String,
    /// Envelope JSON path.
    pub envelope_path: PathBuf,
    /// Alias table and vocabularies.
    pub cleaning: CleaningRules,
    /// Aggregation options.
    pub aggregation: AggregationOptions,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: PipelineSeverity,
}

impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("generator", &self.generator)
            .field("page_size", &self.page_size)
            .field("dataset_dir", &self.dataset_dir)
            .field("artifact_stem", &self.artifact_stem)
            .field("envelope_path", &self.envelope_path)
            .field("cleaning", &self.cleaning)
            .field("aggregation", &self.aggregation)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            generator: GeneratorOptions::default(),
            page_size: 1_000,
            dataset_dir: PathBuf::from("dataset"),
            artifact_stem: "transactions".to_string(),
            envelope_path: PathBuf::from("transactions.json"),
            cleaning: CleaningRules::default(),
            aggregation: AggregationOptions::default(),
            observer: None,
            alert_at_or_above: PipelineSeverity::Critical,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    /// Records generated.
    pub rows_generated: usize,
    /// Pages written to the envelope.
    pub pages: usize,
    /// Records recovered from the envelope.
    pub rows_decoded: usize,
    /// The aggregation report that was stored.
    pub report: AggregationReport,
    /// Where the sink stored it.
    pub receipt: SinkReceipt,
    /// Total wall-clock time.
    pub elapsed: Duration,
}

/// Run the full pipeline and store the report through `sink`.
pub fn run(options: &PipelineOptions, sink: &dyn ReportSink) -> PipelineResult<PipelineSummary> {
    let started = Instant::now();
    let stages = StageRunner { options };

    let dataset = stages.run(
        PipelineStage::Generate,
        || generate(&options.generator),
        |d: &Dataset| d.row_count(),
    )?;
    let pages = stages.run(
        PipelineStage::Paginate,
        || paginate(&dataset, options.page_size),
        Vec::len,
    )?;
    let envelope = stages.run(
        PipelineStage::Encode,
        || encode(&pages),
        |e: &Envelope| e.page_count(),
    )?;
    stages.run(
        PipelineStage::Persist,
        || {
            write_page_artifacts(&pages, &options.dataset_dir, &options.artifact_stem)?;
            write_envelope(&envelope, &options.envelope_path)
        },
        |_: &()| pages.len(),
    )?;
    drop(envelope);

    let decoded = stages.run(
        PipelineStage::Decode,
        || read_dataset(&options.envelope_path),
        |d: &Dataset| d.row_count(),
    )?;
    let cleaned = stages.run(
        PipelineStage::Clean,
        || Ok(clean(&decoded, &options.cleaning)),
        |d: &Dataset| d.row_count(),
    )?;
    let report = stages.run(
        PipelineStage::Aggregate,
        || aggregate(&cleaned, &options.aggregation),
        |r: &AggregationReport| r.len(),
    )?;
    let receipt = stages.run(
        PipelineStage::Store,
        || sink.store(&report),
        |r: &SinkReceipt| r.rows,
    )?;

    let elapsed = started.elapsed();
    if let Some(obs) = options.observer.as_ref() {
        obs.on_success(elapsed);
    }

    Ok(PipelineSummary {
        rows_generated: dataset.row_count(),
        pages: pages.len(),
        rows_decoded: decoded.row_count(),
        report,
        receipt,
        elapsed,
    })
}

struct StageRunner<'a> {
    options: &'a PipelineOptions,
}

impl StageRunner<'_> {
    fn run<T>(
        &self,
        stage: PipelineStage,
        f: impl FnOnce() -> PipelineResult<T>,
        count: impl FnOnce(&T) -> usize,
    ) -> PipelineResult<T> {
        let start = Instant::now();
        let result = f();

        if let Some(obs) = self.options.observer.as_ref() {
            match &result {
                Ok(v) => obs.on_stage(
                    stage,
                    StageStats {
                        items: count(v),
                        elapsed: start.elapsed(),
                    },
                ),
                Err(e) => {
                    let sev = PipelineSeverity::for_error(e);
                    obs.on_failure(stage, sev, e);
                    if sev >= self.options.alert_at_or_above {
                        obs.on_alert(stage, sev, e);
                    }
                }
            }
        }

        result
    }
}
