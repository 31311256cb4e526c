//! Per-country summary statistics.
//!
//! Each statistic is computed as an independent country-keyed series, then the series are joined
//! by key into one [`ReportRow`] per country. Series are never zipped by position.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{Dataset, Record};

use super::cleaning::{STATUS_COMPLETED, STATUS_FAILED, STATUS_PENDING};

/// Amount above which a failed transaction counts as critical.
pub const DEFAULT_CRITICAL_AMOUNT: f64 = 1_000_000.0;

/// Which countries get a row in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportIndex {
    /// Every country that appears in any series (i.e. every country in the dataset).
    #[default]
    AllCountries,
    /// Only countries with at least one pending record.
    PendingOnly,
}

/// Options controlling aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationOptions {
    /// Row-set policy.
    pub index: ReportIndex,
    /// Strict lower bound for critical failed amounts.
    pub critical_amount: f64,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            index: ReportIndex::default(),
            critical_amount: DEFAULT_CRITICAL_AMOUNT,
        }
    }
}

/// The independently grouped series the report is assembled from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedSeries {
    /// Records per country (denominator for the rates).
    pub group_sizes: BTreeMap<String, usize>,
    /// Mean pending amount, only for countries with pending records.
    pub average_outstanding: BTreeMap<String, f64>,
    /// Sum of completed amounts, only for countries with completed records.
    pub total_completed: BTreeMap<String, f64>,
    /// Failed record count, only for countries with failures.
    pub failed: BTreeMap<String, usize>,
    /// Critical failed record count, only for countries with critical failures.
    pub critical: BTreeMap<String, usize>,
}

/// One row of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub country: String,
    /// `None` when the country has no pending records.
    pub average_outstanding: Option<f64>,
    pub total_completed: f64,
    pub critical_rate: f64,
    /// `None` only when the group is empty.
    pub error_rate: Option<f64>,
}

/// Country-ordered aggregation report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationReport {
    rows: Vec<ReportRow>,
}

impl AggregationReport {
    /// Rows ordered by country name.
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Look up a row by country.
    pub fn row(&self, country: &str) -> Option<&ReportRow> {
        self.rows
            .binary_search_by(|r| r.country.as_str().cmp(country))
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// Countries in report order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.country.as_str())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the report has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the report as CSV with columns
    /// `country,average_outstanding,total_completed,critical_rate,error_rate`.
    ///
    /// Missing values are written as empty cells.
    pub fn write_csv<W: Write>(&self, writer: W) -> PipelineResult<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(REPORT_COLUMNS)?;
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Render the report as CSV text.
    pub fn to_csv_string(&self) -> PipelineResult<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| PipelineError::Io(std::io::Error::other(e)))
    }
}

/// Report column names, in output order.
pub const REPORT_COLUMNS: [&str; 5] = [
    "country",
    "average_outstanding",
    "total_completed",
    "critical_rate",
    "error_rate",
];

/// Aggregate a cleaned dataset into a report.
pub fn aggregate(dataset: &Dataset, options: &AggregationOptions) -> PipelineResult<AggregationReport> {
    let series = compute_series(dataset, options);
    assemble(&series, options.index)
}

/// Compute every grouped series for `dataset`.
pub fn compute_series(dataset: &Dataset, options: &AggregationOptions) -> GroupedSeries {
    let group_sizes = group_by_country(dataset.iter(), 0usize, |n, _| *n += 1);

    let pending = dataset.filter_records(|r| r.status == STATUS_PENDING);
    let average_outstanding = group_by_country(pending.iter(), (0.0f64, 0usize), |(sum, n), r| {
        *sum += r.amount;
        *n += 1;
    })
    .into_iter()
    .map(|(country, (sum, n))| (country, sum / n as f64))
    .collect();

    let total_completed = group_by_country(
        dataset.iter().filter(|r| r.status == STATUS_COMPLETED),
        0.0f64,
        |sum, r| *sum += r.amount,
    );

    let failed = group_by_country(
        dataset.iter().filter(|r| r.status == STATUS_FAILED),
        0usize,
        |n, _| *n += 1,
    );

    let critical_amount = options.critical_amount;
    let critical = group_by_country(
        dataset
            .iter()
            .filter(|r| r.status == STATUS_FAILED && r.amount > critical_amount),
        0usize,
        |n, _| *n += 1,
    );

    GroupedSeries {
        group_sizes,
        average_outstanding,
        total_completed,
        failed,
        critical,
    }
}

/// Join grouped series by country key into a report.
///
/// Returns [`PipelineError::AggregationInconsistency`] if a derived series names a country that
/// has no group size.
pub fn assemble(series: &GroupedSeries, index: ReportIndex) -> PipelineResult<AggregationReport> {
    check_keys("average_outstanding", series.average_outstanding.keys(), &series.group_sizes)?;
    check_keys("total_completed", series.total_completed.keys(), &series.group_sizes)?;
    check_keys("failed", series.failed.keys(), &series.group_sizes)?;
    check_keys("critical", series.critical.keys(), &series.group_sizes)?;

    let countries: BTreeSet<&String> = match index {
        ReportIndex::AllCountries => series
            .group_sizes
            .keys()
            .chain(series.average_outstanding.keys())
            .chain(series.total_completed.keys())
            .chain(series.failed.keys())
            .chain(series.critical.keys())
            .collect(),
        ReportIndex::PendingOnly => series.average_outstanding.keys().collect(),
    };

    let rows = countries
        .into_iter()
        .map(|country| {
            let size = series.group_sizes.get(country).copied().unwrap_or(0);
            let ratio = |count: Option<&usize>| -> Option<f64> {
                (size > 0).then(|| count.copied().unwrap_or(0) as f64 / size as f64)
            };
            ReportRow {
                country: country.clone(),
                average_outstanding: series.average_outstanding.get(country).copied(),
                total_completed: series.total_completed.get(country).copied().unwrap_or(0.0),
                critical_rate: ratio(series.critical.get(country)).unwrap_or(0.0),
                error_rate: ratio(series.failed.get(country)),
            }
        })
        .collect();

    Ok(AggregationReport { rows })
}

fn group_by_country<'a, I, A, F>(records: I, init: A, mut fold: F) -> BTreeMap<String, A>
where
    I: Iterator<Item = &'a Record>,
    A: Clone,
    F: FnMut(&mut A, &Record),
{
    let mut groups: BTreeMap<String, A> = BTreeMap::new();
    for r in records {
        let acc = groups
            .entry(r.country.clone())
            .or_insert_with(|| init.clone());
        fold(acc, r);
    }
    groups
}

fn check_keys<'a, V>(
    name: &str,
    keys: impl Iterator<Item = &'a String>,
    group_sizes: &BTreeMap<String, V>,
) -> PipelineResult<()> {
    let orphans: Vec<&String> = keys.filter(|k| !group_sizes.contains_key(*k)).collect();
    if orphans.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::AggregationInconsistency {
            message: format!("series '{name}' has countries without a group size: {orphans:?}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{aggregate, assemble, AggregationOptions, GroupedSeries, ReportIndex};
    use crate::error::PipelineError;
    use crate::types::{Dataset, Record};

    fn fixture() -> Dataset {
        Dataset::new(vec![
            Record::new(1, "Spain", "pending", 100.0),
            Record::new(2, "Spain", "completed", 200.0),
            Record::new(3, "Spain", "failed", 50.0),
            Record::new(4, "USA", "failed", 2_000_000.0),
        ])
    }

    #[test]
    fn fixture_statistics() {
        let report = aggregate(&fixture(), &AggregationOptions::default()).unwrap();

        let spain = report.row("Spain").unwrap();
        assert_eq!(spain.average_outstanding, Some(100.0));
        assert_eq!(spain.total_completed, 200.0);
        assert_eq!(spain.error_rate, Some(1.0 / 3.0));
        assert_eq!(spain.critical_rate, 0.0);

        let usa = report.row("USA").unwrap();
        assert_eq!(usa.critical_rate, 1.0);
        assert_eq!(usa.error_rate, Some(1.0));
        assert_eq!(usa.average_outstanding, None);
        assert_eq!(usa.total_completed, 0.0);
    }

    #[test]
    fn rows_are_ordered_by_country() {
        let mut ds = fixture();
        ds.records.push(Record::new(5, "Belgium", "pending", 10.0));
        let report = aggregate(&ds, &AggregationOptions::default()).unwrap();
        assert_eq!(report.countries().collect::<Vec<_>>(), vec!["Belgium", "Spain", "USA"]);
    }

    #[test]
    fn pending_only_index_drops_countries_without_pending() {
        let opts = AggregationOptions {
            index: ReportIndex::PendingOnly,
            ..Default::default()
        };
        let report = aggregate(&fixture(), &opts).unwrap();
        assert_eq!(report.countries().collect::<Vec<_>>(), vec!["Spain"]);
        // Values still come from the keyed join, not from position.
        assert_eq!(report.rows()[0].total_completed, 200.0);
    }

    #[test]
    fn average_uses_only_pending_amounts() {
        let ds = Dataset::new(vec![
            Record::new(1, "Italy", "pending", 10.0),
            Record::new(2, "Italy", "pending", 30.0),
            Record::new(3, "Italy", "completed", 1000.0),
        ]);
        let report = aggregate(&ds, &AggregationOptions::default()).unwrap();
        let italy = report.row("Italy").unwrap();
        assert_eq!(italy.average_outstanding, Some(20.0));
        assert_eq!(italy.error_rate, Some(0.0));
    }

    #[test]
    fn critical_threshold_is_strict() {
        let ds = Dataset::new(vec![Record::new(1, "China", "failed", 1_000_000.0)]);
        let report = aggregate(&ds, &AggregationOptions::default()).unwrap();
        assert_eq!(report.row("China").unwrap().critical_rate, 0.0);
    }

    #[test]
    fn empty_dataset_gives_empty_report() {
        let report = aggregate(&Dataset::default(), &AggregationOptions::default()).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn orphan_series_key_is_inconsistent() {
        let mut series = GroupedSeries::default();
        series.group_sizes.insert("Spain".to_string(), 1);
        series.failed.insert("Atlantis".to_string(), 1);

        let err = assemble(&series, ReportIndex::AllCountries).unwrap_err();
        assert!(matches!(err, PipelineError::AggregationInconsistency { .. }));
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn csv_output_has_expected_columns_and_empty_cells() {
        let report = aggregate(&fixture(), &AggregationOptions::default()).unwrap();
        let text = report.to_csv_string().unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("country,average_outstanding,total_completed,critical_rate,error_rate")
        );
        assert_eq!(lines.next(), Some("Spain,100.0,200.0,0.0,0.3333333333333333"));
        assert_eq!(lines.next(), Some("USA,,0.0,1.0,1.0"));
        assert_eq!(lines.next(), None);
    }
}
