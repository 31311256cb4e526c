use txn_pipeline::generate::{generate, GeneratorOptions, COUNTRY_WEIGHTS, STATUS_WEIGHTS};
use txn_pipeline::processing::cleaning::{CANONICAL_COUNTRIES, CANONICAL_STATUSES};
use txn_pipeline::processing::{aggregate, clean, correct, AggregationOptions, CleaningRules, ReportIndex};
use txn_pipeline::transport::decode_str;
use txn_pipeline::types::Record;

#[test]
fn fuzzy_examples() {
    let vocab = ["Spain", "USA", "Italy"];
    assert_eq!(correct("Sopain", &vocab, 0.7), "Spain");
    assert_eq!(correct("Xyzzy", &vocab, 0.7), "Xyzzy");
    assert_eq!(correct("Spain", &vocab, 0.7), "Spain");
}

#[test]
fn every_generated_variant_is_repaired() {
    let rules = CleaningRules::default();
    for (country, _) in COUNTRY_WEIGHTS {
        for (status, _) in STATUS_WEIGHTS {
            let out = rules.clean_record(&Record::new(1, country, status, 1.0));
            assert!(
                CANONICAL_COUNTRIES.contains(&out.country.as_str()),
                "country '{country}' cleaned to '{}'",
                out.country
            );
            assert!(
                CANONICAL_STATUSES.contains(&out.status.as_str()),
                "status '{status}' cleaned to '{}'",
                out.status
            );
        }
    }
}

#[test]
fn report_from_legacy_envelope() {
    let text = std::fs::read_to_string("tests/fixtures/legacy_complete.json").unwrap();
    let cleaned = clean(&decode_str(&text).unwrap(), &CleaningRules::default());
    let report = aggregate(&cleaned, &AggregationOptions::default()).unwrap();

    assert_eq!(report.countries().collect::<Vec<_>>(), vec!["Italy", "Spain", "USA"]);

    let spain = report.row("Spain").unwrap();
    assert_eq!(spain.average_outstanding, Some(100.0));
    assert_eq!(spain.total_completed, 200.0);
    assert_eq!(spain.error_rate, Some(1.0 / 3.0));
    assert_eq!(spain.critical_rate, 0.0);

    let usa = report.row("USA").unwrap();
    assert_eq!(usa.critical_rate, 1.0);
    assert_eq!(usa.average_outstanding, None);

    let italy = report.row("Italy").unwrap();
    assert_eq!(italy.average_outstanding, Some(75.5));
    assert_eq!(italy.error_rate, Some(0.0));
}

#[test]
fn pending_only_index_matches_pending_countries() {
    let text = std::fs::read_to_string("tests/fixtures/legacy_complete.json").unwrap();
    let cleaned = clean(&decode_str(&text).unwrap(), &CleaningRules::default());
    let opts = AggregationOptions {
        index: ReportIndex::PendingOnly,
        ..Default::default()
    };
    let report = aggregate(&cleaned, &opts).unwrap();
    assert_eq!(report.countries().collect::<Vec<_>>(), vec!["Italy", "Spain"]);
}

#[test]
fn cleaned_synthetic_data_reports_only_canonical_countries() {
    let ds = generate(&GeneratorOptions {
        rows: 5_000,
        seed: Some(11),
    })
    .unwrap();
    let cleaned = clean(&ds, &CleaningRules::default());
    let report = aggregate(&cleaned, &AggregationOptions::default()).unwrap();

    assert!(report.countries().all(|c| CANONICAL_COUNTRIES.contains(&c)));
    for row in report.rows() {
        let err = row.error_rate.unwrap();
        assert!((0.0..=1.0).contains(&err));
        // Generated amounts never exceed 5000.
        assert_eq!(row.critical_rate, 0.0);
    }
    let total_rows: usize = cleaned.row_count();
    assert_eq!(total_rows, 5_000);
}
