//! Data-entry repair for `country` and `status`.
//!
//! Cleaning runs in two steps per record:
//!
//! 1. literal aliases are replaced on `country` (e.g. `United States of America` → `USA`)
//! 2. `country` and `status` are fuzzy-corrected against their canonical vocabularies

use crate::types::{Dataset, Record};

use super::fuzzy::{FuzzyCorrector, DEFAULT_THRESHOLD};

/// Canonical countries, in tie-break order.
pub const CANONICAL_COUNTRIES: [&str; 6] = ["Spain", "China", "USA", "Italy", "Belgium", "Germany"];

/// Canonical statuses, in tie-break order.
pub const CANONICAL_STATUSES: [&str; 3] = ["pending", "failed", "completed"];

/// Status of a transaction still awaiting settlement.
pub const STATUS_PENDING: &str = "pending";
/// Status of a settled transaction.
pub const STATUS_COMPLETED: &str = "completed";
/// Status of a rejected transaction.
pub const STATUS_FAILED: &str = "failed";

/// Immutable cleaning configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningRules {
    /// Exact `country` replacements applied before fuzzy correction, in order.
    pub country_aliases: Vec<(String, String)>,
    /// Corrector for `country`.
    pub countries: FuzzyCorrector,
    /// Corrector for `status`.
    pub statuses: FuzzyCorrector,
}

impl CleaningRules {
    /// Canonical vocabularies with a custom similarity threshold.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            country_aliases: vec![("United States of America".to_string(), "USA".to_string())],
            countries: FuzzyCorrector::new(CANONICAL_COUNTRIES, threshold),
            statuses: FuzzyCorrector::new(CANONICAL_STATUSES, threshold),
        }
    }

    /// Apply the alias table to a country value.
    pub fn resolve_alias<'a>(&'a self, country: &'a str) -> &'a str {
        self.country_aliases
            .iter()
            .find(|(from, _)| from == country)
            .map_or(country, |(_, to)| to.as_str())
    }

    /// Clean a single record.
    pub fn clean_record(&self, record: &Record) -> Record {
        let country = self.resolve_alias(&record.country);
        Record {
            id: record.id,
            country: self.countries.correct(country),
            status: self.statuses.correct(&record.status),
            amount: record.amount,
        }
    }
}

impl Default for CleaningRules {
    fn default() -> Self {
        Self::with_threshold(DEFAULT_THRESHOLD)
    }
}

/// Returns a new dataset with every record cleaned by `rules`. Order is preserved.
pub fn clean(dataset: &Dataset, rules: &CleaningRules) -> Dataset {
    dataset.map_records(|r| rules.clean_record(r))
}

#[cfg(test)]
mod tests {
    use super::{clean, CleaningRules, CANONICAL_COUNTRIES, CANONICAL_STATUSES};
    use crate::types::{Dataset, Record};

    #[test]
    fn alias_is_applied_before_correction() {
        let rules = CleaningRules::default();
        let out = rules.clean_record(&Record::new(1, "United States of America", "pending", 1.0));
        assert_eq!(out.country, "USA");
    }

    #[test]
    fn cleans_every_record_and_keeps_order() {
        let ds = Dataset::new(vec![
            Record::new(1, "Sopain", "pwnding", 10.0),
            Record::new(2, "Germqany", "fialed", 20.0),
            Record::new(3, "Belguiun", "compoletd", 30.0),
            Record::new(4, "Cvhina", "complete", 40.0),
        ]);
        let out = clean(&ds, &CleaningRules::default());

        let pairs: Vec<(&str, &str)> = out
            .iter()
            .map(|r| (r.country.as_str(), r.status.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Spain", "pending"),
                ("Germany", "failed"),
                ("Belgium", "completed"),
                ("China", "completed"),
            ]
        );
        let ids: Vec<u64> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn unknown_values_pass_through() {
        let out = CleaningRules::default().clean_record(&Record::new(9, "Atlantis", "refunded", 5.0));
        assert_eq!(out.country, "Atlantis");
        assert_eq!(out.status, "refunded");
    }

    #[test]
    fn cleaning_is_idempotent_on_canonical_values() {
        let rules = CleaningRules::default();
        for c in CANONICAL_COUNTRIES {
            for s in CANONICAL_STATUSES {
                let r = Record::new(1, c, s, 1.0);
                assert_eq!(rules.clean_record(&r), r);
            }
        }
    }
}
