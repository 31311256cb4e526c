//! Synthetic transaction generator.
//!
//! Produces the dataset the pipeline transports and cleans. Countries and statuses are drawn
//! from weighted tables that deliberately include data-entry typos, so the cleaning stage has
//! something to repair.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{PipelineError, PipelineResult};
use crate::types::{Dataset, Record};

/// Country values and their sampling weights.
pub const COUNTRY_WEIGHTS: [(&str, f64); 12] = [
    ("Spain", 0.45),
    ("Germany", 0.05),
    ("Italy", 0.1),
    ("USA", 0.1),
    ("China", 0.05),
    ("Belgium", 0.05),
    ("Sopain", 0.05),
    ("Germqany", 0.05),
    ("Itakly", 0.025),
    ("United States of America", 0.025),
    ("Cvhina", 0.025),
    ("Belguiun", 0.025),
];

/// Status values and their sampling weights.
pub const STATUS_WEIGHTS: [(&str, f64); 9] = [
    ("pending", 0.4),
    ("completed", 0.3),
    ("failed", 0.1),
    ("pendhing", 0.025),
    ("pwnding", 0.05),
    ("compoletd", 0.025),
    ("complete", 0.025),
    ("fialed", 0.05),
    ("faoleid", 0.025),
];

/// Inclusive lower bound of generated amounts.
pub const MIN_AMOUNT: f64 = 50.0;
/// Exclusive upper bound of generated amounts.
pub const MAX_AMOUNT: f64 = 5000.0;

/// Options controlling [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Number of records; ids run from 1 to `rows`.
    pub rows: usize,
    /// RNG seed. `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            rows: 50_000,
            seed: None,
        }
    }
}

/// Generate a synthetic dataset.
pub fn generate(options: &GeneratorOptions) -> PipelineResult<Dataset> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let countries = weighted_index(&COUNTRY_WEIGHTS)?;
    let statuses = weighted_index(&STATUS_WEIGHTS)?;

    let records = (1..=options.rows as u64)
        .map(|id| {
            let country = COUNTRY_WEIGHTS[countries.sample(&mut rng)].0;
            let status = STATUS_WEIGHTS[statuses.sample(&mut rng)].0;
            let amount = rng.random_range(MIN_AMOUNT..MAX_AMOUNT);
            Record::new(id, country, status, amount)
        })
        .collect();

    Ok(Dataset::new(records))
}

fn weighted_index(table: &[(&str, f64)]) -> PipelineResult<WeightedIndex<f64>> {
    WeightedIndex::new(table.iter().map(|(_, w)| *w)).map_err(|e| PipelineError::InvalidConfiguration {
        message: format!("invalid sampling weights: {e}"),
    })
}
