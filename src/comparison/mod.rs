// Statistical comparison of RL handover algorithms
//
// Given k named groups of performance samples (one per algorithm), this
// module runs:
// - a Mann-Whitney U rank test for every unordered pair (midranks for ties,
//   normal approximation with the Abramowitz-Stegun erf)
// - a one-way ANOVA across all groups (legacy bucketed or exact F p-value)
// - a Kruskal-Wallis H test as the rank-based k-group check
// and assembles the results into an immutable `ComparisonReport`.
//
// Everything here is a pure function of its inputs: no I/O, no shared state.
// Degenerate inputs raise `ComparisonError` instead of leaking NaN into a report.

mod anova;
mod config;
mod correction;
mod distribution;
mod effect_size;
mod error;
mod kruskal_wallis;
mod mann_whitney;
mod report;

pub use anova::{anova_test, bucketed_p_value, AnovaResult, PValueMode};
pub use config::ComparatorConfig;
pub use correction::{adjust_p_values, CorrectionMethod};
pub use distribution::{chi_squared_survival, erf, f_survival, normal_cdf, two_tailed_normal_p};
pub use effect_size::{cliff_delta, cohens_d, EffectMagnitude, SignificanceTier};
pub use error::{ComparisonError, Result};
pub use kruskal_wallis::{kruskal_wallis_test, KruskalWallisResult};
pub use mann_whitney::{midranks, pairwise_test, PairwiseTestResult};
pub use report::{
    compare, failure_message, ComparisonReport, GroupSummary, RankedAlgorithm,
    StatisticalComparator,
};

use serde::{Deserialize, Serialize};

/// Fixed α: `significant` is always `p_value < SIGNIFICANCE_LEVEL`
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Named collection of numeric observations for one algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleGroup {
    pub name: String,
    pub values: Vec<f64>,
}

impl SampleGroup {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
