// Kruskal-Wallis H test across all algorithm groups
//
// Rank-based counterpart of the one-way ANOVA: pooled midranks replace the raw
// values, so heavy tails and outliers in episode rewards do not dominate.
//
// H  = 12 / (n(n+1)) · Σ R_i² / n_i − 3(n+1)
// H' = H / (1 − Σ(t³ − t) / (n³ − n))      (tie correction, always applied)
// p  = P(χ²(k − 1) > H')

use crate::comparison::distribution::chi_squared_survival;
use crate::comparison::effect_size::SignificanceTier;
use crate::comparison::error::{validate_group, ComparisonError, Result};
use crate::comparison::mann_whitney::{midranks, tie_term};
use crate::comparison::{SampleGroup, SIGNIFICANCE_LEVEL};
use serde::{Deserialize, Serialize};

/// Result of a Kruskal-Wallis H test over k groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KruskalWallisResult {
    /// Tie-corrected H statistic
    pub h_statistic: f64,
    pub df: usize,
    pub p_value: f64,
    /// p_value < 0.05
    pub significant: bool,
    /// Mean pooled rank of each group, in input order
    pub mean_ranks: Vec<f64>,
    pub tier: SignificanceTier,
}

/// Kruskal-Wallis H test
///
/// # Errors
/// - `InvalidInput` for fewer than 2 groups, an empty group, or a
///   non-finite observation
/// - `DegenerateVariance` when every pooled observation is tied
///
/// # Example
/// ```
/// use rl_compare::comparison::{kruskal_wallis_test, SampleGroup};
///
/// let groups = vec![
///     SampleGroup::new("dqn", vec![1.0, 2.0]),
///     SampleGroup::new("ppo", vec![3.0, 4.0]),
///     SampleGroup::new("sac", vec![5.0, 6.0]),
/// ];
///
/// let result = kruskal_wallis_test(&groups).unwrap();
/// assert_eq!(result.df, 2);
/// assert!((result.h_statistic - 32.0 / 7.0).abs() < 1e-12);
/// ```
pub fn kruskal_wallis_test(groups: &[SampleGroup]) -> Result<KruskalWallisResult> {
    let k = groups.len();
    if k < 2 {
        return Err(ComparisonError::InvalidInput(format!(
            "Kruskal-Wallis requires at least 2 groups, got {}",
            k
        )));
    }

    for group in groups {
        validate_group(&group.name, &group.values)?;
    }

    let pooled: Vec<f64> = groups
        .iter()
        .flat_map(|g| g.values.iter().copied())
        .collect();
    let n = pooled.len() as f64;

    let tie_factor = 1.0 - tie_term(&pooled) / (n * n * n - n);
    if tie_factor <= 0.0 {
        return Err(ComparisonError::DegenerateVariance(format!(
            "all {} observations across {} groups are tied; ranks carry no information",
            pooled.len(),
            k
        )));
    }

    let ranks = midranks(&pooled);
    let mut mean_ranks = Vec::with_capacity(k);
    let mut weighted = 0.0;
    let mut offset = 0;
    for group in groups {
        let rank_sum: f64 = ranks[offset..offset + group.len()].iter().sum();
        let n_i = group.len() as f64;
        weighted += rank_sum * rank_sum / n_i;
        mean_ranks.push(rank_sum / n_i);
        offset += group.len();
    }

    // Rounding can push an all-equal-mean-rank H a hair below zero
    let h_raw = (12.0 * weighted / (n * (n + 1.0)) - 3.0 * (n + 1.0)).max(0.0);
    let h_statistic = h_raw / tie_factor;

    let df = k - 1;
    let p_value = chi_squared_survival(h_statistic, df)?;

    tracing::debug!(
        "Kruskal-Wallis: k={} n={} H={:.4} p={:.4}",
        k,
        pooled.len(),
        h_statistic,
        p_value
    );

    Ok(KruskalWallisResult {
        h_statistic,
        df,
        p_value,
        significant: p_value < SIGNIFICANCE_LEVEL,
        mean_ranks,
        tier: SignificanceTier::from_p_value(p_value),
    })
}
