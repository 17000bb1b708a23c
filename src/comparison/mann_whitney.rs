// Mann-Whitney U test with normal approximation
//
// Scientific Foundation:
// - Mann, H. B., & Whitney, D. R. (1947). On a test of whether one of two
//   random variables is stochastically larger than the other.
// - Tied observations receive midranks so the rank sum stays n(n+1)/2.
// - The p-value uses the normal approximation of U with the baseline
//   (tie-free) variance unless tie correction is requested.

use crate::comparison::distribution::two_tailed_normal_p;
use crate::comparison::effect_size::{cliff_delta, cohens_d, EffectMagnitude, SignificanceTier};
use crate::comparison::error::{validate_group, ComparisonError, Result};
use crate::comparison::{SampleGroup, SIGNIFICANCE_LEVEL};
use serde::{Deserialize, Serialize};

/// Result of a two-sample rank test between groups A and B
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseTestResult {
    pub group_a: String,
    pub group_b: String,
    pub n_a: usize,
    pub n_b: usize,

    /// Sum of midranks of group A in the pooled ranking
    pub rank_sum_a: f64,
    /// Sum of midranks of group B in the pooled ranking
    pub rank_sum_b: f64,

    /// min(U1, U2), symmetric in A and B
    pub u_statistic: f64,

    /// |U − μ_U| / σ_U
    pub z_score: f64,

    /// Two-tailed normal-approximation p-value in [0, 1]
    pub p_value: f64,

    /// p_value < 0.05
    pub significant: bool,

    /// z / sqrt(n_a + n_b)
    pub effect_size: f64,

    /// True when either group has fewer than 2 observations; `effect_size`
    /// is then not a meaningful estimate
    pub degenerate: bool,

    /// Directional dominance P(a > b) − P(a < b) in [-1, 1]
    pub cliff_delta: f64,
    pub effect_magnitude: EffectMagnitude,

    /// Standardized mean difference (mean_a − mean_b) / pooled sd
    pub cohens_d: f64,
    pub cohens_d_magnitude: EffectMagnitude,

    /// Group whose values tend to be larger; `None` when U1 == U2
    pub favors: Option<String>,

    pub tier: SignificanceTier,

    /// Multiple-comparison adjusted p-value (equals `p_value` when
    /// no correction is applied)
    pub adjusted_p_value: f64,
    pub significant_adjusted: bool,
}

/// Assign 1-based ranks in input order, averaging ranks across ties
///
/// # Example
/// ```
/// use rl_compare::comparison::midranks;
///
/// assert_eq!(midranks(&[10.0, 20.0, 10.0]), vec![1.5, 3.0, 1.5]);
/// ```
pub fn midranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }

        // Positions start..end hold ranks start+1 ..= end
        let midrank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = midrank;
        }

        start = end;
    }

    ranks
}

/// Σ(t³ − t) over tie groups, used by the tie-corrected variance
pub(crate) fn tie_term(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut total = 0.0;
    let mut start = 0;
    while start < sorted.len() {
        let mut end = start + 1;
        while end < sorted.len() && sorted[end] == sorted[start] {
            end += 1;
        }
        let t = (end - start) as f64;
        total += t * t * t - t;
        start = end;
    }

    total
}

/// Mann-Whitney U test between two sample groups
///
/// # Errors
/// - `InvalidInput` if either group is empty or holds a non-finite value
/// - `DegenerateVariance` if σ_U is zero (only reachable with
///   `tie_correction` when every pooled observation is tied)
///
/// # Example
/// ```
/// use rl_compare::comparison::{pairwise_test, SampleGroup};
///
/// let a = SampleGroup::new("dqn", vec![1.0, 2.0, 3.0]);
/// let b = SampleGroup::new("ppo", vec![4.0, 5.0, 6.0]);
///
/// let result = pairwise_test(&a, &b, false).unwrap();
/// assert_eq!(result.u_statistic, 0.0);
/// assert_eq!(result.favors.as_deref(), Some("ppo"));
/// ```
pub fn pairwise_test(
    group_a: &SampleGroup,
    group_b: &SampleGroup,
    tie_correction: bool,
) -> Result<PairwiseTestResult> {
    validate_group(&group_a.name, &group_a.values)?;
    validate_group(&group_b.name, &group_b.values)?;

    let n1 = group_a.values.len();
    let n2 = group_b.values.len();
    let n = n1 + n2;
    let (n1_f, n2_f, n_f) = (n1 as f64, n2 as f64, n as f64);

    let pooled: Vec<f64> = group_a
        .values
        .iter()
        .chain(group_b.values.iter())
        .copied()
        .collect();
    let ranks = midranks(&pooled);

    let rank_sum_a: f64 = ranks[..n1].iter().sum();
    let rank_sum_b: f64 = ranks[n1..].iter().sum();

    let u1 = rank_sum_a - n1_f * (n1_f + 1.0) / 2.0;
    let u2 = n1_f * n2_f - u1;
    let u_statistic = u1.min(u2);

    let mean_u = n1_f * n2_f / 2.0;
    let variance_u = if tie_correction {
        n1_f * n2_f / 12.0 * ((n_f + 1.0) - tie_term(&pooled) / (n_f * (n_f - 1.0)))
    } else {
        n1_f * n2_f * (n_f + 1.0) / 12.0
    };

    if variance_u <= 0.0 {
        return Err(ComparisonError::DegenerateVariance(format!(
            "rank statistic of '{}' vs '{}' has zero variance (all observations tied)",
            group_a.name, group_b.name
        )));
    }
    let sigma_u = variance_u.sqrt();

    let z_score = (u_statistic - mean_u).abs() / sigma_u;
    let p_value = two_tailed_normal_p(z_score);
    let effect_size = z_score / n_f.sqrt();

    let delta = cliff_delta(&group_a.values, &group_b.values);
    let d = cohens_d(&group_a.values, &group_b.values);
    let favors = if u1 > u2 {
        Some(group_a.name.clone())
    } else if u2 > u1 {
        Some(group_b.name.clone())
    } else {
        None
    };

    let degenerate = n1 < 2 || n2 < 2;
    if degenerate {
        tracing::debug!(
            "Effect size for '{}' vs '{}' is degenerate (n_a={}, n_b={})",
            group_a.name,
            group_b.name,
            n1,
            n2
        );
    }

    Ok(PairwiseTestResult {
        group_a: group_a.name.clone(),
        group_b: group_b.name.clone(),
        n_a: n1,
        n_b: n2,
        rank_sum_a,
        rank_sum_b,
        u_statistic,
        z_score,
        p_value,
        significant: p_value < SIGNIFICANCE_LEVEL,
        effect_size,
        degenerate,
        cliff_delta: delta,
        effect_magnitude: EffectMagnitude::from_cliff_delta(delta),
        cohens_d: d,
        cohens_d_magnitude: EffectMagnitude::from_cohens_d(d),
        favors,
        tier: SignificanceTier::from_p_value(p_value),
        adjusted_p_value: p_value,
        significant_adjusted: p_value < SIGNIFICANCE_LEVEL,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str, values: &[f64]) -> SampleGroup {
        SampleGroup::new(name, values.to_vec())
    }

    #[test]
    fn test_midranks_no_ties() {
        assert_eq!(midranks(&[3.0, 1.0, 2.0]), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_midranks_ties() {
        // sorted: 1,1,1 → ranks 1,2,3 → 2; 2,2 → ranks 4,5 → 4.5; 3 → 6
        let ranks = midranks(&[1.0, 1.0, 2.0, 1.0, 2.0, 3.0]);
        assert_eq!(ranks, vec![2.0, 2.0, 4.5, 2.0, 4.5, 6.0]);
    }

    #[test]
    fn test_midranks_all_tied() {
        assert_eq!(midranks(&[7.0; 4]), vec![2.5; 4]);
    }

    #[test]
    fn test_tie_term() {
        // one triple, one pair: (27 - 3) + (8 - 2) = 30
        assert_eq!(tie_term(&[1.0, 1.0, 2.0, 1.0, 2.0, 3.0]), 30.0);
        assert_eq!(tie_term(&[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_complete_separation() {
        let result =
            pairwise_test(&group("a", &[1.0, 2.0, 3.0]), &group("b", &[4.0, 5.0, 6.0]), false)
                .unwrap();

        assert_eq!(result.u_statistic, 0.0);
        assert_eq!(result.rank_sum_a, 6.0);
        assert_eq!(result.rank_sum_b, 15.0);
        // μ = 4.5, σ = sqrt(5.25)
        assert!((result.z_score - 4.5 / 5.25_f64.sqrt()).abs() < 1e-12);
        assert!(result.p_value > 0.049 && result.p_value < 0.05);
        assert!(result.significant);
        assert_eq!(result.cliff_delta, -1.0);
        // means 2 and 5, pooled sd 1
        assert_eq!(result.cohens_d, -3.0);
        assert_eq!(result.cohens_d_magnitude, EffectMagnitude::Large);
        assert_eq!(result.favors.as_deref(), Some("b"));
        assert!(!result.degenerate);
    }

    #[test]
    fn test_tied_rank_sums() {
        let result =
            pairwise_test(&group("a", &[1.0, 1.0, 2.0]), &group("b", &[1.0, 2.0, 3.0]), false)
                .unwrap();

        assert_eq!(result.rank_sum_a, 8.5);
        assert_eq!(result.rank_sum_b, 12.5);
        assert_eq!(result.rank_sum_a + result.rank_sum_b, 21.0);
        assert_eq!(result.u_statistic, 2.5);
    }

    #[test]
    fn test_tie_correction_increases_z() {
        let a = group("a", &[1.0, 1.0, 2.0, 2.0, 2.0]);
        let b = group("b", &[2.0, 3.0, 3.0, 3.0, 4.0]);

        let plain = pairwise_test(&a, &b, false).unwrap();
        let corrected = pairwise_test(&a, &b, true).unwrap();

        assert_eq!(plain.u_statistic, corrected.u_statistic);
        assert!(corrected.z_score > plain.z_score);
        assert!(corrected.p_value < plain.p_value);
    }

    #[test]
    fn test_tie_corrected_variance_value() {
        // n = 6, tie term (27 − 3) + (8 − 2) = 30 → σ² = 9/12 · (7 − 30/30) = 4.5
        let result =
            pairwise_test(&group("a", &[1.0, 1.0, 2.0]), &group("b", &[1.0, 2.0, 3.0]), true)
                .unwrap();

        assert_eq!(result.u_statistic, 2.5);
        let expected_z = (2.5_f64 - 4.5).abs() / 4.5_f64.sqrt();
        assert!((result.z_score - expected_z).abs() < 1e-12);
        assert!((result.p_value - two_tailed_normal_p(expected_z)).abs() < 1e-12);
    }

    #[test]
    fn test_tie_correction_all_tied_is_degenerate() {
        let err = pairwise_test(&group("a", &[2.0, 2.0]), &group("b", &[2.0, 2.0]), true)
            .unwrap_err();
        assert!(matches!(err, ComparisonError::DegenerateVariance(_)));
    }

    #[test]
    fn test_all_tied_without_correction() {
        let result =
            pairwise_test(&group("a", &[2.0, 2.0]), &group("b", &[2.0, 2.0]), false).unwrap();
        assert_eq!(result.u_statistic, 2.0);
        assert_eq!(result.z_score, 0.0);
        assert!(result.p_value > 0.99);
        assert!(result.favors.is_none());
    }

    #[test]
    fn test_empty_group_rejected() {
        let err = pairwise_test(&group("a", &[]), &group("b", &[1.0]), false).unwrap_err();
        assert!(matches!(err, ComparisonError::InvalidInput(_)));
    }

    #[test]
    fn test_single_observation_flagged() {
        let result = pairwise_test(&group("a", &[1.0]), &group("b", &[2.0, 3.0]), false).unwrap();
        assert!(result.degenerate);
        assert!(result.effect_size.is_finite());
    }

    #[test]
    fn test_negative_values() {
        let result = pairwise_test(
            &group("a", &[-10.0, -9.5, -8.0, -7.5]),
            &group("b", &[-1.0, 0.0, 0.5, 2.0]),
            false,
        )
        .unwrap();
        assert_eq!(result.u_statistic, 0.0);
        assert_eq!(result.favors.as_deref(), Some("b"));
    }

    #[test]
    fn test_swapped_groups_symmetric() {
        let a = group("a", &[3.1, 4.7, 2.2, 5.0, 3.3]);
        let b = group("b", &[4.0, 6.1, 5.5, 4.7]);

        let ab = pairwise_test(&a, &b, false).unwrap();
        let ba = pairwise_test(&b, &a, false).unwrap();

        assert_eq!(ab.u_statistic, ba.u_statistic);
        assert_eq!(ab.z_score, ba.z_score);
        assert_eq!(ab.p_value, ba.p_value);
        assert_eq!(ab.cliff_delta, -ba.cliff_delta);
        assert_eq!(ab.cohens_d, -ba.cohens_d);
        assert_eq!(ab.favors, ba.favors);
    }
}
