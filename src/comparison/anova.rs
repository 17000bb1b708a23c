// One-way ANOVA across all algorithm groups
//
// H₀: μ₁ = μ₂ = ... = μₖ
// F = (SSB / (k − 1)) / (SSW / (n − k))
//
// The default p-value is the legacy bucketed mapping consumers already
// depend on. It is a coarse simplification, not a tail probability; the
// exact F-distribution tail is available as `PValueMode::Exact`.

use crate::comparison::distribution::f_survival;
use crate::comparison::effect_size::{eta_squared, EffectMagnitude, SignificanceTier};
use crate::comparison::error::{validate_group, ComparisonError, Result};
use crate::comparison::{SampleGroup, SIGNIFICANCE_LEVEL};
use serde::{Deserialize, Serialize};

/// How the ANOVA p-value is derived from the F-statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PValueMode {
    /// F > 4 → 0.01, F > 2.5 → 0.05, otherwise 0.1
    #[default]
    Bucketed,
    /// P(F > f) under F(df_between, df_within)
    Exact,
}

impl PValueMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PValueMode::Bucketed => "bucketed",
            PValueMode::Exact => "exact",
        }
    }
}

/// Result of a one-way ANOVA over k groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaResult {
    pub f_statistic: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub p_value: f64,
    /// p_value < 0.05
    pub significant: bool,
    pub p_value_mode: PValueMode,
    pub ss_between: f64,
    pub ss_within: f64,
    /// SSB / SST
    pub eta_squared: f64,
    pub effect_magnitude: EffectMagnitude,
    pub tier: SignificanceTier,
}

/// Legacy three-tier p-value for an F-statistic
///
/// # Example
/// ```
/// use rl_compare::comparison::bucketed_p_value;
///
/// assert_eq!(bucketed_p_value(5.0), 0.01);
/// assert_eq!(bucketed_p_value(3.0), 0.05);
/// assert_eq!(bucketed_p_value(1.0), 0.1);
/// ```
pub fn bucketed_p_value(f_statistic: f64) -> f64 {
    if f_statistic > 4.0 {
        0.01
    } else if f_statistic > 2.5 {
        0.05
    } else {
        0.1
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// One-way ANOVA F-test
///
/// # Errors
/// - `InvalidInput` for fewer than 2 groups, an empty group, or a
///   non-finite observation
/// - `InsufficientData` when n − k <= 0
/// - `DegenerateVariance` when every group is internally constant
///   (SSW = 0, F undefined)
pub fn anova_test(groups: &[SampleGroup], mode: PValueMode) -> Result<AnovaResult> {
    let k = groups.len();
    if k < 2 {
        return Err(ComparisonError::InvalidInput(format!(
            "ANOVA requires at least 2 groups, got {}",
            k
        )));
    }

    for group in groups {
        validate_group(&group.name, &group.values)?;
    }

    let n_total: usize = groups.iter().map(SampleGroup::len).sum();
    if n_total <= k {
        return Err(ComparisonError::InsufficientData {
            observations: n_total,
            groups: k,
        });
    }
    let df_between = k - 1;
    let df_within = n_total - k;

    let group_means: Vec<f64> = groups.iter().map(|g| mean(&g.values)).collect();
    let grand_mean =
        groups.iter().flat_map(|g| g.values.iter()).sum::<f64>() / n_total as f64;

    // SSB = Σ n_i (ȳ_i − ȳ)²
    let ss_between: f64 = groups
        .iter()
        .zip(&group_means)
        .map(|(g, &m)| g.len() as f64 * (m - grand_mean).powi(2))
        .sum();

    // SSW = Σ Σ (y_ij − ȳ_i)²
    let ss_within: f64 = groups
        .iter()
        .zip(&group_means)
        .map(|(g, &m)| g.values.iter().map(|&v| (v - m).powi(2)).sum::<f64>())
        .sum();

    if !(ss_between.is_finite() && ss_within.is_finite()) {
        return Err(ComparisonError::InvalidInput(
            "observations overflow f64 when aggregating sums of squares".to_string(),
        ));
    }

    // Constant groups can leave float residue in SSW; treat them as exact zero
    let all_constant = groups
        .iter()
        .all(|g| g.values.iter().all(|&v| v == g.values[0]));
    if ss_within == 0.0 || all_constant {
        return Err(ComparisonError::DegenerateVariance(format!(
            "within-group variance is zero across all {} groups; F is undefined",
            k
        )));
    }

    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;
    let f_statistic = ms_between / ms_within;
    if !f_statistic.is_finite() {
        return Err(ComparisonError::DegenerateVariance(format!(
            "within-group mean square {:e} is too small to form F",
            ms_within
        )));
    }

    let p_value = match mode {
        PValueMode::Bucketed => bucketed_p_value(f_statistic),
        PValueMode::Exact => f_survival(f_statistic, df_between, df_within)?,
    }
    .clamp(0.0, 1.0);

    let eta_sq = eta_squared(ss_between, ss_between + ss_within);

    tracing::debug!(
        "ANOVA: k={} n={} F={:.4} p={:.4} ({})",
        k,
        n_total,
        f_statistic,
        p_value,
        mode.as_str()
    );

    Ok(AnovaResult {
        f_statistic,
        df_between,
        df_within,
        p_value,
        significant: p_value < SIGNIFICANCE_LEVEL,
        p_value_mode: mode,
        ss_between,
        ss_within,
        eta_squared: eta_sq,
        effect_magnitude: EffectMagnitude::from_eta_squared(eta_sq),
        tier: SignificanceTier::from_p_value(p_value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(data: &[(&str, &[f64])]) -> Vec<SampleGroup> {
        data.iter()
            .map(|(name, values)| SampleGroup::new(*name, values.to_vec()))
            .collect()
    }

    #[test]
    fn test_bucket_thresholds_are_strict() {
        assert_eq!(bucketed_p_value(4.0), 0.05);
        assert_eq!(bucketed_p_value(4.000_001), 0.01);
        assert_eq!(bucketed_p_value(2.5), 0.1);
        assert_eq!(bucketed_p_value(0.0), 0.1);
    }

    #[test]
    fn test_sums_of_squares() {
        // grand mean 2.5, group means 0 and 5: SSB = 4·2.5²·2 = 50, SSW = 30 + 30
        let g = groups(&[("a", &[-4.0, -1.0, 2.0, 3.0]), ("b", &[1.0, 4.0, 7.0, 8.0])]);
        let result = anova_test(&g, PValueMode::Bucketed).unwrap();

        assert_eq!(result.ss_between, 50.0);
        assert_eq!(result.ss_within, 60.0);
        assert_eq!(result.df_between, 1);
        assert_eq!(result.df_within, 6);
        assert_eq!(result.f_statistic, 5.0);
        assert_eq!(result.p_value, 0.01);
        assert!(result.significant);
        assert!((result.eta_squared - 50.0 / 110.0).abs() < 1e-12);
    }

    #[test]
    fn test_exact_mode_matches_f_tail() {
        let g = groups(&[("a", &[-4.0, -1.0, 2.0, 3.0]), ("b", &[1.0, 4.0, 7.0, 8.0])]);
        let result = anova_test(&g, PValueMode::Exact).unwrap();

        assert_eq!(result.p_value_mode, PValueMode::Exact);
        assert!((result.p_value - f_survival(5.0, 1, 6).unwrap()).abs() < 1e-12);
        // F = 5 with (1, 6) df is not significant at 0.05 once computed exactly
        assert!(!result.significant);
    }

    #[test]
    fn test_identical_means_gives_zero_f() {
        let g = groups(&[("a", &[1.0, 2.0, 3.0]), ("b", &[3.0, 2.0, 1.0])]);
        let result = anova_test(&g, PValueMode::Exact).unwrap();
        assert_eq!(result.f_statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.eta_squared, 0.0);
    }

    #[test]
    fn test_too_few_groups() {
        let g = groups(&[("a", &[1.0, 2.0])]);
        let err = anova_test(&g, PValueMode::Bucketed).unwrap_err();
        assert!(matches!(err, ComparisonError::InvalidInput(_)));
    }

    #[test]
    fn test_single_observation_groups_insufficient() {
        let g = groups(&[("a", &[1.0]), ("b", &[2.0]), ("c", &[3.0])]);
        let err = anova_test(&g, PValueMode::Bucketed).unwrap_err();
        assert_eq!(
            err,
            ComparisonError::InsufficientData {
                observations: 3,
                groups: 3
            }
        );
    }

    #[test]
    fn test_constant_groups_degenerate() {
        let g = groups(&[("a", &[5.0, 5.0, 5.0]), ("b", &[5.0, 5.0, 5.0]), ("c", &[5.0, 5.0, 5.0])]);
        let err = anova_test(&g, PValueMode::Bucketed).unwrap_err();
        assert!(matches!(err, ComparisonError::DegenerateVariance(_)));
    }

    #[test]
    fn test_constant_but_different_groups_degenerate() {
        // Residue-prone values: mean of [0.1; 3] is not exactly 0.1
        let g = groups(&[("a", &[0.1, 0.1, 0.1]), ("b", &[0.7, 0.7, 0.7])]);
        let err = anova_test(&g, PValueMode::Exact).unwrap_err();
        assert!(matches!(err, ComparisonError::DegenerateVariance(_)));
    }

    #[test]
    fn test_one_constant_group_is_fine() {
        let g = groups(&[("a", &[5.0, 5.0, 5.0]), ("b", &[4.0, 6.0, 5.0])]);
        assert!(anova_test(&g, PValueMode::Bucketed).is_ok());
    }

    #[test]
    fn test_overflowing_values_rejected() {
        let g = groups(&[("a", &[f64::MAX, -f64::MAX]), ("b", &[1.0, 2.0])]);
        let err = anova_test(&g, PValueMode::Bucketed).unwrap_err();
        assert!(matches!(err, ComparisonError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_group_rejected() {
        let g = groups(&[("a", &[1.0, 2.0]), ("b", &[])]);
        let err = anova_test(&g, PValueMode::Bucketed).unwrap_err();
        assert!(matches!(err, ComparisonError::InvalidInput(_)));
    }
}
