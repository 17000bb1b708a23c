// Multiple-comparison correction for pairwise p-values
//
// k algorithms produce C(k,2) pairwise tests; at α = 0.05 the chance of
// at least one false positive grows quickly with k. Adjusted p-values are
// reported alongside the raw ones.

use serde::{Deserialize, Serialize};

/// Adjustment applied across a family of p-values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMethod {
    /// Adjusted p-value equals the raw p-value
    #[default]
    None,
    /// p · m
    Bonferroni,
    /// Step-down Bonferroni (Holm 1979)
    Holm,
    /// Step-up false discovery rate (Benjamini & Hochberg 1995)
    #[serde(rename = "fdr_bh")]
    BenjaminiHochberg,
}

impl CorrectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionMethod::None => "none",
            CorrectionMethod::Bonferroni => "bonferroni",
            CorrectionMethod::Holm => "holm",
            CorrectionMethod::BenjaminiHochberg => "fdr_bh",
        }
    }
}

/// Adjust a family of p-values, returning them in input order
///
/// Every output is clamped to [0, 1].
///
/// # Example
/// ```
/// use rl_compare::comparison::{adjust_p_values, CorrectionMethod};
///
/// let adjusted = adjust_p_values(&[0.01, 0.04], CorrectionMethod::Bonferroni);
/// assert_eq!(adjusted, vec![0.02, 0.08]);
/// ```
pub fn adjust_p_values(p_values: &[f64], method: CorrectionMethod) -> Vec<f64> {
    let m = p_values.len();
    if m == 0 {
        return Vec::new();
    }

    match method {
        CorrectionMethod::None => p_values.iter().map(|p| p.clamp(0.0, 1.0)).collect(),
        CorrectionMethod::Bonferroni => p_values
            .iter()
            .map(|p| (p * m as f64).clamp(0.0, 1.0))
            .collect(),
        CorrectionMethod::Holm => {
            let order = ascending_order(p_values);
            let mut adjusted = vec![0.0; m];
            let mut running_max: f64 = 0.0;
            for (rank, &idx) in order.iter().enumerate() {
                let value = (p_values[idx] * (m - rank) as f64).clamp(0.0, 1.0);
                running_max = running_max.max(value);
                adjusted[idx] = running_max;
            }
            adjusted
        }
        CorrectionMethod::BenjaminiHochberg => {
            let order = ascending_order(p_values);
            let mut adjusted = vec![0.0; m];
            let mut running_min: f64 = 1.0;
            for (rank, &idx) in order.iter().enumerate().rev() {
                let value = (p_values[idx] * m as f64 / (rank + 1) as f64).clamp(0.0, 1.0);
                running_min = running_min.min(value);
                adjusted[idx] = running_min;
            }
            adjusted
        }
    }
}

/// Indices that sort `values` ascending (stable for equal values)
fn ascending_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}
