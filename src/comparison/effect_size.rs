// Effect sizes and significance tiers
//
// Cliff's delta accompanies the rank test (thresholds from Romano et al. 2006),
// Cohen's d gives the parametric view of the same pair, and eta squared
// accompanies ANOVA (Cohen 1988 thresholds for both).

use serde::{Deserialize, Serialize};

/// Qualitative size of an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectMagnitude {
    Negligible,
    Small,
    Medium,
    Large,
}

impl EffectMagnitude {
    /// Classify |Cliff's delta| (0.147 / 0.33 / 0.474)
    pub fn from_cliff_delta(delta: f64) -> Self {
        let d = delta.abs();
        if d < 0.147 {
            EffectMagnitude::Negligible
        } else if d < 0.33 {
            EffectMagnitude::Small
        } else if d < 0.474 {
            EffectMagnitude::Medium
        } else {
            EffectMagnitude::Large
        }
    }

    /// Classify |Cohen's d| (0.2 / 0.5 / 0.8)
    pub fn from_cohens_d(d: f64) -> Self {
        let d = d.abs();
        if d < 0.2 {
            EffectMagnitude::Negligible
        } else if d < 0.5 {
            EffectMagnitude::Small
        } else if d < 0.8 {
            EffectMagnitude::Medium
        } else {
            EffectMagnitude::Large
        }
    }

    /// Classify eta squared (0.01 / 0.06 / 0.14)
    pub fn from_eta_squared(eta_squared: f64) -> Self {
        if eta_squared < 0.01 {
            EffectMagnitude::Negligible
        } else if eta_squared < 0.06 {
            EffectMagnitude::Small
        } else if eta_squared < 0.14 {
            EffectMagnitude::Medium
        } else {
            EffectMagnitude::Large
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectMagnitude::Negligible => "negligible",
            EffectMagnitude::Small => "small",
            EffectMagnitude::Medium => "medium",
            EffectMagnitude::Large => "large",
        }
    }
}

/// Graded significance of a p-value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignificanceTier {
    /// p >= 0.05
    NotSignificant,
    /// 0.01 <= p < 0.05
    MarginallySignificant,
    /// 0.001 <= p < 0.01
    Significant,
    /// p < 0.001
    HighlySignificant,
}

impl SignificanceTier {
    pub fn from_p_value(p_value: f64) -> Self {
        if p_value < 0.001 {
            SignificanceTier::HighlySignificant
        } else if p_value < 0.01 {
            SignificanceTier::Significant
        } else if p_value < 0.05 {
            SignificanceTier::MarginallySignificant
        } else {
            SignificanceTier::NotSignificant
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignificanceTier::NotSignificant => "not significant",
            SignificanceTier::MarginallySignificant => "marginally significant",
            SignificanceTier::Significant => "significant",
            SignificanceTier::HighlySignificant => "highly significant",
        }
    }
}

/// Cliff's delta: P(a > b) − P(a < b) over all cross-group pairs
///
/// Returns a value in [-1, 1]; positive means `a` tends to be larger.
/// Callers guarantee both slices are non-empty.
pub fn cliff_delta(a: &[f64], b: &[f64]) -> f64 {
    let mut dominance: i64 = 0;
    for &x in a {
        for &y in b {
            if x > y {
                dominance += 1;
            } else if x < y {
                dominance -= 1;
            }
        }
    }

    dominance as f64 / (a.len() * b.len()) as f64
}

/// Cohen's d: (mean(a) − mean(b)) / pooled standard deviation
///
/// The pooled variance is `(SS_a + SS_b) / (n_a + n_b − 2)`. Returns 0.0 when
/// that is undefined (two singletons) or zero (both groups constant).
pub fn cohens_d(a: &[f64], b: &[f64]) -> f64 {
    let dof = (a.len() + b.len()).saturating_sub(2);
    if a.is_empty() || b.is_empty() || dof == 0 {
        return 0.0;
    }

    let mean_a = a.iter().sum::<f64>() / a.len() as f64;
    let mean_b = b.iter().sum::<f64>() / b.len() as f64;
    let ss_a: f64 = a.iter().map(|&x| (x - mean_a).powi(2)).sum();
    let ss_b: f64 = b.iter().map(|&x| (x - mean_b).powi(2)).sum();

    let pooled_sd = ((ss_a + ss_b) / dof as f64).sqrt();
    if pooled_sd > 0.0 && pooled_sd.is_finite() {
        (mean_a - mean_b) / pooled_sd
    } else {
        0.0
    }
}

/// Proportion of total variance explained by group membership
///
/// Returns 0.0 when the total sum of squares is zero.
pub fn eta_squared(ss_between: f64, ss_total: f64) -> f64 {
    if ss_total > 0.0 {
        (ss_between / ss_total).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
