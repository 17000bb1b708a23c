// Configuration for the statistical comparison engine
//
// The significance threshold itself is not configurable: `significant`
// is always `p_value < 0.05`. What can be tuned is how p-values are
// obtained (bucketed vs exact ANOVA tail, tie-corrected rank variance)
// and whether pairwise p-values get a multiple-comparison adjustment.

use crate::comparison::anova::PValueMode;
use crate::comparison::correction::CorrectionMethod;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tuning knobs for `StatisticalComparator`
///
/// # Example
/// ```
/// use rl_compare::comparison::{ComparatorConfig, PValueMode};
///
/// let config = ComparatorConfig::default();
/// assert_eq!(config.anova_p_value, PValueMode::Bucketed);
/// assert!(!config.tie_correction);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparatorConfig {
    /// How the ANOVA p-value is derived from F
    ///
    /// - `bucketed` (default): legacy three-tier mapping (F > 4 → 0.01,
    ///   F > 2.5 → 0.05, else 0.1). Existing consumers rely on these exact values.
    /// - `exact`: upper tail of the F(df_between, df_within) distribution.
    pub anova_p_value: PValueMode,

    /// Subtract the tie term from the Mann-Whitney variance
    ///
    /// Off by default so z-scores match the uncorrected baseline formula
    /// `σ_U = sqrt(n1·n2·(n1+n2+1)/12)`.
    pub tie_correction: bool,

    /// Multiple-comparison adjustment applied across all pairwise p-values
    ///
    /// The adjusted value is reported next to the raw one; it never
    /// replaces `p_value` or changes `significant`.
    pub correction: CorrectionMethod,

    /// Minimum observations required in every group passed to `compare`
    ///
    /// Default: 1 (any non-empty group is accepted)
    pub min_sample_size: usize,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self {
            anova_p_value: PValueMode::Bucketed,
            tie_correction: false,
            correction: CorrectionMethod::None,
            min_sample_size: 1,
        }
    }
}

impl ComparatorConfig {
    /// Exact tail probabilities, tie-corrected ranks and Holm adjustment
    ///
    /// Use when the report feeds a write-up rather than a live dashboard.
    pub fn strict() -> Self {
        Self {
            anova_p_value: PValueMode::Exact,
            tie_correction: true,
            correction: CorrectionMethod::Holm,
            min_sample_size: 5,
        }
    }

    /// Legacy bucketed p-values, no adjustment, any non-empty group
    ///
    /// Suited to quick looks at a handful of episodes.
    pub fn exploratory() -> Self {
        Self {
            anova_p_value: PValueMode::Bucketed,
            tie_correction: false,
            correction: CorrectionMethod::None,
            min_sample_size: 1,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.min_sample_size == 0 {
            return Err("min_sample_size must be >= 1, got 0".to_string());
        }

        Ok(())
    }

    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ComparatorConfig =
            toml::from_str(contents).context("Invalid comparator config TOML")?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            bail!("Config file not found: {}", path_ref.display());
        }

        let contents = fs::read_to_string(path_ref).context("Failed to read config file")?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ComparatorConfig::default();
        assert_eq!(config.anova_p_value, PValueMode::Bucketed);
        assert!(!config.tie_correction);
        assert_eq!(config.correction, CorrectionMethod::None);
        assert_eq!(config.min_sample_size, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strict_config() {
        let config = ComparatorConfig::strict();
        assert_eq!(config.anova_p_value, PValueMode::Exact);
        assert!(config.tie_correction);
        assert_eq!(config.correction, CorrectionMethod::Holm);
        assert_eq!(config.min_sample_size, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_exploratory_config() {
        let config = ComparatorConfig::exploratory();
        assert_eq!(config.anova_p_value, PValueMode::Bucketed);
        assert!(!config.tie_correction);
        assert_eq!(config.correction, CorrectionMethod::None);
        assert_eq!(config.min_sample_size, 1);
        assert!(config.validate().is_ok());
        assert_eq!(config, ComparatorConfig::default());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_min_sample_size() {
        let mut config = ComparatorConfig::default();
        config.min_sample_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = ComparatorConfig::from_toml_str(
            r#"
anova_p_value = "exact"
correction = "fdr_bh"
"#,
        )
        .unwrap();
        assert_eq!(config.anova_p_value, PValueMode::Exact);
        assert_eq!(config.correction, CorrectionMethod::BenjaminiHochberg);
        assert!(!config.tie_correction);
        assert_eq!(config.min_sample_size, 1);
    }

    #[test]
    fn test_from_toml_rejects_unknown_key() {
        assert!(ComparatorConfig::from_toml_str("alpha = 0.01").is_err());
    }

    #[test]
    fn test_from_toml_rejects_invalid_value() {
        assert!(ComparatorConfig::from_toml_str("min_sample_size = 0").is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = ComparatorConfig::from_file("/nonexistent/rl-compare.toml").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
