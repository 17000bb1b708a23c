//! CLI argument parsing for rl-compare

use crate::comparison::{ComparatorConfig, CorrectionMethod, PValueMode};
use crate::metric::ComparisonMetric;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for comparison reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

/// ANOVA p-value derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnovaPValue {
    /// Legacy three-tier mapping (0.01 / 0.05 / 0.1)
    Bucketed,
    /// Exact F-distribution tail probability
    Exact,
}

impl From<AnovaPValue> for PValueMode {
    fn from(value: AnovaPValue) -> Self {
        match value {
            AnovaPValue::Bucketed => PValueMode::Bucketed,
            AnovaPValue::Exact => PValueMode::Exact,
        }
    }
}

/// Multiple-comparison correction for pairwise p-values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Correction {
    None,
    Bonferroni,
    Holm,
    /// Benjamini-Hochberg false discovery rate
    FdrBh,
}

impl From<Correction> for CorrectionMethod {
    fn from(value: Correction) -> Self {
        match value {
            Correction::None => CorrectionMethod::None,
            Correction::Bonferroni => CorrectionMethod::Bonferroni,
            Correction::Holm => CorrectionMethod::Holm,
            Correction::FdrBh => CorrectionMethod::BenjaminiHochberg,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "rl-compare")]
#[command(version)]
#[command(
    about = "Statistical comparison of RL handover algorithms (Mann-Whitney U + one-way ANOVA)",
    long_about = None
)]
pub struct Cli {
    /// JSON sample file: {"algorithms": [{"name": ..., "episodes": [{...}]}]}
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Metric to compare (e.g., total_reward, handover_success_rate, average_latency)
    #[arg(short, long, value_name = "METRIC", default_value = "total_reward")]
    pub metric: ComparisonMetric,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file; flags below override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How the ANOVA p-value is derived
    #[arg(long = "anova-pvalue", value_enum)]
    pub anova_pvalue: Option<AnovaPValue>,

    /// Apply tie correction to the Mann-Whitney variance
    #[arg(long = "tie-correction", overrides_with = "no_tie_correction")]
    pub tie_correction: bool,

    /// Disable tie correction even if the config file enables it
    #[arg(long = "no-tie-correction", overrides_with = "tie_correction")]
    pub no_tie_correction: bool,

    /// Multiple-comparison correction for pairwise p-values
    #[arg(long = "correction", value_enum)]
    pub correction: Option<Correction>,

    /// Minimum observations required per algorithm
    #[arg(long = "min-samples", value_name = "N")]
    pub min_samples: Option<usize>,

    /// Enable debug tracing output to stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a base configuration
    pub fn apply_overrides(&self, mut config: ComparatorConfig) -> ComparatorConfig {
        if let Some(mode) = self.anova_pvalue {
            config.anova_p_value = mode.into();
        }
        if self.tie_correction {
            config.tie_correction = true;
        } else if self.no_tie_correction {
            config.tie_correction = false;
        }
        if let Some(correction) = self.correction {
            config.correction = correction.into();
        }
        if let Some(min) = self.min_samples {
            config.min_sample_size = min;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_input() {
        let cli = Cli::parse_from(["rl-compare", "samples.json"]);
        assert_eq!(cli.input, PathBuf::from("samples.json"));
        assert_eq!(cli.metric, ComparisonMetric::TotalReward);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.config.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["rl-compare"]).is_err());
    }

    #[test]
    fn test_cli_metric_flag() {
        let cli = Cli::parse_from(["rl-compare", "-m", "average_latency", "samples.json"]);
        assert_eq!(cli.metric, ComparisonMetric::AverageLatency);
    }

    #[test]
    fn test_cli_rejects_unknown_metric() {
        assert!(Cli::try_parse_from(["rl-compare", "--metric", "rsrp", "samples.json"]).is_err());
    }

    #[test]
    fn test_cli_json_format() {
        let cli = Cli::parse_from(["rl-compare", "--format", "json", "samples.json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_no_overrides_keeps_config() {
        let cli = Cli::parse_from(["rl-compare", "samples.json"]);
        let config = cli.apply_overrides(ComparatorConfig::strict());
        assert_eq!(config, ComparatorConfig::strict());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "rl-compare",
            "--anova-pvalue",
            "exact",
            "--tie-correction",
            "--correction",
            "fdr-bh",
            "--min-samples",
            "3",
            "samples.json",
        ]);
        let config = cli.apply_overrides(ComparatorConfig::default());
        assert_eq!(config.anova_p_value, PValueMode::Exact);
        assert!(config.tie_correction);
        assert_eq!(config.correction, CorrectionMethod::BenjaminiHochberg);
        assert_eq!(config.min_sample_size, 3);
    }

    #[test]
    fn test_cli_disables_tie_correction_from_config() {
        let cli = Cli::parse_from(["rl-compare", "--no-tie-correction", "samples.json"]);
        let config = cli.apply_overrides(ComparatorConfig::strict());
        assert!(!config.tie_correction);
        assert_eq!(config.correction, CorrectionMethod::Holm);
    }

    #[test]
    fn test_cli_last_tie_correction_flag_wins() {
        let cli = Cli::parse_from([
            "rl-compare",
            "--no-tie-correction",
            "--tie-correction",
            "samples.json",
        ]);
        assert!(cli.apply_overrides(ComparatorConfig::default()).tie_correction);

        let cli = Cli::parse_from([
            "rl-compare",
            "--tie-correction",
            "--no-tie-correction",
            "samples.json",
        ]);
        assert!(!cli.apply_overrides(ComparatorConfig::strict()).tie_correction);
    }
}
