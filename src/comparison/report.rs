// Comparison report assembly
//
// `compare` runs ANOVA and Kruskal-Wallis once over all groups and a rank
// test for every unordered pair (i, j), i < j, in input order. Any failure aborts the whole
// comparison; callers that want partial results must drop degenerate groups
// before calling.

use crate::comparison::anova::{anova_test, AnovaResult};
use crate::comparison::config::ComparatorConfig;
use crate::comparison::correction::{adjust_p_values, CorrectionMethod};
use crate::comparison::error::{ComparisonError, Result};
use crate::comparison::kruskal_wallis::{kruskal_wallis_test, KruskalWallisResult};
use crate::comparison::mann_whitney::{pairwise_test, PairwiseTestResult};
use crate::comparison::{SampleGroup, SIGNIFICANCE_LEVEL};
use crate::metric::ComparisonMetric;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Per-group metadata carried in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub name: String,
    pub sample_size: usize,
    pub mean: f64,
}

/// Position of one algorithm when groups are ordered by mean
///
/// Equal means share a rank (1, 2, 2, 4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAlgorithm {
    pub rank: usize,
    pub name: String,
    pub mean: f64,
}

/// Full statistical comparison of k algorithm groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Metric the samples were extracted from, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<ComparisonMetric>,

    /// Groups in input order
    pub groups: Vec<GroupSummary>,

    pub anova: AnovaResult,

    pub kruskal_wallis: KruskalWallisResult,

    /// Best to worst by mean; descending unless the metric is lower-is-better
    pub ranking: Vec<RankedAlgorithm>,

    /// One entry per unordered pair, ordered (0,1), (0,2), ..., (1,2), ...
    pub pairwise: Vec<PairwiseTestResult>,

    /// Adjustment used for `adjusted_p_value`
    pub correction: CorrectionMethod,

    /// Unix timestamp (seconds) when the report was generated
    pub generated_at: u64,
}

impl ComparisonReport {
    /// Attach the metric the groups were drawn from
    ///
    /// Re-ranks the groups so lower-is-better metrics put the smallest mean first.
    pub fn with_metric(mut self, metric: ComparisonMetric) -> Self {
        self.metric = Some(metric);
        self.ranking = rank_groups(&self.groups, metric.higher_is_better());
        self
    }

    /// Top of `ranking`, if any group exists
    pub fn best_algorithm(&self) -> Option<&str> {
        self.ranking.first().map(|r| r.name.as_str())
    }

    /// Pairs whose raw p-value is below 0.05
    pub fn significant_pairs(&self) -> impl Iterator<Item = &PairwiseTestResult> {
        self.pairwise.iter().filter(|p| p.significant)
    }

    /// Name of the algorithm that performs better in a pair, if the metric is known
    ///
    /// `favors` names the group with larger values; for lower-is-better
    /// metrics the other group wins.
    pub fn better_algorithm<'a>(&self, pair: &'a PairwiseTestResult) -> Option<&'a str> {
        let metric = self.metric?;
        let larger = pair.favors.as_deref()?;
        if metric.higher_is_better() {
            Some(larger)
        } else if larger == pair.group_a {
            Some(pair.group_b.as_str())
        } else {
            Some(pair.group_a.as_str())
        }
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        match self.metric {
            Some(metric) => report.push_str(&format!(
                "📊 ALGORITHM COMPARISON: {} ({})\n\n",
                metric.as_str(),
                if metric.higher_is_better() {
                    "higher is better"
                } else {
                    "lower is better"
                }
            )),
            None => report.push_str("📊 ALGORITHM COMPARISON\n\n"),
        }

        report.push_str("Groups:\n");
        for group in &self.groups {
            report.push_str(&format!(
                "  {} (n={}, mean={:.4})\n",
                group.name, group.sample_size, group.mean
            ));
        }

        let anova = &self.anova;
        report.push_str(&format!(
            "\nOne-way ANOVA: F({}, {}) = {:.4}, p = {:.4} [{}], eta² = {:.3} ({})\n",
            anova.df_between,
            anova.df_within,
            anova.f_statistic,
            anova.p_value,
            anova.p_value_mode.as_str(),
            anova.eta_squared,
            anova.effect_magnitude.as_str()
        ));
        if anova.significant {
            report.push_str("❌ Group means differ (p < 0.05)\n");
        } else {
            report.push_str("✅ No significant difference between group means\n");
        }

        let kw = &self.kruskal_wallis;
        report.push_str(&format!(
            "Kruskal-Wallis: H({}) = {:.4}, p = {:.4} ({})\n",
            kw.df,
            kw.h_statistic,
            kw.p_value,
            kw.tier.as_str()
        ));

        report.push_str("\nRanking:\n");
        for entry in &self.ranking {
            report.push_str(&format!(
                "  {}. {} (mean={:.4})\n",
                entry.rank, entry.name, entry.mean
            ));
        }

        report.push_str(&format!(
            "\nPairwise Mann-Whitney U (correction: {}):\n",
            self.correction.as_str()
        ));
        for pair in &self.pairwise {
            let marker = if pair.significant { "*" } else { " " };
            report.push_str(&format!(
                "{} {} vs {}: U={:.1}, z={:.3}, p={:.4}, p_adj={:.4}, r={:.3}, delta={:.3} ({}), d={:.3}",
                marker,
                pair.group_a,
                pair.group_b,
                pair.u_statistic,
                pair.z_score,
                pair.p_value,
                pair.adjusted_p_value,
                pair.effect_size,
                pair.cliff_delta,
                pair.effect_magnitude.as_str(),
                pair.cohens_d
            ));
            if let Some(better) = self.better_algorithm(pair) {
                report.push_str(&format!(", better: {}", better));
            }
            if pair.degenerate {
                report.push_str(" [degenerate effect size: n < 2]");
            }
            report.push('\n');
        }

        let significant = self.significant_pairs().count();
        report.push_str(&format!(
            "\n{} of {} pairs significant at α = {}\n",
            significant,
            self.pairwise.len(),
            SIGNIFICANCE_LEVEL
        ));

        report
    }
}

/// Message a display layer shows instead of numbers when a comparison fails
pub fn failure_message(err: &ComparisonError) -> String {
    match err {
        ComparisonError::InvalidInput(reason) => format!("⚠️  INVALID INPUT\n\nReason: {}\n", reason),
        ComparisonError::InsufficientData { .. } => {
            format!("⚠️  INSUFFICIENT DATA\n\nReason: {}\n", err)
        }
        ComparisonError::DegenerateVariance(_) => {
            format!("⚠️  DEGENERATE DISTRIBUTION\n\nReason: {}\n", err)
        }
    }
}

/// Stateless entry point holding only configuration
#[derive(Debug, Clone, Default)]
pub struct StatisticalComparator {
    config: ComparatorConfig,
}

impl StatisticalComparator {
    pub fn new(config: ComparatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComparatorConfig {
        &self.config
    }

    /// Mann-Whitney U test honoring the configured tie correction
    pub fn pairwise_test(
        &self,
        group_a: &SampleGroup,
        group_b: &SampleGroup,
    ) -> Result<PairwiseTestResult> {
        pairwise_test(group_a, group_b, self.config.tie_correction)
    }

    /// One-way ANOVA honoring the configured p-value mode
    pub fn anova_test(&self, groups: &[SampleGroup]) -> Result<AnovaResult> {
        anova_test(groups, self.config.anova_p_value)
    }

    /// Kruskal-Wallis H test (always tie-corrected)
    pub fn kruskal_wallis_test(&self, groups: &[SampleGroup]) -> Result<KruskalWallisResult> {
        kruskal_wallis_test(groups)
    }

    /// Run ANOVA, Kruskal-Wallis and every pairwise test and assemble a report
    ///
    /// # Errors
    /// - `InvalidInput` for fewer than 2 groups, empty or duplicate names,
    ///   or a group below `min_sample_size`
    /// - any error raised by the individual tests, unchanged
    pub fn compare(&self, groups: &[SampleGroup]) -> Result<ComparisonReport> {
        self.config
            .validate()
            .map_err(ComparisonError::InvalidInput)?;
        validate_groups(groups, self.config.min_sample_size)?;

        tracing::info!("Comparing {} algorithm groups", groups.len());

        let anova = self.anova_test(groups)?;
        let kruskal_wallis = self.kruskal_wallis_test(groups)?;

        let mut pairwise = Vec::with_capacity(groups.len() * (groups.len() - 1) / 2);
        for (i, group_a) in groups.iter().enumerate() {
            for group_b in &groups[i + 1..] {
                let result = self.pairwise_test(group_a, group_b).inspect_err(|e| {
                    tracing::warn!(
                        "Pairwise test {} vs {} failed: {}",
                        group_a.name,
                        group_b.name,
                        e
                    );
                })?;
                pairwise.push(result);
            }
        }

        let raw: Vec<f64> = pairwise.iter().map(|p| p.p_value).collect();
        let adjusted = adjust_p_values(&raw, self.config.correction);
        for (pair, adj) in pairwise.iter_mut().zip(adjusted) {
            pair.adjusted_p_value = adj;
            pair.significant_adjusted = adj < SIGNIFICANCE_LEVEL;
        }

        let groups_summary: Vec<GroupSummary> = groups
            .iter()
            .map(|g| GroupSummary {
                name: g.name.clone(),
                sample_size: g.len(),
                mean: g.values.iter().sum::<f64>() / g.len() as f64,
            })
            .collect();
        let ranking = rank_groups(&groups_summary, true);

        Ok(ComparisonReport {
            metric: None,
            groups: groups_summary,
            anova,
            kruskal_wallis,
            ranking,
            pairwise,
            correction: self.config.correction,
            generated_at: unix_timestamp(),
        })
    }
}

/// Compare groups with the default (legacy-compatible) configuration
///
/// # Example
/// ```
/// use rl_compare::comparison::{compare, SampleGroup};
///
/// let groups = vec![
///     SampleGroup::new("dqn", vec![1.0, 2.0, 3.0]),
///     SampleGroup::new("ppo", vec![4.0, 5.0, 6.0]),
///     SampleGroup::new("sac", vec![2.0, 4.0, 6.0]),
/// ];
///
/// let report = compare(&groups).unwrap();
/// assert_eq!(report.pairwise.len(), 3);
/// assert_eq!(report.pairwise[0].group_a, "dqn");
/// assert_eq!(report.pairwise[0].group_b, "ppo");
/// ```
pub fn compare(groups: &[SampleGroup]) -> Result<ComparisonReport> {
    StatisticalComparator::default().compare(groups)
}

fn validate_groups(groups: &[SampleGroup], min_sample_size: usize) -> Result<()> {
    if groups.len() < 2 {
        return Err(ComparisonError::InvalidInput(format!(
            "comparison requires at least 2 groups, got {}",
            groups.len()
        )));
    }

    let mut seen = HashSet::new();
    for group in groups {
        if group.name.trim().is_empty() {
            return Err(ComparisonError::InvalidInput(
                "group names must be non-empty".to_string(),
            ));
        }
        if !seen.insert(group.name.as_str()) {
            return Err(ComparisonError::InvalidInput(format!(
                "duplicate group name '{}'",
                group.name
            )));
        }
        if group.len() < min_sample_size {
            return Err(ComparisonError::InvalidInput(format!(
                "group '{}' has {} observations, need at least {}",
                group.name,
                group.len(),
                min_sample_size
            )));
        }
    }

    Ok(())
}

fn rank_groups(groups: &[GroupSummary], higher_is_better: bool) -> Vec<RankedAlgorithm> {
    let mut ordered: Vec<&GroupSummary> = groups.iter().collect();
    // Stable: equal means keep input order
    ordered.sort_by(|a, b| {
        if higher_is_better {
            b.mean.total_cmp(&a.mean)
        } else {
            a.mean.total_cmp(&b.mean)
        }
    });

    let mut ranking: Vec<RankedAlgorithm> = Vec::with_capacity(ordered.len());
    for (position, group) in ordered.into_iter().enumerate() {
        let rank = match ranking.last() {
            Some(prev) if prev.mean == group.mean => prev.rank,
            _ => position + 1,
        };
        ranking.push(RankedAlgorithm {
            rank,
            name: group.name.clone(),
            mean: group.mean,
        });
    }

    ranking
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
