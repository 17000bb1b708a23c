//! Sample acquisition for the comparison engine
//!
//! The engine never fetches or fabricates data itself. A [`SampleSource`]
//! turns recorded algorithm runs into one [`SampleGroup`] per algorithm for
//! a chosen metric, preserving the order algorithms were supplied in.

use crate::comparison::SampleGroup;
use crate::metric::{ComparisonMetric, EpisodeRecord};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while producing sample groups
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid sample file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Algorithm '{algorithm}' episode {episode} has no value for metric '{metric}'")]
    MissingMetric {
        algorithm: String,
        metric: ComparisonMetric,
        episode: usize,
    },

    #[error("Sample source contains no algorithms")]
    NoAlgorithms,
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Evaluation episodes recorded for one algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmRun {
    pub name: String,
    pub episodes: Vec<EpisodeRecord>,
}

impl AlgorithmRun {
    pub fn new(name: impl Into<String>, episodes: Vec<EpisodeRecord>) -> Self {
        Self {
            name: name.into(),
            episodes,
        }
    }

    /// Build a run from plain values of a single metric
    pub fn from_values(name: impl Into<String>, metric: ComparisonMetric, values: &[f64]) -> Self {
        Self::new(
            name,
            values
                .iter()
                .map(|&v| EpisodeRecord::with_metric(metric, v))
                .collect(),
        )
    }

    /// Extract one metric from every episode, failing on the first gap
    pub fn sample_group(&self, metric: ComparisonMetric) -> Result<SampleGroup> {
        let values = self
            .episodes
            .iter()
            .enumerate()
            .map(|(episode, record)| {
                metric
                    .extract(record)
                    .ok_or_else(|| SourceError::MissingMetric {
                        algorithm: self.name.clone(),
                        metric,
                        episode,
                    })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(SampleGroup::new(self.name.clone(), values))
    }
}

/// On-disk layout of a sample file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SampleFile {
    pub algorithms: Vec<AlgorithmRun>,
}

impl SampleFile {
    /// Parse a sample file from JSON text
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: SampleFile = serde_json::from_str(contents)?;
        if file.algorithms.is_empty() {
            return Err(SourceError::NoAlgorithms);
        }
        Ok(file)
    }
}

/// Capability to produce one sample group per algorithm for a metric
pub trait SampleSource {
    fn sample_groups(&self, metric: ComparisonMetric) -> Result<Vec<SampleGroup>>;
}

fn groups_from_runs(runs: &[AlgorithmRun], metric: ComparisonMetric) -> Result<Vec<SampleGroup>> {
    if runs.is_empty() {
        return Err(SourceError::NoAlgorithms);
    }
    runs.iter().map(|run| run.sample_group(metric)).collect()
}

/// Source over runs already held in memory (fixtures, upstream callers)
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    runs: Vec<AlgorithmRun>,
}

impl InMemorySource {
    pub fn new(runs: Vec<AlgorithmRun>) -> Self {
        Self { runs }
    }

    pub fn push(&mut self, run: AlgorithmRun) {
        self.runs.push(run);
    }
}

impl SampleSource for InMemorySource {
    fn sample_groups(&self, metric: ComparisonMetric) -> Result<Vec<SampleGroup>> {
        groups_from_runs(&self.runs, metric)
    }
}

/// Source reading a JSON sample file on every request
///
/// ```json
/// {"algorithms": [{"name": "dqn", "episodes": [{"total_reward": 12.5}]}]}
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<SampleFile> {
        let contents = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let file = SampleFile::from_json(&contents)?;
        tracing::debug!(
            "Loaded {} algorithms from {}",
            file.algorithms.len(),
            self.path.display()
        );
        Ok(file)
    }
}

impl SampleSource for JsonFileSource {
    fn sample_groups(&self, metric: ComparisonMetric) -> Result<Vec<SampleGroup>> {
        groups_from_runs(&self.load()?.algorithms, metric)
    }
}
