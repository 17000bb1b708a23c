// Error taxonomy for the statistical comparison engine
//
// Every failure is raised where it is detected and propagated unchanged
// through `compare`. No error is ever folded into a sentinel number
// (0.0, NaN, infinity) inside a returned report.

use thiserror::Error;

/// Errors raised by pairwise tests, ANOVA and report assembly
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    /// Empty or non-finite sample group, too few groups, or duplicate names
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Total observations minus group count is not positive
    #[error(
        "Insufficient data: {observations} observations across {groups} groups leave no degrees of freedom within groups"
    )]
    InsufficientData { observations: usize, groups: usize },

    /// Zero variance where the statistic divides by it
    #[error("Degenerate variance: {0}")]
    DegenerateVariance(String),
}

impl ComparisonError {
    /// Short label a display layer can show instead of a fabricated number
    pub fn display_label(&self) -> &'static str {
        match self {
            ComparisonError::InvalidInput(_) => "invalid input",
            ComparisonError::InsufficientData { .. } => "insufficient data",
            ComparisonError::DegenerateVariance(_) => "degenerate distribution",
        }
    }
}

/// Result type for comparison operations
pub type Result<T> = std::result::Result<T, ComparisonError>;

/// Reject empty groups and non-finite observations
pub(crate) fn validate_group(name: &str, values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(ComparisonError::InvalidInput(format!(
            "sample group '{}' has no observations",
            name
        )));
    }

    if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
        return Err(ComparisonError::InvalidInput(format!(
            "sample group '{}' has a non-finite observation at index {}",
            name, pos
        )));
    }

    Ok(())
}
