//! rl-compare - Statistical comparison engine for RL handover algorithms
//!
//! This library compares named groups of performance samples (one group per
//! algorithm) with pairwise Mann-Whitney U tests and a one-way ANOVA, and
//! produces a serializable report for dashboards and write-ups.

pub mod cli;
pub mod comparison;
pub mod metric;
pub mod sample_source;
