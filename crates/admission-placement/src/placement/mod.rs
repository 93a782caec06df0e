//! Placement analysis: threshold gating, weighted scoring, and admission
//! probability estimates for every department of a requested year and track.

pub mod catalog;
mod config;
pub mod domain;
mod engine;
pub mod loader;
pub mod normalizer;
mod probability;
pub mod records;
pub mod report;
mod scoring;
mod thresholds;
mod validation;

#[cfg(test)]
mod tests;

pub use config::{DisplayLimits, PlacementConfig};
pub use domain::{
    AdmissionPlan, AdmissionTrack, CandidateScores, ConfidenceLevel, DepartmentIdentity,
    DepartmentListing, DepartmentResult, ExamThreshold, ExamType, FiveStandards,
    HistoricalComparison, LastYearPassData, ListeningGrade, ScoreCalculation,
    ScoreConversionTable, ScoringWeight, StandardsTable, ThresholdCheck, ThresholdDetail,
    ThresholdName,
};
pub use engine::{sort_results, PlacementEngine, PlacementRequest};
pub use loader::{LoadError, ReferenceBundle};
pub use normalizer::{
    convert_15_to_60, convert_batch, rank_of, ConversionOutcome, ConversionQuery,
    ConversionSource, ConvertedScore,
};
pub use probability::{confidence_for, estimate_probability, ProbabilityEstimate};
pub use records::{listings_for, SchoolDocument};
pub use report::{PlacementReport, PlacementSummary};
pub use scoring::{calculate_weighted_score, round2, WeightedScore};
pub use thresholds::{evaluate_thresholds, StandardsRef};
pub use validation::{PlacementError, RequestGuard};
