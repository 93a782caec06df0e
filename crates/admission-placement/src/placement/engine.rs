use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::config::PlacementConfig;
use super::domain::{
    AdmissionPlan, AdmissionTrack, CandidateScores, DepartmentListing, DepartmentResult,
    HistoricalComparison, ScoreCalculation, ScoreConversionTable, StandardsTable,
};
use super::probability::estimate_probability;
use super::report::PlacementReport;
use super::scoring::{calculate_weighted_score, round2};
use super::thresholds::{evaluate_thresholds, StandardsRef};
use super::validation::{PlacementError, RequestGuard};

/// Everything one analysis needs, already fetched by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub academic_year: u16,
    #[serde(alias = "admission_type")]
    pub admission_track: AdmissionTrack,
    #[serde(default)]
    pub candidate: CandidateScores,
    #[serde(default)]
    pub general_standards: Option<StandardsTable>,
    #[serde(default)]
    pub subject_standards: Option<StandardsTable>,
    #[serde(default)]
    pub conversion_table: Option<ScoreConversionTable>,
    #[serde(default)]
    pub departments: Vec<DepartmentListing>,
}

/// Stateless evaluator applying admission plans to a candidate's scores.
pub struct PlacementEngine {
    config: PlacementConfig,
    guard: RequestGuard,
}

impl PlacementEngine {
    pub fn new(config: PlacementConfig) -> Self {
        let guard = RequestGuard::new(config.supported_years.clone());
        Self { config, guard }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Evaluate every department that has a plan, sorted by descending
    /// probability and then school name.
    pub fn evaluate(
        &self,
        request: &PlacementRequest,
    ) -> Result<Vec<DepartmentResult>, PlacementError> {
        self.guard.validate(request)?;

        let standards = StandardsRef {
            general: request.general_standards.as_ref(),
            subject_specific: request.subject_standards.as_ref(),
        };

        let mut skipped = 0usize;
        let mut results: Vec<DepartmentResult> = request
            .departments
            .iter()
            .filter_map(|listing| match &listing.plan {
                Some(plan) => Some(evaluate_department(listing, plan, request, standards)),
                None => {
                    skipped += 1;
                    None
                }
            })
            .collect();

        if skipped > 0 {
            tracing::debug!(skipped, "departments without a plan for the requested track");
        }

        sort_results(&mut results);
        Ok(results)
    }

    /// Evaluate and bucket results into a display report.
    pub fn analyze(&self, request: &PlacementRequest) -> Result<PlacementReport, PlacementError> {
        let results = self.evaluate(request)?;
        let report = PlacementReport::build(
            request.academic_year,
            request.admission_track,
            results,
            self.config.display_limits,
        );

        tracing::info!(
            academic_year = request.academic_year,
            track = request.admission_track.label(),
            total = report.summary.total_departments,
            passed = report.summary.passed_threshold,
            "placement analysis complete"
        );

        Ok(report)
    }
}

fn evaluate_department(
    listing: &DepartmentListing,
    plan: &AdmissionPlan,
    request: &PlacementRequest,
    standards: StandardsRef<'_>,
) -> DepartmentResult {
    let threshold_check = evaluate_thresholds(
        &plan.exam_thresholds,
        &request.candidate,
        standards,
        plan.english_listening_threshold,
    );

    let weighted = calculate_weighted_score(
        &plan.scoring_weights,
        &request.candidate,
        request.conversion_table.as_ref(),
    );

    let last_year_min_score = listing.last_year_min_score.filter(|score| *score > 0.0);
    let estimate = estimate_probability(
        weighted.weighted_score,
        last_year_min_score,
        threshold_check.all_pass,
    );

    DepartmentResult {
        identity: listing.identity.clone(),
        quota: plan.quota,
        threshold_check,
        score_calculation: ScoreCalculation {
            weighted_score: round2(weighted.weighted_score),
            max_possible_score: round2(weighted.max_possible_score),
            score_percentage: round2(weighted.percentage()),
            estimated_subjects: weighted.estimated_subjects,
        },
        historical_comparison: HistoricalComparison {
            last_year_min_score,
            user_vs_min: last_year_min_score.map(|min| round2(weighted.weighted_score - min)),
            probability_estimate: round2(estimate.probability),
        },
        confidence_level: estimate.confidence_level,
    }
}

/// Descending probability, ties broken by ascending school name.
pub fn sort_results(results: &mut [DepartmentResult]) {
    results.sort_by(|a, b| {
        b.probability()
            .partial_cmp(&a.probability())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.identity.school_name.cmp(&b.identity.school_name))
    });
}
