use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::DisplayLimits;
use super::domain::{AdmissionTrack, ConfidenceLevel, DepartmentResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfidenceCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub very_low: usize,
}

impl ConfidenceCounts {
    fn record(&mut self, level: ConfidenceLevel) {
        match level {
            ConfidenceLevel::High => self.high += 1,
            ConfidenceLevel::Medium => self.medium += 1,
            ConfidenceLevel::Low => self.low += 1,
            ConfidenceLevel::VeryLow => self.very_low += 1,
        }
    }

    pub fn get(&self, level: ConfidenceLevel) -> usize {
        match level {
            ConfidenceLevel::High => self.high,
            ConfidenceLevel::Medium => self.medium,
            ConfidenceLevel::Low => self.low,
            ConfidenceLevel::VeryLow => self.very_low,
        }
    }
}

/// Counts over the full evaluated set, before any truncation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementSummary {
    pub total_departments: usize,
    pub passed_threshold: usize,
    pub failed_threshold: usize,
    pub by_confidence: ConfidenceCounts,
}

/// Display buckets; confidence buckets hold only results that passed their thresholds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlacementBuckets {
    pub high_confidence: Vec<DepartmentResult>,
    pub medium_confidence: Vec<DepartmentResult>,
    pub low_confidence: Vec<DepartmentResult>,
    pub very_low_confidence: Vec<DepartmentResult>,
    pub failed_threshold: Vec<DepartmentResult>,
}

impl PlacementBuckets {
    pub fn confidence(&self, level: ConfidenceLevel) -> &[DepartmentResult] {
        match level {
            ConfidenceLevel::High => &self.high_confidence,
            ConfidenceLevel::Medium => &self.medium_confidence,
            ConfidenceLevel::Low => &self.low_confidence,
            ConfidenceLevel::VeryLow => &self.very_low_confidence,
        }
    }
}

/// Per-school pass/fail tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolPlacementSummary {
    pub school_id: String,
    pub school_name: String,
    pub total_departments: usize,
    pub passed_threshold: usize,
    pub failed_threshold: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub analysis_time: DateTime<Utc>,
    pub academic_year: u16,
    pub admission_track: AdmissionTrack,
    pub standards_year: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub summary: PlacementSummary,
    pub results: PlacementBuckets,
    pub schools: Vec<SchoolPlacementSummary>,
    pub metadata: ReportMetadata,
}

impl PlacementReport {
    /// Bucket already-sorted results. Each bucket keeps the input order.
    pub fn build(
        academic_year: u16,
        admission_track: AdmissionTrack,
        results: Vec<DepartmentResult>,
        limits: DisplayLimits,
    ) -> Self {
        let schools = school_summaries(&results);
        let total_departments = results.len();
        let mut by_confidence = ConfidenceCounts::default();
        let mut passed_threshold = 0;
        let mut buckets = PlacementBuckets::default();

        for result in results {
            if !result.passed_threshold() {
                buckets.failed_threshold.push(result);
                continue;
            }

            passed_threshold += 1;
            by_confidence.record(result.confidence_level);
            match result.confidence_level {
                ConfidenceLevel::High => buckets.high_confidence.push(result),
                ConfidenceLevel::Medium => buckets.medium_confidence.push(result),
                ConfidenceLevel::Low => buckets.low_confidence.push(result),
                ConfidenceLevel::VeryLow => buckets.very_low_confidence.push(result),
            }
        }

        let failed_threshold = buckets.failed_threshold.len();
        buckets.high_confidence.truncate(limits.high);
        buckets.medium_confidence.truncate(limits.medium);
        buckets.low_confidence.truncate(limits.low);
        buckets.very_low_confidence.truncate(limits.very_low);
        buckets.failed_threshold.truncate(limits.failed_threshold);

        Self {
            summary: PlacementSummary {
                total_departments,
                passed_threshold,
                failed_threshold,
                by_confidence,
            },
            results: buckets,
            schools,
            metadata: ReportMetadata {
                analysis_time: Utc::now(),
                academic_year,
                admission_track,
                standards_year: academic_year,
            },
        }
    }
}

fn school_summaries(results: &[DepartmentResult]) -> Vec<SchoolPlacementSummary> {
    let mut by_school: BTreeMap<&str, SchoolPlacementSummary> = BTreeMap::new();

    for result in results {
        let entry = by_school
            .entry(result.identity.school_id.as_str())
            .or_insert_with(|| SchoolPlacementSummary {
                school_id: result.identity.school_id.clone(),
                school_name: result.identity.school_name.clone(),
                total_departments: 0,
                passed_threshold: 0,
                failed_threshold: 0,
            });

        entry.total_departments += 1;
        if result.passed_threshold() {
            entry.passed_threshold += 1;
        } else {
            entry.failed_threshold += 1;
        }
    }

    by_school.into_values().collect()
}
