use super::domain::{CandidateScores, ExamType, ScoreConversionTable, ScoringWeight};
use super::normalizer::convert_15_to_60;

/// Full-scale score of a single weighted subject.
pub const SUBJECT_SCALE_MAX: f64 = 60.0;

/// Unrounded weighted total for one department.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightedScore {
    pub weighted_score: f64,
    pub max_possible_score: f64,
    pub estimated_subjects: Vec<String>,
}

impl WeightedScore {
    /// Percentage of the maximum, 0 when the department weights nothing.
    pub fn percentage(&self) -> f64 {
        if self.max_possible_score > 0.0 {
            self.weighted_score / self.max_possible_score * 100.0
        } else {
            0.0
        }
    }
}

pub fn calculate_weighted_score(
    weights: &[ScoringWeight],
    candidate: &CandidateScores,
    conversion: Option<&ScoreConversionTable>,
) -> WeightedScore {
    let mut total = WeightedScore::default();

    for weight in weights {
        let raw = candidate.score(weight.source_type, &weight.subject);
        let level_60 = match weight.source_type {
            ExamType::General => {
                let converted = convert_15_to_60(raw, conversion, &weight.subject);
                if converted.is_estimate() {
                    total.estimated_subjects.push(weight.subject.clone());
                }
                converted.level_60
            }
            ExamType::SubjectSpecific => raw,
        };

        total.weighted_score += f64::from(level_60) * weight.multiplier;
        total.max_possible_score += SUBJECT_SCALE_MAX * weight.multiplier;
    }

    total
}

/// Round to two decimals; applied only when building output records.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
