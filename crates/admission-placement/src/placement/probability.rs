use serde::{Deserialize, Serialize};

use super::domain::ConfidenceLevel;

/// Probability when no prior-year cutoff exists.
pub const NO_HISTORY_PROBABILITY: f64 = 0.5;

/// `(minimum score / last year's minimum, probability)`, highest bracket first.
const RATIO_LADDER: [(f64, f64); 6] = [
    (1.15, 0.95),
    (1.10, 0.85),
    (1.05, 0.75),
    (1.00, 0.65),
    (0.95, 0.45),
    (0.90, 0.30),
];

const BELOW_LADDER_PROBABILITY: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityEstimate {
    pub probability: f64,
    pub confidence_level: ConfidenceLevel,
}

/// Heuristic admission odds from the weighted score's ratio to last year's minimum.
pub fn estimate_probability(
    weighted_score: f64,
    last_year_min_score: Option<f64>,
    threshold_all_pass: bool,
) -> ProbabilityEstimate {
    if !threshold_all_pass {
        return ProbabilityEstimate {
            probability: 0.0,
            confidence_level: ConfidenceLevel::VeryLow,
        };
    }

    let min_score = match last_year_min_score {
        Some(score) if score != 0.0 => score,
        _ => {
            return ProbabilityEstimate {
                probability: NO_HISTORY_PROBABILITY,
                confidence_level: ConfidenceLevel::Medium,
            }
        }
    };

    let ratio = weighted_score / min_score;
    let probability = RATIO_LADDER
        .iter()
        .find(|(floor, _)| ratio >= *floor)
        .map(|(_, probability)| *probability)
        .unwrap_or(BELOW_LADDER_PROBABILITY);

    ProbabilityEstimate {
        probability,
        confidence_level: confidence_for(probability),
    }
}

pub fn confidence_for(probability: f64) -> ConfidenceLevel {
    if probability >= 0.7 {
        ConfidenceLevel::High
    } else if probability >= 0.5 {
        ConfidenceLevel::Medium
    } else if probability >= 0.3 {
        ConfidenceLevel::Low
    } else {
        ConfidenceLevel::VeryLow
    }
}
