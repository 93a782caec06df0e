use serde::{Deserialize, Serialize};

use super::catalog::{is_general_subject, subject_key};
use super::domain::{FiveStandards, ScoreConversionTable};

/// Each general-test level spans four subject-test levels.
pub const LINEAR_LEVEL_FACTOR: u8 = 4;

/// Rank 0..=5 of a score against a subject's five-standard cutoffs.
pub fn rank_of(score: u8, cutoffs: &FiveStandards) -> u8 {
    if score >= cutoffs.top {
        5
    } else if score >= cutoffs.front {
        4
    } else if score >= cutoffs.average {
        3
    } else if score >= cutoffs.back {
        2
    } else if score >= cutoffs.bottom {
        1
    } else {
        0
    }
}

/// Where a converted 60-level score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSource {
    /// Official per-level conversion table.
    Table,
    /// `level * 4`; degraded accuracy, used when the table has no entry.
    LinearEstimate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertedScore {
    pub level_60: u8,
    pub source: ConversionSource,
}

impl ConvertedScore {
    pub fn is_estimate(&self) -> bool {
        self.source == ConversionSource::LinearEstimate
    }
}

/// Convert a 15-level general score to the 60-level scale.
pub fn convert_15_to_60(
    score_15: u8,
    table: Option<&ScoreConversionTable>,
    subject: &str,
) -> ConvertedScore {
    match table.and_then(|table| table.lookup(subject, score_15)) {
        Some(level_60) => ConvertedScore {
            level_60,
            source: ConversionSource::Table,
        },
        None => {
            tracing::debug!(subject, score_15, "no conversion entry, using linear estimate");
            ConvertedScore {
                level_60: score_15.saturating_mul(LINEAR_LEVEL_FACTOR),
                source: ConversionSource::LinearEstimate,
            }
        }
    }
}

/// One requested conversion in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionQuery {
    pub subject: String,
    pub level_15: i32,
}

/// Outcome of one batch item; failures are reported per item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub subject: String,
    pub level_15: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_60: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ConversionSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn convert_batch(
    queries: &[ConversionQuery],
    table: Option<&ScoreConversionTable>,
) -> Vec<ConversionOutcome> {
    queries
        .iter()
        .map(|query| {
            let failed = |error: String| ConversionOutcome {
                subject: query.subject.clone(),
                level_15: query.level_15,
                level_60: None,
                source: None,
                error: Some(error),
            };

            if !is_general_subject(&query.subject) {
                return failed(format!("subject {} not found", subject_key(&query.subject)));
            }

            let level_15 = match u8::try_from(query.level_15) {
                Ok(level) if level <= 15 => level,
                _ => return failed(format!("level {} outside 0-15", query.level_15)),
            };

            let converted = convert_15_to_60(level_15, table, &query.subject);
            ConversionOutcome {
                subject: query.subject.clone(),
                level_15: query.level_15,
                level_60: Some(converted.level_60),
                source: Some(converted.source),
                error: None,
            }
        })
        .collect()
}
