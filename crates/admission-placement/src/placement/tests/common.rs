use crate::placement::domain::{
    AdmissionPlan, AdmissionTrack, CandidateScores, DepartmentIdentity, DepartmentListing,
    ExamThreshold, ExamType, FiveStandards, LastYearPassData, ScoreConversionTable,
    ScoringWeight, StandardsTable, ThresholdName,
};
use crate::placement::engine::PlacementRequest;

pub(super) fn general_standards() -> StandardsTable {
    StandardsTable::new(
        114,
        ExamType::General,
        vec![
            ("國文".to_string(), FiveStandards::new(13, 12, 10, 9, 7)),
            ("英文".to_string(), FiveStandards::new(13, 11, 8, 4, 3)),
            ("數學A".to_string(), FiveStandards::new(11, 9, 6, 4, 3)),
            ("數學B".to_string(), FiveStandards::new(12, 10, 6, 4, 3)),
            ("社會".to_string(), FiveStandards::new(13, 12, 10, 8, 7)),
            ("自然".to_string(), FiveStandards::new(13, 12, 9, 7, 5)),
        ],
    )
}

pub(super) fn subject_standards() -> StandardsTable {
    StandardsTable::new(
        114,
        ExamType::SubjectSpecific,
        vec![
            ("歷史".to_string(), FiveStandards::new(50, 43, 33, 23, 15)),
            ("地理".to_string(), FiveStandards::new(48, 41, 32, 22, 14)),
        ],
    )
}

pub(super) fn conversion_table() -> ScoreConversionTable {
    let mut table = ScoreConversionTable::new(113);
    for level in 0..=15u8 {
        table.insert("國文", level, level.saturating_mul(4).saturating_sub(2));
    }
    table
}

/// The worked example: a humanities candidate with strong general scores.
pub(super) fn candidate() -> CandidateScores {
    CandidateScores::default()
        .with_general("chinese", 13)
        .with_general("english", 12)
        .with_general("math_a", 14)
        .with_general("social", 12)
        .with_general("nature", 13)
        .with_subject("history", 45)
        .with_subject("geography", 42)
}

pub(super) fn threshold(subject: &str, name: ThresholdName, group: u32) -> ExamThreshold {
    ExamThreshold {
        subject: subject.to_string(),
        exam_type: ExamType::General,
        threshold: Some(name),
        group,
    }
}

pub(super) fn weight(subject: &str, source_type: ExamType, multiplier: f64) -> ScoringWeight {
    ScoringWeight {
        subject: subject.to_string(),
        source_type,
        multiplier,
    }
}

pub(super) fn identity(school: &str, department: &str) -> DepartmentIdentity {
    DepartmentIdentity {
        school_id: format!("{school}-id"),
        school_name: school.to_string(),
        school_type: "公立".to_string(),
        department_id: format!("{school}-{department}"),
        department_name: department.to_string(),
        college: "文學院".to_string(),
        academic_group: "文史哲".to_string(),
        region: None,
    }
}

pub(super) fn plan(
    thresholds: Vec<ExamThreshold>,
    weights: Vec<ScoringWeight>,
    min_score: Option<f64>,
) -> AdmissionPlan {
    AdmissionPlan {
        exam_thresholds: thresholds,
        scoring_weights: weights,
        english_listening_threshold: None,
        quota: Some(40),
        last_year_pass_data: min_score.map(|min_score| LastYearPassData {
            min_score: Some(min_score),
            admission_count: Some(40),
            tie_breakers: vec!["國文".to_string()],
        }),
    }
}

pub(super) fn listing(school: &str, department: &str, plan: AdmissionPlan) -> DepartmentListing {
    DepartmentListing::new(identity(school, department), plan)
}

pub(super) fn request(departments: Vec<DepartmentListing>) -> PlacementRequest {
    PlacementRequest {
        academic_year: 114,
        admission_track: AdmissionTrack::DistributionAdmission,
        candidate: candidate(),
        general_standards: Some(general_standards()),
        subject_standards: Some(subject_standards()),
        conversion_table: None,
        departments,
    }
}
