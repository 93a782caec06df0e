use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::catalog::subject_key;

/// Which national exam a score, threshold, or weight refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamType {
    /// 15-level general scholastic test (學測).
    #[serde(alias = "學測", alias = "gsat")]
    General,
    /// 60-level subject-specific test (分科).
    #[serde(alias = "分科", alias = "bifurcated")]
    SubjectSpecific,
}

impl ExamType {
    pub const fn max_score(self) -> u8 {
        match self {
            ExamType::General => 15,
            ExamType::SubjectSpecific => 60,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ExamType::General => "學測",
            ExamType::SubjectSpecific => "分科",
        }
    }
}

/// Selection channel a plan belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionTrack {
    PersonalApplication,
    DistributionAdmission,
    StarPlan,
}

impl AdmissionTrack {
    pub const fn label(self) -> &'static str {
        match self {
            AdmissionTrack::PersonalApplication => "personal_application",
            AdmissionTrack::DistributionAdmission => "distribution_admission",
            AdmissionTrack::StarPlan => "star_plan",
        }
    }
}

/// The five published cutoff bands, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdName {
    #[serde(alias = "頂標")]
    Top,
    #[serde(alias = "前標")]
    Front,
    #[serde(alias = "均標")]
    Average,
    #[serde(alias = "後標")]
    Back,
    #[serde(alias = "底標")]
    Bottom,
}

impl ThresholdName {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Top,
            Self::Front,
            Self::Average,
            Self::Back,
            Self::Bottom,
        ]
    }

    /// Accepts both the Chinese labels and the snake_case names.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|name| name.label() == raw || name.key() == raw.to_ascii_lowercase())
    }

    const fn key(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Front => "front",
            Self::Average => "average",
            Self::Back => "back",
            Self::Bottom => "bottom",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Top => "頂標",
            Self::Front => "前標",
            Self::Average => "均標",
            Self::Back => "後標",
            Self::Bottom => "底標",
        }
    }
}

/// English listening test grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListeningGrade {
    A,
    B,
    C,
    F,
}

impl ListeningGrade {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "F" => Some(Self::F),
            _ => None,
        }
    }
}

/// Cutoff scores for one subject, corresponding to ranks 5 through 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiveStandards {
    pub top: u8,
    pub front: u8,
    pub average: u8,
    pub back: u8,
    pub bottom: u8,
}

impl FiveStandards {
    pub const fn new(top: u8, front: u8, average: u8, back: u8, bottom: u8) -> Self {
        Self {
            top,
            front,
            average,
            back,
            bottom,
        }
    }

    pub const fn cutoff(&self, name: ThresholdName) -> u8 {
        match name {
            ThresholdName::Top => self.top,
            ThresholdName::Front => self.front,
            ThresholdName::Average => self.average,
            ThresholdName::Back => self.back,
            ThresholdName::Bottom => self.bottom,
        }
    }
}

/// Five-standard cutoffs for every subject of one exam in one academic year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardsTable {
    pub academic_year: u16,
    pub exam_type: ExamType,
    #[serde(deserialize_with = "canonical_subject_map")]
    pub subjects: BTreeMap<String, FiveStandards>,
}

impl StandardsTable {
    pub fn new(
        academic_year: u16,
        exam_type: ExamType,
        subjects: impl IntoIterator<Item = (String, FiveStandards)>,
    ) -> Self {
        Self {
            academic_year,
            exam_type,
            subjects: subjects
                .into_iter()
                .map(|(subject, standards)| (subject_key(&subject), standards))
                .collect(),
        }
    }

    pub fn cutoffs_for(&self, subject: &str) -> Option<&FiveStandards> {
        self.subjects.get(&subject_key(subject))
    }
}

/// Official 15-level to 60-level equivalence for each general-test subject.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreConversionTable {
    pub academic_year: u16,
    #[serde(deserialize_with = "canonical_subject_map")]
    pub subjects: BTreeMap<String, BTreeMap<u8, u8>>,
}

impl ScoreConversionTable {
    pub fn new(academic_year: u16) -> Self {
        Self {
            academic_year,
            subjects: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, subject: &str, level_15: u8, level_60: u8) {
        self.subjects
            .entry(subject_key(subject))
            .or_default()
            .insert(level_15, level_60);
    }

    pub fn lookup(&self, subject: &str, level_15: u8) -> Option<u8> {
        self.subjects
            .get(&subject_key(subject))
            .and_then(|levels| levels.get(&level_15))
            .copied()
    }

    pub fn has_subject(&self, subject: &str) -> bool {
        self.subjects.contains_key(&subject_key(subject))
    }
}

/// A candidate's raw scores as submitted. Values are kept signed so that
/// out-of-range input survives deserialization and can be clamped later.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CandidateScores {
    #[serde(default, alias = "gsat_scores", deserialize_with = "canonical_subject_map")]
    pub general_scores: BTreeMap<String, i32>,
    #[serde(
        default,
        alias = "bifurcated_scores",
        deserialize_with = "canonical_subject_map"
    )]
    pub subject_scores: BTreeMap<String, i32>,
    #[serde(
        default,
        alias = "english_listening",
        deserialize_with = "lenient_listening_grade"
    )]
    pub listening_grade: Option<ListeningGrade>,
}

impl CandidateScores {
    pub fn with_general(mut self, subject: &str, score: i32) -> Self {
        self.general_scores.insert(subject_key(subject), score);
        self
    }

    pub fn with_subject(mut self, subject: &str, score: i32) -> Self {
        self.subject_scores.insert(subject_key(subject), score);
        self
    }

    pub fn with_listening(mut self, grade: ListeningGrade) -> Self {
        self.listening_grade = Some(grade);
        self
    }

    /// Score on the exam's native scale; absent or out-of-range scores read as 0.
    pub fn score(&self, exam_type: ExamType, subject: &str) -> u8 {
        let scores = match exam_type {
            ExamType::General => &self.general_scores,
            ExamType::SubjectSpecific => &self.subject_scores,
        };

        match scores.get(&subject_key(subject)) {
            Some(&raw) if raw >= 0 && raw <= i32::from(exam_type.max_score()) => raw as u8,
            _ => 0,
        }
    }

    /// Subjects whose submitted score falls outside the exam's scale.
    pub fn out_of_range(&self) -> Vec<(ExamType, String, i32)> {
        let general = self
            .general_scores
            .iter()
            .map(|(subject, score)| (ExamType::General, subject, *score));
        let specific = self
            .subject_scores
            .iter()
            .map(|(subject, score)| (ExamType::SubjectSpecific, subject, *score));

        general
            .chain(specific)
            .filter(|(exam_type, _, score)| {
                *score < 0 || *score > i32::from(exam_type.max_score())
            })
            .map(|(exam_type, subject, score)| (exam_type, subject.clone(), score))
            .collect()
    }
}

/// One exam-threshold rule. Rules sharing a group are OR-combined; groups are AND-combined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamThreshold {
    pub subject: String,
    pub exam_type: ExamType,
    /// `None` when the source label is not one of the five standards.
    #[serde(default, deserialize_with = "lenient_threshold_name")]
    pub threshold: Option<ThresholdName>,
    #[serde(default = "default_group")]
    pub group: u32,
}

impl ExamThreshold {
    /// Group used for combination; an explicit 0 belongs to group 1.
    pub fn effective_group(&self) -> u32 {
        self.group.max(1)
    }
}

fn default_group() -> u32 {
    1
}

/// How one subject contributes to a department's weighted total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeight {
    pub subject: String,
    pub source_type: ExamType,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

/// Previous admission round outcome published with a plan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LastYearPassData {
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub admission_count: Option<u32>,
    #[serde(default)]
    pub tie_breakers: Vec<String>,
}

/// Admission rules for one department, year, and track.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdmissionPlan {
    #[serde(default)]
    pub exam_thresholds: Vec<ExamThreshold>,
    #[serde(default)]
    pub scoring_weights: Vec<ScoringWeight>,
    #[serde(default, deserialize_with = "lenient_listening_grade")]
    pub english_listening_threshold: Option<ListeningGrade>,
    #[serde(default)]
    pub quota: Option<u32>,
    #[serde(default)]
    pub last_year_pass_data: Option<LastYearPassData>,
}

impl AdmissionPlan {
    /// The plan's own published minimum, with 0 treated as "no history".
    pub fn published_min_score(&self) -> Option<f64> {
        self.last_year_pass_data
            .as_ref()
            .and_then(|data| data.min_score)
            .filter(|score| *score > 0.0)
    }
}

/// Identifying fields copied verbatim onto each result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepartmentIdentity {
    pub school_id: String,
    pub school_name: String,
    #[serde(default)]
    pub school_type: String,
    pub department_id: String,
    pub department_name: String,
    #[serde(default)]
    pub college: String,
    #[serde(default)]
    pub academic_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Engine-facing department record with historical data already resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentListing {
    #[serde(flatten)]
    pub identity: DepartmentIdentity,
    #[serde(default)]
    pub plan: Option<AdmissionPlan>,
    #[serde(default)]
    pub last_year_min_score: Option<f64>,
}

impl DepartmentListing {
    /// Listing whose history comes from the plan's own pass data.
    pub fn new(identity: DepartmentIdentity, plan: AdmissionPlan) -> Self {
        let last_year_min_score = plan.published_min_score();
        Self {
            identity,
            plan: Some(plan),
            last_year_min_score,
        }
    }
}

/// Discrete display bucket derived from the probability estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    VeryLow,
}

impl ConfidenceLevel {
    pub const fn ordered() -> [Self; 4] {
        [Self::High, Self::Medium, Self::Low, Self::VeryLow]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::VeryLow => "very_low",
        }
    }
}

/// Per-threshold audit line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdDetail {
    pub subject: String,
    pub exam_type: ExamType,
    pub required_threshold: ThresholdName,
    pub required_rank: u8,
    pub candidate_score: u8,
    pub candidate_rank: u8,
    pub pass: bool,
    pub group: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdCheck {
    pub all_pass: bool,
    pub failed_subjects: Vec<String>,
    pub details: Vec<ThresholdDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCalculation {
    pub weighted_score: f64,
    pub max_possible_score: f64,
    pub score_percentage: f64,
    /// General-test subjects converted with the linear 15→60 estimate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub estimated_subjects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalComparison {
    pub last_year_min_score: Option<f64>,
    pub user_vs_min: Option<f64>,
    pub probability_estimate: f64,
}

/// Analysis output for one department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentResult {
    #[serde(flatten)]
    pub identity: DepartmentIdentity,
    pub quota: Option<u32>,
    pub threshold_check: ThresholdCheck,
    pub score_calculation: ScoreCalculation,
    pub historical_comparison: HistoricalComparison,
    pub confidence_level: ConfidenceLevel,
}

impl DepartmentResult {
    pub fn passed_threshold(&self) -> bool {
        self.threshold_check.all_pass
    }

    pub fn probability(&self) -> f64 {
        self.historical_comparison.probability_estimate
    }
}

fn canonical_subject_map<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let raw = BTreeMap::<String, V>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(subject, value)| (subject_key(&subject), value))
        .collect())
}

fn lenient_listening_grade<'de, D>(deserializer: D) -> Result<Option<ListeningGrade>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("--") | Some("無") => Ok(None),
        Some(value) => ListeningGrade::parse(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown listening grade '{value}'"))),
    }
}

fn lenient_threshold_name<'de, D>(deserializer: D) -> Result<Option<ThresholdName>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(ThresholdName::parse))
}
