//! Constant lookup tables shared by the evaluators and the boundary parsers.

use super::domain::{ListeningGrade, ThresholdName};

/// Display name to canonical score key. Both exams share keys where the
/// source data does (數學A and 數學甲 both read the `math_a` score of their exam).
const SUBJECT_KEYS: [(&str, &str); 14] = [
    ("國文", "chinese"),
    ("英文", "english"),
    ("數學A", "math_a"),
    ("數學B", "math_b"),
    ("社會", "social"),
    ("自然", "nature"),
    ("數學甲", "math_a"),
    ("數學乙", "math_b"),
    ("物理", "physics"),
    ("化學", "chemistry"),
    ("生物", "biology"),
    ("歷史", "history"),
    ("地理", "geography"),
    ("公民與社會", "civic_society"),
];

/// Subjects examined by the general scholastic test.
pub const GENERAL_SUBJECTS: [&str; 6] = [
    "chinese", "english", "math_a", "math_b", "social", "nature",
];

/// Subjects examined by the subject-specific test.
pub const SUBJECT_SPECIFIC_SUBJECTS: [&str; 8] = [
    "math_a",
    "math_b",
    "physics",
    "chemistry",
    "biology",
    "history",
    "geography",
    "civic_society",
];

const REGIONS: [(&str, &[&str]); 7] = [
    ("北北基", &["臺北市", "新北市", "基隆市"]),
    ("桃竹苗", &["桃園市", "新竹縣", "新竹市", "苗栗縣"]),
    ("中彰投", &["臺中市", "彰化縣", "南投縣"]),
    ("雲嘉南", &["雲林縣", "嘉義縣", "嘉義市", "臺南市"]),
    ("高屏", &["高雄市", "屏東縣"]),
    ("宜花東", &["宜蘭縣", "花蓮縣", "臺東縣"]),
    ("離島", &["澎湖縣", "金門縣", "連江縣"]),
];

pub const OTHER_REGION: &str = "其他";

/// Failure tag recorded when the listening-grade requirement is not met.
pub const LISTENING_FAILURE_TAG: &str = "英聽";

const LISTENING_ORDER: [ListeningGrade; 4] = [
    ListeningGrade::A,
    ListeningGrade::B,
    ListeningGrade::C,
    ListeningGrade::F,
];

/// Canonical key for a subject given either its display name or its key.
pub fn subject_key(name: &str) -> String {
    let trimmed = name.trim();
    SUBJECT_KEYS
        .iter()
        .find(|(display, _)| *display == trimmed)
        .map(|(_, key)| (*key).to_string())
        .unwrap_or_else(|| trimmed.to_lowercase())
}

pub fn is_general_subject(subject: &str) -> bool {
    GENERAL_SUBJECTS.contains(&subject_key(subject).as_str())
}

pub const fn required_rank(name: ThresholdName) -> u8 {
    match name {
        ThresholdName::Top => 5,
        ThresholdName::Front => 4,
        ThresholdName::Average => 3,
        ThresholdName::Back => 2,
        ThresholdName::Bottom => 1,
    }
}

/// Position in the best-to-worst listening scale; lower is better.
pub fn listening_index(grade: ListeningGrade) -> usize {
    LISTENING_ORDER
        .iter()
        .position(|candidate| *candidate == grade)
        .unwrap_or(LISTENING_ORDER.len())
}

pub fn region_for_city(city: &str) -> &'static str {
    let city = city.trim().replace('台', "臺");
    REGIONS
        .iter()
        .find(|(_, cities)| cities.contains(&city.as_str()))
        .map(|(region, _)| *region)
        .unwrap_or(OTHER_REGION)
}
