use super::common::*;
use crate::placement::catalog::LISTENING_FAILURE_TAG;
use crate::placement::domain::{ExamThreshold, ExamType, ListeningGrade, ThresholdName};
use crate::placement::thresholds::{evaluate_thresholds, StandardsRef};

fn both_standards<'a>(
    general: &'a crate::placement::StandardsTable,
    specific: &'a crate::placement::StandardsTable,
) -> StandardsRef<'a> {
    StandardsRef {
        general: Some(general),
        subject_specific: Some(specific),
    }
}

#[test]
fn candidate_at_top_cutoff_clears_front_requirement() {
    let general = general_standards();
    let specific = subject_standards();
    let thresholds = vec![threshold("國文", ThresholdName::Front, 1)];

    let check = evaluate_thresholds(
        &thresholds,
        &candidate(),
        both_standards(&general, &specific),
        None,
    );

    assert!(check.all_pass);
    assert!(check.failed_subjects.is_empty());
    let detail = &check.details[0];
    assert_eq!(detail.candidate_score, 13);
    assert_eq!(detail.candidate_rank, 5);
    assert_eq!(detail.required_rank, 4);
    assert!(detail.pass);
}

#[test]
fn groups_are_or_within_and_across() {
    let general = general_standards();
    let specific = subject_standards();
    let thresholds = vec![
        threshold("國文", ThresholdName::Front, 1),
        threshold("數學B", ThresholdName::Bottom, 1),
        threshold("英文", ThresholdName::Average, 2),
    ];

    let check = evaluate_thresholds(
        &thresholds,
        &candidate(),
        both_standards(&general, &specific),
        None,
    );

    assert!(check.all_pass);
    assert_eq!(check.details.len(), 3);
    let math_b = check
        .details
        .iter()
        .find(|detail| detail.subject == "數學B")
        .expect("math B detail recorded");
    assert!(!math_b.pass);
    assert_eq!(math_b.candidate_rank, 0);
}

#[test]
fn failing_group_records_every_member_once() {
    let general = general_standards();
    let specific = subject_standards();
    let thresholds = vec![
        threshold("英文", ThresholdName::Average, 1),
        threshold("數學B", ThresholdName::Back, 2),
        threshold("社會", ThresholdName::Top, 2),
        threshold("數學B", ThresholdName::Bottom, 3),
    ];

    let check = evaluate_thresholds(
        &thresholds,
        &candidate(),
        both_standards(&general, &specific),
        None,
    );

    assert!(!check.all_pass);
    assert_eq!(check.failed_subjects, vec!["數學B", "社會"]);
    let groups: Vec<u32> = check.details.iter().map(|detail| detail.group).collect();
    assert_eq!(groups, vec![1, 2, 2, 3]);
}

#[test]
fn empty_threshold_list_passes_vacuously() {
    let check = evaluate_thresholds(&[], &candidate(), StandardsRef::default(), None);

    assert!(check.all_pass);
    assert!(check.failed_subjects.is_empty());
    assert!(check.details.is_empty());
}

#[test]
fn subjects_without_standards_are_not_gated() {
    let general = general_standards();
    let specific = subject_standards();
    let thresholds = vec![threshold("音樂", ThresholdName::Top, 1)];

    let check = evaluate_thresholds(
        &thresholds,
        &candidate(),
        both_standards(&general, &specific),
        None,
    );
    assert!(check.all_pass);
    assert_eq!(check.details[0].required_rank, 0);

    let without_tables = evaluate_thresholds(
        &[threshold("國文", ThresholdName::Top, 1)],
        &candidate().with_general("chinese", 2),
        StandardsRef::default(),
        None,
    );
    assert!(without_tables.all_pass);
}

#[test]
fn subject_specific_thresholds_use_their_own_table() {
    let general = general_standards();
    let specific = subject_standards();
    let thresholds = vec![ExamThreshold {
        subject: "歷史".to_string(),
        exam_type: ExamType::SubjectSpecific,
        threshold: Some(ThresholdName::Top),
        group: 1,
    }];

    let check = evaluate_thresholds(
        &thresholds,
        &candidate(),
        both_standards(&general, &specific),
        None,
    );

    assert!(!check.all_pass);
    assert_eq!(check.details[0].candidate_score, 45);
    assert_eq!(check.details[0].candidate_rank, 4);
    assert_eq!(check.failed_subjects, vec!["歷史"]);
}

#[test]
fn listening_grade_below_requirement_fails_the_gate() {
    let general = general_standards();
    let specific = subject_standards();
    let thresholds = vec![threshold("國文", ThresholdName::Average, 1)];
    let weak_listener = candidate().with_listening(ListeningGrade::C);

    let check = evaluate_thresholds(
        &thresholds,
        &weak_listener,
        both_standards(&general, &specific),
        Some(ListeningGrade::B),
    );

    assert!(!check.all_pass);
    assert_eq!(check.failed_subjects, vec![LISTENING_FAILURE_TAG]);
    assert!(check.details.iter().all(|detail| detail.pass));
}

#[test]
fn listening_requirement_met_or_unreported_passes() {
    let strong_listener = candidate().with_listening(ListeningGrade::A);
    let check = evaluate_thresholds(
        &[],
        &strong_listener,
        StandardsRef::default(),
        Some(ListeningGrade::B),
    );
    assert!(check.all_pass);

    let equal = evaluate_thresholds(
        &[],
        &candidate().with_listening(ListeningGrade::B),
        StandardsRef::default(),
        Some(ListeningGrade::B),
    );
    assert!(equal.all_pass);

    let unreported = evaluate_thresholds(
        &[],
        &candidate(),
        StandardsRef::default(),
        Some(ListeningGrade::A),
    );
    assert!(unreported.all_pass);
}

#[test]
fn out_of_range_scores_read_as_zero() {
    let general = general_standards();
    let specific = subject_standards();
    let inflated = candidate().with_general("chinese", 99);

    let check = evaluate_thresholds(
        &[threshold("國文", ThresholdName::Bottom, 1)],
        &inflated,
        both_standards(&general, &specific),
        None,
    );

    assert!(!check.all_pass);
    assert_eq!(check.details[0].candidate_score, 0);
}

#[test]
fn explicit_group_zero_joins_group_one() {
    let general = general_standards();
    let specific = subject_standards();
    let weak_chinese = candidate().with_general("chinese", 8);
    let thresholds = vec![
        threshold("國文", ThresholdName::Top, 0),
        threshold("英文", ThresholdName::Bottom, 1),
    ];

    let check = evaluate_thresholds(
        &thresholds,
        &weak_chinese,
        both_standards(&general, &specific),
        None,
    );

    assert!(check.all_pass);
    assert!(check.failed_subjects.is_empty());
    assert!(check.details.iter().all(|detail| detail.group == 1));
    assert!(!check.details[0].pass);
}

#[test]
fn unrecognised_threshold_labels_pass_their_group() {
    let general = general_standards();
    let specific = subject_standards();
    let mut unknown = threshold("數學B", ThresholdName::Top, 1);
    unknown.threshold = None;
    let thresholds = vec![
        unknown,
        threshold("數學B", ThresholdName::Bottom, 1),
        threshold("國文", ThresholdName::Front, 2),
    ];

    let check = evaluate_thresholds(
        &thresholds,
        &candidate(),
        both_standards(&general, &specific),
        None,
    );

    assert!(check.all_pass);
    assert_eq!(check.details.len(), 2);
}
