use std::collections::BTreeMap;

use super::catalog::{listening_index, required_rank, LISTENING_FAILURE_TAG};
use super::domain::{
    CandidateScores, ExamThreshold, ExamType, ListeningGrade, StandardsTable, ThresholdCheck,
    ThresholdDetail, ThresholdName,
};
use super::normalizer::rank_of;

/// Standards tables for both exams, either of which may be unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardsRef<'a> {
    pub general: Option<&'a StandardsTable>,
    pub subject_specific: Option<&'a StandardsTable>,
}

impl<'a> StandardsRef<'a> {
    fn for_exam(&self, exam_type: ExamType) -> Option<&'a StandardsTable> {
        match exam_type {
            ExamType::General => self.general,
            ExamType::SubjectSpecific => self.subject_specific,
        }
    }
}

/// Evaluate a department's exam thresholds and listening requirement.
pub fn evaluate_thresholds(
    thresholds: &[ExamThreshold],
    candidate: &CandidateScores,
    standards: StandardsRef<'_>,
    listening_requirement: Option<ListeningGrade>,
) -> ThresholdCheck {
    let mut groups: BTreeMap<u32, Vec<&ExamThreshold>> = BTreeMap::new();
    for threshold in thresholds {
        groups
            .entry(threshold.effective_group())
            .or_default()
            .push(threshold);
    }

    let mut details = Vec::with_capacity(thresholds.len());
    let mut failed_subjects: Vec<String> = Vec::new();
    let mut all_pass = true;

    for (group, members) in groups {
        let mut group_pass = false;

        for threshold in &members {
            let Some(name) = threshold.threshold else {
                // Unrecognised labels do not gate the group.
                tracing::warn!(
                    subject = %threshold.subject,
                    group,
                    "unrecognised threshold label, treated as passed"
                );
                group_pass = true;
                continue;
            };

            let detail = check_threshold(threshold, name, group, candidate, standards);
            group_pass |= detail.pass;
            details.push(detail);
        }

        if !group_pass {
            all_pass = false;
            for threshold in &members {
                push_unique(&mut failed_subjects, &threshold.subject);
            }
        }
    }

    if let (Some(required), Some(grade)) = (listening_requirement, candidate.listening_grade) {
        if listening_index(grade) > listening_index(required) {
            all_pass = false;
            push_unique(&mut failed_subjects, LISTENING_FAILURE_TAG);
        }
    }

    ThresholdCheck {
        all_pass,
        failed_subjects,
        details,
    }
}

fn check_threshold(
    threshold: &ExamThreshold,
    name: ThresholdName,
    group: u32,
    candidate: &CandidateScores,
    standards: StandardsRef<'_>,
) -> ThresholdDetail {
    let candidate_score = candidate.score(threshold.exam_type, &threshold.subject);
    let cutoffs = standards
        .for_exam(threshold.exam_type)
        .and_then(|table| table.cutoffs_for(&threshold.subject));

    // Subjects without published standards are not gated.
    let (required, candidate_rank) = match cutoffs {
        Some(cutoffs) => (
            required_rank(name),
            rank_of(candidate_score, cutoffs),
        ),
        None => (0, 0),
    };

    ThresholdDetail {
        subject: threshold.subject.clone(),
        exam_type: threshold.exam_type,
        required_threshold: name,
        required_rank: required,
        candidate_score,
        candidate_rank,
        pass: candidate_rank >= required,
        group,
    }
}

fn push_unique(subjects: &mut Vec<String>, subject: &str) {
    if !subjects.iter().any(|existing| existing == subject) {
        subjects.push(subject.to_string());
    }
}
