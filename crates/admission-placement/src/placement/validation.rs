use super::domain::{DepartmentListing, ExamType};
use super::engine::PlacementRequest;

/// Input-contract violations rejected before evaluation begins.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PlacementError {
    #[error("academic year {year} is not supported (expected one of {supported:?})")]
    UnsupportedYear { year: u16, supported: Vec<u16> },
    #[error("{department_id}: weight for {subject} must be a positive number, found {multiplier}")]
    InvalidMultiplier {
        department_id: String,
        subject: String,
        multiplier: f64,
    },
    #[error("{exam:?} standards table is for {found}, analysis year is {expected}")]
    StandardsYearMismatch {
        exam: ExamType,
        expected: u16,
        found: u16,
    },
}

/// Boundary checks for a placement request. Out-of-range scores are not
/// rejected here; they read as 0 during evaluation.
#[derive(Debug, Clone, Default)]
pub struct RequestGuard {
    supported_years: Vec<u16>,
}

impl RequestGuard {
    pub fn new(supported_years: Vec<u16>) -> Self {
        Self { supported_years }
    }

    pub fn supported_years(&self) -> &[u16] {
        &self.supported_years
    }

    pub fn validate(&self, request: &PlacementRequest) -> Result<(), PlacementError> {
        if !self.supported_years.is_empty()
            && !self.supported_years.contains(&request.academic_year)
        {
            return Err(PlacementError::UnsupportedYear {
                year: request.academic_year,
                supported: self.supported_years.clone(),
            });
        }

        for table in [&request.general_standards, &request.subject_standards]
            .into_iter()
            .flatten()
        {
            if table.academic_year != request.academic_year {
                return Err(PlacementError::StandardsYearMismatch {
                    exam: table.exam_type,
                    expected: request.academic_year,
                    found: table.academic_year,
                });
            }
        }

        for listing in &request.departments {
            validate_listing(listing)?;
        }

        for (exam_type, subject, score) in request.candidate.out_of_range() {
            tracing::warn!(?exam_type, %subject, score, "score outside scale, treated as 0");
        }

        Ok(())
    }
}

fn validate_listing(listing: &DepartmentListing) -> Result<(), PlacementError> {
    let Some(plan) = &listing.plan else {
        return Ok(());
    };

    if let Some(weight) = plan
        .scoring_weights
        .iter()
        .find(|weight| !(weight.multiplier.is_finite() && weight.multiplier > 0.0))
    {
        return Err(PlacementError::InvalidMultiplier {
            department_id: listing.identity.department_id.clone(),
            subject: weight.subject.clone(),
            multiplier: weight.multiplier,
        });
    }

    Ok(())
}
