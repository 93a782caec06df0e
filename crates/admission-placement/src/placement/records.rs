//! Typed school documents as stored by the data layer, and their conversion
//! into engine-facing department listings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::region_for_city;
use super::domain::{AdmissionPlan, AdmissionTrack, DepartmentIdentity, DepartmentListing};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolDocument {
    pub school_id: String,
    pub school_name: String,
    #[serde(default)]
    pub school_type: String,
    #[serde(default)]
    pub campuses: Vec<CampusDocument>,
    #[serde(default)]
    pub departments: Vec<DepartmentDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusDocument {
    #[serde(default)]
    pub name: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentDocument {
    pub department_id: String,
    pub department_name: String,
    #[serde(default)]
    pub college: String,
    #[serde(default)]
    pub academic_group: String,
    /// Keyed by academic year.
    #[serde(default)]
    pub admission_data: BTreeMap<u16, YearAdmission>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct YearAdmission {
    #[serde(default)]
    pub plans: BTreeMap<AdmissionTrack, AdmissionPlan>,
}

impl DepartmentDocument {
    fn plan(&self, academic_year: u16, track: AdmissionTrack) -> Option<&AdmissionPlan> {
        self.admission_data
            .get(&academic_year)
            .and_then(|year| year.plans.get(&track))
    }

    /// Minimum admitted score of the round preceding `academic_year`.
    ///
    /// Each year's plan carries the previous round's outcome in its own
    /// `last_year_pass_data`.
    pub fn last_year_min_score(&self, academic_year: u16, track: AdmissionTrack) -> Option<f64> {
        self.plan(academic_year, track)
            .and_then(AdmissionPlan::published_min_score)
    }
}

/// One listing per department; departments without a plan for the year and
/// track keep `plan: None` and are skipped by the engine.
pub fn listings_for(
    schools: &[SchoolDocument],
    academic_year: u16,
    track: AdmissionTrack,
) -> Vec<DepartmentListing> {
    schools
        .iter()
        .flat_map(|school| {
            let region = school
                .campuses
                .first()
                .map(|campus| region_for_city(&campus.city).to_string());

            school.departments.iter().map(move |department| DepartmentListing {
                identity: DepartmentIdentity {
                    school_id: school.school_id.clone(),
                    school_name: school.school_name.clone(),
                    school_type: school.school_type.clone(),
                    department_id: department.department_id.clone(),
                    department_name: department.department_name.clone(),
                    college: department.college.clone(),
                    academic_group: department.academic_group.clone(),
                    region: region.clone(),
                },
                plan: department.plan(academic_year, track).cloned(),
                last_year_min_score: department.last_year_min_score(academic_year, track),
            })
        })
        .collect()
}
