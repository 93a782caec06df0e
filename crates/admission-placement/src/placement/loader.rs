use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::catalog::subject_key;
use super::domain::{
    AdmissionTrack, CandidateScores, ExamType, FiveStandards, ScoreConversionTable,
    StandardsTable,
};
use super::engine::PlacementRequest;
use super::records::{listings_for, SchoolDocument};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read reference data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid reference CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid reference JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("conversion row for {subject} has level {level_15}, expected 0-15")]
    LevelOutOfRange { subject: String, level_15: u8 },
}

#[derive(Debug, Deserialize)]
struct StandardsRow {
    subject: String,
    top: u8,
    front: u8,
    average: u8,
    back: u8,
    bottom: u8,
}

#[derive(Debug, Deserialize)]
struct ConversionRow {
    subject: String,
    level_15: u8,
    level_60: u8,
}

/// Read `subject,top,front,average,back,bottom` rows.
pub fn standards_from_csv<R: Read>(
    reader: R,
    academic_year: u16,
    exam_type: ExamType,
) -> Result<StandardsTable, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut subjects = Vec::new();

    for row in csv_reader.deserialize::<StandardsRow>() {
        let row = row?;
        subjects.push((
            row.subject,
            FiveStandards::new(row.top, row.front, row.average, row.back, row.bottom),
        ));
    }

    Ok(StandardsTable::new(academic_year, exam_type, subjects))
}

/// Read `subject,level_15,level_60` rows.
pub fn conversions_from_csv<R: Read>(
    reader: R,
    academic_year: u16,
) -> Result<ScoreConversionTable, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut table = ScoreConversionTable::new(academic_year);

    for row in csv_reader.deserialize::<ConversionRow>() {
        let row = row?;
        if row.level_15 > 15 {
            return Err(LoadError::LevelOutOfRange {
                subject: subject_key(&row.subject),
                level_15: row.level_15,
            });
        }
        table.insert(&row.subject, row.level_15, row.level_60);
    }

    Ok(table)
}

/// Reference data for one analysis year, as exported by the data layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferenceBundle {
    #[serde(default)]
    pub general_standards: Option<StandardsTable>,
    #[serde(default)]
    pub subject_standards: Option<StandardsTable>,
    #[serde(default)]
    pub conversion_table: Option<ScoreConversionTable>,
    #[serde(default)]
    pub schools: Vec<SchoolDocument>,
}

impl ReferenceBundle {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Build a request for `candidate` against this bundle's tables and schools.
    pub fn request(
        &self,
        academic_year: u16,
        admission_track: AdmissionTrack,
        candidate: CandidateScores,
    ) -> PlacementRequest {
        PlacementRequest {
            academic_year,
            admission_track,
            candidate,
            general_standards: self.general_standards.clone(),
            subject_standards: self.subject_standards.clone(),
            conversion_table: self.conversion_table.clone(),
            departments: listings_for(&self.schools, academic_year, admission_track),
        }
    }

    /// The conversion table, when it is the one published for `academic_year`.
    pub fn conversion_for(&self, academic_year: u16) -> Option<&ScoreConversionTable> {
        self.conversion_table
            .as_ref()
            .filter(|table| table.academic_year == academic_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standards_csv_canonicalises_subjects() {
        let csv = "subject,top,front,average,back,bottom\n國文,13,12,10,9,7\n英文, 13, 11, 8, 4, 3\n";

        let table = standards_from_csv(csv.as_bytes(), 114, ExamType::General)
            .expect("standards parse");

        assert_eq!(
            table.cutoffs_for("chinese"),
            Some(&FiveStandards::new(13, 12, 10, 9, 7))
        );
        assert_eq!(table.cutoffs_for("英文").map(|c| c.front), Some(11));
    }

    #[test]
    fn conversion_csv_rejects_levels_above_fifteen() {
        let csv = "subject,level_15,level_60\nchinese,15,60\nchinese,16,60\n";

        match conversions_from_csv(csv.as_bytes(), 113) {
            Err(LoadError::LevelOutOfRange { subject, level_15 }) => {
                assert_eq!(subject, "chinese");
                assert_eq!(level_15, 16);
            }
            other => panic!("expected out-of-range error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_csv_rows_surface_as_csv_errors() {
        let csv = "subject,level_15,level_60\nchinese,abc,60\n";
        assert!(matches!(
            conversions_from_csv(csv.as_bytes(), 113),
            Err(LoadError::Csv(_))
        ));
    }
}
