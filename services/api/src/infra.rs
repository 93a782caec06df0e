use admission_placement::error::AppError;
use admission_placement::placement::{
    AdmissionTrack, PlacementConfig, PlacementEngine, ReferenceBundle,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) engine: Arc<PlacementEngine>,
    pub(crate) reference: Arc<ReferenceBundle>,
}

impl AppState {
    pub(crate) fn new(
        metrics: PrometheusHandle,
        config: PlacementConfig,
        reference: ReferenceBundle,
    ) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(metrics),
            engine: Arc::new(PlacementEngine::new(config)),
            reference: Arc::new(reference),
        }
    }
}

/// Load a reference bundle, or start empty when none was given.
pub(crate) fn load_reference(path: Option<&Path>) -> Result<ReferenceBundle, AppError> {
    match path {
        Some(path) => {
            let bundle = ReferenceBundle::from_path(path)?;
            tracing::info!(
                path = %path.display(),
                schools = bundle.schools.len(),
                "reference bundle loaded"
            );
            Ok(bundle)
        }
        None => {
            tracing::warn!("no reference bundle configured; analyses will find no departments");
            Ok(ReferenceBundle::default())
        }
    }
}

pub(crate) fn parse_track(raw: &str) -> Result<AdmissionTrack, String> {
    match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "personal_application" | "personal" => Ok(AdmissionTrack::PersonalApplication),
        "distribution_admission" | "distribution" => Ok(AdmissionTrack::DistributionAdmission),
        "star_plan" | "star" => Ok(AdmissionTrack::StarPlan),
        other => Err(format!(
            "unknown admission track '{other}' (expected personal_application, distribution_admission, or star_plan)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_track_accepts_short_and_dashed_forms() {
        assert_eq!(
            parse_track("distribution-admission"),
            Ok(AdmissionTrack::DistributionAdmission)
        );
        assert_eq!(parse_track(" Star "), Ok(AdmissionTrack::StarPlan));
        assert!(parse_track("lottery").is_err());
    }
}
