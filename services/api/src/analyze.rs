use crate::infra::{load_reference, parse_track};
use admission_placement::config::AppConfig;
use admission_placement::error::AppError;
use admission_placement::placement::{
    convert_batch, AdmissionTrack, CandidateScores, ConfidenceLevel, ConversionQuery,
    ConversionSource, DepartmentResult, PlacementEngine, PlacementReport,
};
use admission_placement::telemetry;
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Reference bundle (JSON) with standards, conversion table, and schools
    #[arg(long)]
    pub(crate) bundle: PathBuf,
    /// Candidate scores (JSON) with general_scores, subject_scores, listening_grade
    #[arg(long)]
    pub(crate) scores: PathBuf,
    /// Academic year to analyse
    #[arg(long, default_value_t = 114)]
    pub(crate) year: u16,
    /// Admission track (personal_application, distribution_admission, star_plan)
    #[arg(long, value_parser = parse_track, default_value = "distribution_admission")]
    pub(crate) track: AdmissionTrack,
    /// Print the full report as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ConvertArgs {
    /// General test subject, e.g. chinese or 國文
    #[arg(long)]
    pub(crate) subject: String,
    /// 15-level score to convert
    #[arg(long)]
    pub(crate) level: i32,
    /// Reference bundle holding the official conversion table
    #[arg(long)]
    pub(crate) bundle: Option<PathBuf>,
    /// Year of the conversion table to use
    #[arg(long, default_value_t = 113)]
    pub(crate) year: u16,
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        bundle,
        scores,
        year,
        track,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let reference = load_reference(Some(&bundle))?;
    let candidate: CandidateScores = serde_json::from_reader(BufReader::new(File::open(scores)?))?;

    let engine = PlacementEngine::new(config.placement);
    let report = engine.analyze(&reference.request(year, track, candidate))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }

    Ok(())
}

pub(crate) fn run_convert(args: ConvertArgs) -> Result<(), AppError> {
    let reference = load_reference(args.bundle.as_deref())?;
    let table = reference.conversion_for(args.year);
    let query = ConversionQuery {
        subject: args.subject,
        level_15: args.level,
    };

    for outcome in convert_batch(std::slice::from_ref(&query), table) {
        match (outcome.level_60, outcome.error) {
            (Some(level_60), _) => {
                let source = match outcome.source {
                    Some(ConversionSource::Table) => "official table",
                    _ => "linear estimate",
                };
                println!(
                    "{} level {} -> {} ({source})",
                    outcome.subject, outcome.level_15, level_60
                );
            }
            (None, Some(error)) => println!("{}: {error}", outcome.subject),
            (None, None) => {}
        }
    }

    Ok(())
}

pub(crate) fn render_report(report: &PlacementReport) {
    let summary = &report.summary;
    println!(
        "Placement analysis for {} ({})",
        report.metadata.academic_year,
        report.metadata.admission_track.label()
    );
    println!(
        "Analysed {}",
        report.metadata.analysis_time.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "- {} departments | {} passed thresholds | {} failed",
        summary.total_departments, summary.passed_threshold, summary.failed_threshold
    );

    for level in ConfidenceLevel::ordered() {
        let shown = report.results.confidence(level);
        println!(
            "\n{} confidence ({} total, {} shown)",
            level.label(),
            summary.by_confidence.get(level),
            shown.len()
        );
        for result in shown {
            println!("- {}", describe(result));
        }
    }

    if !report.results.failed_threshold.is_empty() {
        println!("\nFailed thresholds ({} total)", summary.failed_threshold);
        for result in &report.results.failed_threshold {
            println!(
                "- {} {}: missed {}",
                result.identity.school_name,
                result.identity.department_name,
                result.threshold_check.failed_subjects.join(", ")
            );
        }
    }
}

fn describe(result: &DepartmentResult) -> String {
    let comparison = &result.historical_comparison;
    let history = match (comparison.last_year_min_score, comparison.user_vs_min) {
        (Some(min), Some(diff)) => format!("last year min {min:.2} ({diff:+.2})"),
        _ => "no history".to_string(),
    };

    format!(
        "{} {}: {:.0}% | score {:.2}/{:.2} | {}",
        result.identity.school_name,
        result.identity.department_name,
        comparison.probability_estimate * 100.0,
        result.score_calculation.weighted_score,
        result.score_calculation.max_possible_score,
        history
    )
}
