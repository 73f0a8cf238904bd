use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tilawah_score::config::AppConfig;
use tilawah_score::error::AppError;
use tilawah_score::import::ObservationImporter;
use tilawah_score::scoring::BatchTallies;
use tilawah_score::{telemetry, BatchEvaluator, BatchScores, ScoringEngine};
use tracing::info;

/// Loads configuration, installs logging and the batch pool, and compiles the rule tables.
pub(crate) fn bootstrap(rules: Option<PathBuf>) -> Result<ScoringEngine, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = rules {
        config.scoring.rules_path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    if let Some(threads) = config.scoring.batch_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let engine = config.scoring.build_engine()?;
    info!(
        environment = ?config.environment,
        threads = rayon::current_num_threads(),
        "scoring engine ready"
    );
    Ok(engine)
}

/// Streams the export straight into tallies so rows are never held in memory.
pub(crate) fn score_export(engine: &ScoringEngine, input: &Path) -> Result<BatchScores, AppError> {
    let mut tallies = BatchTallies::default();
    let mut rows = 0_u64;
    for row in ObservationImporter::from_path(input)? {
        tallies.observe_grouped(engine, &row?)?;
        rows += 1;
    }
    info!(
        path = %input.display(),
        rows,
        participants = tallies.len(),
        "imported observation export"
    );
    Ok(BatchEvaluator::new(engine).score(&tallies))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
