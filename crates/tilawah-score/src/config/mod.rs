use std::env;
use std::fmt;
use std::path::PathBuf;

use tracing::info;

use crate::scoring::{Category, ScoringConfig, ScoringEngine};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the grader.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let rules_path = env::var("TILAWAH_RULES_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let batch_threads = match env::var("TILAWAH_BATCH_THREADS") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidBatchThreads(raw.clone()))?,
            )
            .filter(|threads| *threads > 0),
            _ => None,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringSettings {
                rules_path,
                batch_threads,
            },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the rule tables come from and how wide batch evaluation runs.
#[derive(Debug, Clone, Default)]
pub struct ScoringSettings {
    pub rules_path: Option<PathBuf>,
    /// `None` leaves the rayon default in place.
    pub batch_threads: Option<usize>,
}

impl ScoringSettings {
    /// Loads and validates the rule tables once; the engine owns them from here on.
    pub fn build_engine(&self) -> Result<ScoringEngine, ConfigError> {
        let config = match &self.rules_path {
            Some(path) => {
                info!(path = %path.display(), "loading scoring rules");
                ScoringConfig::from_path(path)?
            }
            None => ScoringConfig::default(),
        };
        ScoringEngine::new(config)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBatchThreads(String),
    RulesIo {
        path: PathBuf,
        source: std::io::Error,
    },
    RulesJson(serde_json::Error),
    MissingCategory(Category),
    DuplicateCategory(Category),
    InvalidInitialScore {
        category: Category,
        value: f64,
    },
    InvalidRate {
        category: Category,
        value: f64,
    },
    BudgetMismatch {
        total: f64,
    },
    EmptyPenaltyPattern {
        index: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBatchThreads(raw) => {
                write!(f, "TILAWAH_BATCH_THREADS must be a non-negative integer (found '{raw}')")
            }
            ConfigError::RulesIo { path, .. } => {
                write!(f, "unable to read scoring rules from {}", path.display())
            }
            ConfigError::RulesJson(err) => write!(f, "invalid scoring rules JSON: {err}"),
            ConfigError::MissingCategory(category) => {
                write!(f, "scoring rules are missing category {category}")
            }
            ConfigError::DuplicateCategory(category) => {
                write!(f, "scoring rules define category {category} more than once")
            }
            ConfigError::InvalidInitialScore { category, value } => write!(
                f,
                "initial score for {category} must be positive and finite (found {value})"
            ),
            ConfigError::InvalidRate { category, value } => write!(
                f,
                "deduction rate for {category} must be non-negative and finite (found {value})"
            ),
            ConfigError::BudgetMismatch { total } => {
                write!(f, "category initial scores must sum to 100 (found {total})")
            }
            ConfigError::EmptyPenaltyPattern { index } => {
                write!(f, "penalty pattern #{index} is empty")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::RulesIo { source, .. } => Some(source),
            ConfigError::RulesJson(err) => Some(err),
            _ => None,
        }
    }
}
