mod batch;
mod classifier;
mod composer;
mod config;
mod deduction;
mod domain;
mod penalty;
mod summary;
mod tally;

#[cfg(test)]
mod tests;

pub use batch::{BatchEvaluator, BatchScores, BatchTallies};
pub use classifier::classify;
pub use composer::{compose, overall_score, PARTIAL_PENALTY_POINTS, VOID_OVERALL_SCORE};
pub use config::{
    CategoryRule, DeductionModel, PenaltyPattern, PenaltyRule, PenaltyTier, ScoringConfig,
    SCORE_BUDGET,
};
pub use deduction::{score_category, CategoryItem};
pub use domain::{
    Category, CategoryScoreResult, Classification, FlatScores, GroupedObservation,
    ObservationRecord, ParticipantScoreResult, SubType,
};
pub use penalty::{evaluate_penalty, PenaltyOutcome};
pub use summary::{BatchSummary, CategoryMean};
pub use tally::{CategoryTally, ParticipantTally, PenaltyTally};

use crate::config::ConfigError;
use deduction::finalize_category;

/// Rejected input; the engine never clamps or skips a bad observation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error(
        "error severity for participant '{participant_id}' item '{item_label}' must be finite and non-negative (found {value})"
    )]
    InvalidSeverity {
        participant_id: String,
        item_label: String,
        value: f64,
    },
}

pub(crate) fn checked_severity(
    value: f64,
    participant_id: &str,
    item_label: &str,
) -> Result<f64, ScoringError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ScoringError::InvalidSeverity {
            participant_id: participant_id.to_string(),
            item_label: item_label.to_string(),
            value,
        })
    }
}

/// Stateless evaluator holding the validated rule tables.
///
/// Every entry point reduces its input to a [`ParticipantTally`] and finalizes it with
/// [`ScoringEngine::score_tally`], so row and batch evaluation cannot drift apart.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            config: config.validated()?,
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn rule(&self, category: Category) -> &CategoryRule {
        // Validation sorts the table into `Category::ordered()` order.
        &self.config.categories[category.index()]
    }

    /// Folds `occurrences` identical observations into `tally`.
    pub fn observe(
        &self,
        tally: &mut ParticipantTally,
        participant_id: &str,
        raw_category: &str,
        item_label: &str,
        error_severity: f64,
        occurrences: u64,
    ) -> Result<(), ScoringError> {
        let severity = checked_severity(error_severity, participant_id, item_label)?;
        match classify(raw_category, item_label) {
            Classification::Scored { category, sub_type } => {
                tally.record_scored(category, sub_type, severity, occurrences)
            }
            Classification::Penalty => {
                let tier = self.config.penalty.tier_for(item_label);
                tally.record_penalty(tier, severity, occurrences)
            }
            Classification::Other => tally.record_other(occurrences),
        }
        Ok(())
    }

    pub fn tally<'a, I>(&self, records: I) -> Result<ParticipantTally, ScoringError>
    where
        I: IntoIterator<Item = &'a ObservationRecord>,
    {
        let mut tally = ParticipantTally::default();
        for record in records {
            self.observe(
                &mut tally,
                &record.participant_id,
                &record.raw_category,
                &record.item_label,
                record.error_severity,
                1,
            )?;
        }
        Ok(tally)
    }

    pub fn tally_grouped<'a, I>(&self, rows: I) -> Result<ParticipantTally, ScoringError>
    where
        I: IntoIterator<Item = &'a GroupedObservation>,
    {
        let mut tally = ParticipantTally::default();
        for row in rows {
            self.observe(
                &mut tally,
                &row.participant_id,
                &row.raw_category,
                &row.item_label,
                row.error_severity,
                row.occurrences,
            )?;
        }
        Ok(tally)
    }

    pub fn score_tally(&self, tally: &ParticipantTally) -> ParticipantScoreResult {
        let category_scores = Category::ordered()
            .into_iter()
            .map(|category| finalize_category(self.rule(category), tally.category(category)));
        compose(
            category_scores,
            tally.penalty().outcome(),
            tally.assessment_count(),
        )
    }

    /// Row-oriented evaluation of one participant's complete observation set.
    pub fn score(
        &self,
        records: &[ObservationRecord],
    ) -> Result<ParticipantScoreResult, ScoringError> {
        let tally = self.tally(records)?;
        Ok(self.score_tally(&tally))
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        let mut config = ScoringConfig::default();
        config.categories.sort_by_key(|rule| rule.key);
        Self { config }
    }
}
