//! Set-based evaluation over many participants.
//!
//! Ingestion is a grouped reduction into one [`ParticipantTally`] per participant; raw rows are
//! dropped as soon as they are folded in. Scoring then runs per participant on the rayon pool.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use tracing::{debug, info};

use super::domain::{GroupedObservation, ObservationRecord, ParticipantScoreResult};
use super::tally::ParticipantTally;
use super::{ScoringEngine, ScoringError};

/// Per-participant tallies accumulated from a batch of observations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchTallies {
    participants: HashMap<String, ParticipantTally>,
}

impl BatchTallies {
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, participant_id: &str) -> Option<&ParticipantTally> {
        self.participants.get(participant_id)
    }

    pub fn observe(
        &mut self,
        engine: &ScoringEngine,
        record: &ObservationRecord,
    ) -> Result<(), ScoringError> {
        engine.observe(
            self.entry(&record.participant_id),
            &record.participant_id,
            &record.raw_category,
            &record.item_label,
            record.error_severity,
            1,
        )
    }

    pub fn observe_grouped(
        &mut self,
        engine: &ScoringEngine,
        row: &GroupedObservation,
    ) -> Result<(), ScoringError> {
        engine.observe(
            self.entry(&row.participant_id),
            &row.participant_id,
            &row.raw_category,
            &row.item_label,
            row.error_severity,
            row.occurrences,
        )
    }

    pub fn merge(&mut self, other: BatchTallies) {
        for (participant_id, tally) in other.participants {
            match self.participants.get_mut(&participant_id) {
                Some(existing) => existing.merge(tally),
                None => {
                    self.participants.insert(participant_id, tally);
                }
            }
        }
    }

    fn entry(&mut self, participant_id: &str) -> &mut ParticipantTally {
        self.participants
            .entry(participant_id.to_string())
            .or_default()
    }
}

/// Scored batch, ordered by participant id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchScores {
    results: BTreeMap<String, ParticipantScoreResult>,
}

impl BatchScores {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, participant_id: &str) -> Option<&ParticipantScoreResult> {
        self.results.get(participant_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParticipantScoreResult)> {
        self.results
            .iter()
            .map(|(participant_id, result)| (participant_id.as_str(), result))
    }

    pub fn into_inner(self) -> BTreeMap<String, ParticipantScoreResult> {
        self.results
    }
}

/// Batch front-end over a shared [`ScoringEngine`].
pub struct BatchEvaluator<'e> {
    engine: &'e ScoringEngine,
}

impl<'e> BatchEvaluator<'e> {
    pub fn new(engine: &'e ScoringEngine) -> Self {
        Self { engine }
    }

    /// Streams raw observations into tallies without retaining the rows.
    pub fn ingest<I>(&self, records: I) -> Result<BatchTallies, ScoringError>
    where
        I: IntoIterator<Item = ObservationRecord>,
    {
        let mut tallies = BatchTallies::default();
        for record in records {
            tallies.observe(self.engine, &record)?;
        }
        debug!(participants = tallies.len(), "ingested observation stream");
        Ok(tallies)
    }

    /// Streams pre-grouped rows (`GROUP BY participant, category, label, severity`).
    pub fn ingest_grouped<I>(&self, rows: I) -> Result<BatchTallies, ScoringError>
    where
        I: IntoIterator<Item = GroupedObservation>,
    {
        let mut tallies = BatchTallies::default();
        for row in rows {
            tallies.observe_grouped(self.engine, &row)?;
        }
        debug!(participants = tallies.len(), "ingested grouped rows");
        Ok(tallies)
    }

    /// Parallel fold/reduce over an in-memory slice; equal to [`Self::ingest`] on any split.
    pub fn ingest_parallel(
        &self,
        records: &[ObservationRecord],
    ) -> Result<BatchTallies, ScoringError> {
        let tallies = records
            .par_iter()
            .try_fold(BatchTallies::default, |mut tallies, record| {
                tallies.observe(self.engine, record)?;
                Ok::<_, ScoringError>(tallies)
            })
            .try_reduce(BatchTallies::default, |mut left, right| {
                left.merge(right);
                Ok(left)
            })?;
        debug!(
            rows = records.len(),
            participants = tallies.len(),
            "ingested observations in parallel"
        );
        Ok(tallies)
    }

    pub fn score(&self, tallies: &BatchTallies) -> BatchScores {
        let results: BTreeMap<String, ParticipantScoreResult> = tallies
            .participants
            .par_iter()
            .map(|(participant_id, tally)| {
                (participant_id.clone(), self.engine.score_tally(tally))
            })
            .collect();
        info!(participants = results.len(), "scored batch");
        BatchScores { results }
    }

    pub fn evaluate<I>(&self, records: I) -> Result<BatchScores, ScoringError>
    where
        I: IntoIterator<Item = ObservationRecord>,
    {
        let tallies = self.ingest(records)?;
        Ok(self.score(&tallies))
    }

    pub fn evaluate_grouped<I>(&self, rows: I) -> Result<BatchScores, ScoringError>
    where
        I: IntoIterator<Item = GroupedObservation>,
    {
        let tallies = self.ingest_grouped(rows)?;
        Ok(self.score(&tallies))
    }
}
