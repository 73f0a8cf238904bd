//! Scoring engine for oral Quran-recitation assessments.
//!
//! Observations recorded by assessors are classified into the six scored categories plus the
//! Pengurangan penalty category, reduced into a canonical per-participant tally, and finalized
//! into a 0-100 breakdown. Row-oriented and batch evaluation share that tally, so both paths
//! produce bitwise-identical results for the same multiset of observations.

pub mod config;
pub mod error;
pub mod import;
pub mod scoring;
pub mod telemetry;

pub use scoring::{
    BatchEvaluator, BatchScores, BatchSummary, Category, CategoryRule, CategoryScoreResult,
    DeductionModel, FlatScores, GroupedObservation, ObservationRecord, ParticipantScoreResult,
    ParticipantTally, PenaltyOutcome, PenaltyRule, PenaltyTier, ScoringConfig, ScoringEngine,
    ScoringError, SubType,
};
