use std::collections::BTreeMap;

use super::config::PenaltyTier;
use super::domain::{CategoryScoreResult, ParticipantScoreResult};
use super::penalty::PenaltyOutcome;

/// Overall score assigned when a Void-tier penalty fires.
pub const VOID_OVERALL_SCORE: f64 = 10.0;

/// Points removed from the base score by a Partial-tier penalty.
pub const PARTIAL_PENALTY_POINTS: f64 = 50.0;

/// Applies the penalty tier to the summed category scores.
///
/// Disqualified and Void discard the base score entirely; Partial subtracts from it.
pub fn overall_score(base_score: f64, tier: PenaltyTier) -> f64 {
    match tier {
        PenaltyTier::Disqualified => 0.0,
        PenaltyTier::Void => VOID_OVERALL_SCORE,
        PenaltyTier::Partial => (base_score - PARTIAL_PENALTY_POINTS).max(0.0),
        PenaltyTier::Informational => base_score,
    }
}

pub fn compose(
    category_scores: impl IntoIterator<Item = CategoryScoreResult>,
    penalty: PenaltyOutcome,
    assessment_count: u64,
) -> ParticipantScoreResult {
    let category_scores: BTreeMap<_, _> = category_scores
        .into_iter()
        .map(|score| (score.category, score))
        .collect();

    // BTreeMap iteration keeps the summation order fixed.
    let base_score: f64 = category_scores
        .values()
        .map(|score| score.final_score)
        .sum();

    ParticipantScoreResult {
        base_score,
        penalty_deduction: penalty.tier.value(),
        penalty_applicable: penalty.applicable,
        overall_score: overall_score(base_score, penalty.tier),
        assessment_count,
        category_scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_compose_asymmetrically() {
        assert_eq!(overall_score(100.0, PenaltyTier::Disqualified), 0.0);
        assert_eq!(overall_score(100.0, PenaltyTier::Void), 10.0);
        assert_eq!(overall_score(3.0, PenaltyTier::Void), 10.0);
        assert_eq!(overall_score(98.5, PenaltyTier::Partial), 48.5);
        assert_eq!(overall_score(20.0, PenaltyTier::Partial), 0.0);
        assert_eq!(overall_score(98.5, PenaltyTier::Informational), 98.5);
    }

    #[test]
    fn penalty_deduction_reports_tier_not_effect() {
        let result = compose(
            Vec::new(),
            PenaltyOutcome {
                tier: PenaltyTier::Partial,
                applicable: true,
                qualifying_items: 1,
            },
            1,
        );
        assert_eq!(result.base_score, 0.0);
        assert_eq!(result.overall_score, 0.0);
        assert_eq!(result.penalty_deduction, 50);
    }
}
