use serde::{Deserialize, Serialize};

use super::config::{PenaltyRule, PenaltyTier};
use super::domain::ObservationRecord;
use super::tally::PenaltyTally;
use super::{checked_severity, ScoringError};

/// Result of inspecting the Pengurangan items of one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyOutcome {
    pub tier: PenaltyTier,
    pub applicable: bool,
    pub qualifying_items: u64,
}

impl PenaltyOutcome {
    pub const NONE: Self = Self {
        tier: PenaltyTier::Informational,
        applicable: false,
        qualifying_items: 0,
    };
}

impl PenaltyTally {
    /// The most severe qualifying tier wins; without qualifying items nothing applies.
    pub fn outcome(&self) -> PenaltyOutcome {
        match self.qualifying.keys().next_back() {
            Some(&tier) => PenaltyOutcome {
                tier,
                applicable: true,
                qualifying_items: self.qualifying.values().sum(),
            },
            None => PenaltyOutcome::NONE,
        }
    }
}

/// Evaluates Pengurangan observations against the penalty table.
pub fn evaluate_penalty<'a, I>(rule: &PenaltyRule, items: I) -> Result<PenaltyOutcome, ScoringError>
where
    I: IntoIterator<Item = &'a ObservationRecord>,
{
    let mut tally = PenaltyTally::default();
    for item in items {
        let severity =
            checked_severity(item.error_severity, &item.participant_id, &item.item_label)?;
        tally.record(rule.tier_for(&item.item_label), severity, 1);
    }
    Ok(tally.outcome())
}
