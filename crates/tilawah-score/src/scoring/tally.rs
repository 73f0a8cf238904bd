//! Canonical per-participant reduction shared by row and batch evaluation.
//!
//! Observations are folded into severity histograms keyed in a total order, so the tally for a
//! multiset of observations is independent of arrival order and of how the input was chunked.
//! Merging adds integer counts only and is therefore exact.

use std::collections::BTreeMap;

use super::config::PenaltyTier;
use super::domain::{Category, SubType};

/// Bit pattern of a validated severity; monotone in the value for non-negative finite floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SeverityKey(u64);

impl SeverityKey {
    pub(crate) fn new(severity: f64) -> Self {
        // -0.0 + 0.0 == +0.0, so both zeros share one bucket.
        Self((severity + 0.0).to_bits())
    }

    pub(crate) fn value(self) -> f64 {
        f64::from_bits(self.0)
    }
}

/// Item count and severity histogram for one scored category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTally {
    pub(crate) item_count: u64,
    pub(crate) histogram: BTreeMap<(SubType, SeverityKey), u64>,
}

impl CategoryTally {
    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    pub(crate) fn record(&mut self, sub_type: SubType, severity: f64, occurrences: u64) {
        if occurrences == 0 {
            return;
        }
        self.item_count = self.item_count.saturating_add(occurrences);
        let bucket = self
            .histogram
            .entry((sub_type, SeverityKey::new(severity)))
            .or_insert(0);
        *bucket = bucket.saturating_add(occurrences);
    }

    pub(crate) fn merge(&mut self, other: CategoryTally) {
        self.item_count = self.item_count.saturating_add(other.item_count);
        for (key, occurrences) in other.histogram {
            let bucket = self.histogram.entry(key).or_insert(0);
            *bucket = bucket.saturating_add(occurrences);
        }
    }
}

/// Pengurangan items and the tiers of those that qualified (`severity > 0`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PenaltyTally {
    pub(crate) item_count: u64,
    pub(crate) qualifying: BTreeMap<PenaltyTier, u64>,
}

impl PenaltyTally {
    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    pub(crate) fn record(&mut self, tier: PenaltyTier, severity: f64, occurrences: u64) {
        if occurrences == 0 {
            return;
        }
        self.item_count = self.item_count.saturating_add(occurrences);
        if severity > 0.0 {
            let bucket = self.qualifying.entry(tier).or_insert(0);
            *bucket = bucket.saturating_add(occurrences);
        }
    }

    pub(crate) fn merge(&mut self, other: PenaltyTally) {
        self.item_count = self.item_count.saturating_add(other.item_count);
        for (tier, occurrences) in other.qualifying {
            let bucket = self.qualifying.entry(tier).or_insert(0);
            *bucket = bucket.saturating_add(occurrences);
        }
    }
}

/// Everything the engine needs to score one participant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantTally {
    pub(crate) categories: [CategoryTally; 6],
    pub(crate) penalty: PenaltyTally,
    pub(crate) assessment_count: u64,
}

impl ParticipantTally {
    pub fn category(&self, category: Category) -> &CategoryTally {
        &self.categories[category.index()]
    }

    pub fn penalty(&self) -> &PenaltyTally {
        &self.penalty
    }

    pub fn assessment_count(&self) -> u64 {
        self.assessment_count
    }

    pub fn is_empty(&self) -> bool {
        self.assessment_count == 0
    }

    pub(crate) fn record_scored(
        &mut self,
        category: Category,
        sub_type: SubType,
        severity: f64,
        occurrences: u64,
    ) {
        self.categories[category.index()].record(sub_type, severity, occurrences);
        self.count(occurrences);
    }

    pub(crate) fn record_penalty(&mut self, tier: PenaltyTier, severity: f64, occurrences: u64) {
        self.penalty.record(tier, severity, occurrences);
        self.count(occurrences);
    }

    pub(crate) fn record_other(&mut self, occurrences: u64) {
        self.count(occurrences);
    }

    /// Folds `other` into `self`; the result equals tallying both inputs together.
    pub fn merge(&mut self, other: ParticipantTally) {
        let ParticipantTally {
            categories,
            penalty,
            assessment_count,
        } = other;
        for (mine, theirs) in self.categories.iter_mut().zip(categories) {
            mine.merge(theirs);
        }
        self.penalty.merge(penalty);
        self.count(assessment_count);
    }

    fn count(&mut self, occurrences: u64) {
        self.assessment_count = self.assessment_count.saturating_add(occurrences);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_keys_order_like_values() {
        let values = [0.0, 0.25, 1.0, 1.5, 100.0, 1e300];
        for pair in values.windows(2) {
            assert!(SeverityKey::new(pair[0]) < SeverityKey::new(pair[1]));
        }
        assert_eq!(SeverityKey::new(-0.0), SeverityKey::new(0.0));
        assert_eq!(SeverityKey::new(1.5).value(), 1.5);
    }

    #[test]
    fn tallies_ignore_arrival_order() {
        let mut forward = ParticipantTally::default();
        forward.record_scored(Category::Makhraj, SubType::Default, 1.0, 1);
        forward.record_scored(Category::Makhraj, SubType::Default, 0.0, 2);
        forward.record_penalty(PenaltyTier::Partial, 1.0, 1);

        let mut backward = ParticipantTally::default();
        backward.record_penalty(PenaltyTier::Partial, 1.0, 1);
        backward.record_scored(Category::Makhraj, SubType::Default, 0.0, 1);
        backward.record_scored(Category::Makhraj, SubType::Default, 1.0, 1);
        backward.record_scored(Category::Makhraj, SubType::Default, 0.0, 1);

        assert_eq!(forward, backward);
        assert_eq!(forward.assessment_count(), 4);
        assert_eq!(forward.category(Category::Makhraj).item_count(), 3);
    }

    #[test]
    fn merge_matches_single_pass() {
        let mut left = ParticipantTally::default();
        left.record_scored(Category::Mad, SubType::Wajib, 2.0, 1);
        left.record_other(1);
        let mut right = ParticipantTally::default();
        right.record_scored(Category::Mad, SubType::Wajib, 2.0, 1);
        right.record_penalty(PenaltyTier::Void, 0.0, 1);

        let mut single = ParticipantTally::default();
        single.record_scored(Category::Mad, SubType::Wajib, 2.0, 2);
        single.record_other(1);
        single.record_penalty(PenaltyTier::Void, 0.0, 1);

        left.merge(right);
        assert_eq!(left, single);
    }

    #[test]
    fn zero_severity_penalties_never_qualify() {
        let mut tally = PenaltyTally::default();
        tally.record(PenaltyTier::Disqualified, 0.0, 3);
        assert_eq!(tally.item_count(), 3);
        assert!(tally.qualifying.is_empty());
    }

    #[test]
    fn zero_occurrence_rows_leave_no_trace() {
        let mut tally = ParticipantTally::default();
        tally.record_scored(Category::Sifat, SubType::Default, f64::MAX, 0);
        tally.record_penalty(PenaltyTier::Void, 1.0, 0);
        assert_eq!(tally, ParticipantTally::default());
    }
}
