use crate::scoring::{ObservationRecord, ScoringConfig, ScoringEngine};

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default()).expect("default rules valid")
}

pub(super) fn observation(
    participant_id: &str,
    raw_category: &str,
    item_label: &str,
    error_severity: f64,
) -> ObservationRecord {
    ObservationRecord::new(
        participant_id,
        "assessor-1",
        raw_category,
        item_label,
        error_severity,
    )
}

/// One item per scored category, all without errors.
pub(super) fn perfect_sheet(participant_id: &str) -> Vec<ObservationRecord> {
    vec![
        observation(participant_id, "makhraj", "\u{0628}", 0.0),
        observation(participant_id, "sifat", "Hams", 0.0),
        observation(participant_id, "ahkam", "Izhar Halqi", 0.0),
        observation(participant_id, "mad", "Mad Thabi'i", 0.0),
        observation(participant_id, "gharib", "Isymam", 0.0),
        observation(participant_id, "kelancaran", "Kelancaran", 0.0),
    ]
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
