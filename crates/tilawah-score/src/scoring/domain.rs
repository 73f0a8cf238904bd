use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The six scored pedagogical dimensions of a recitation assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Makhraj,
    Sifat,
    Ahkam,
    Mad,
    Gharib,
    Kelancaran,
}

impl Category {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Makhraj,
            Self::Sifat,
            Self::Ahkam,
            Self::Mad,
            Self::Gharib,
            Self::Kelancaran,
        ]
    }

    /// Position in `ordered()`.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Makhraj => "Makharijul Huruf",
            Self::Sifat => "Sifatul Huruf",
            Self::Ahkam => "Ahkamul Huruf",
            Self::Mad => "Ahkamul Mad",
            Self::Gharib => "Gharib",
            Self::Kelancaran => "Kelancaran",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Makhraj => "MAKHRAJ",
            Self::Sifat => "SIFAT",
            Self::Ahkam => "AHKAM",
            Self::Mad => "MAD",
            Self::Gharib => "GHARIB",
            Self::Kelancaran => "KELANCARAN",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Finer classification inside AHKAM and MAD, each carrying its own deduction rate.
///
/// Declaration order is also the tally key order, so it must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubType {
    Default,
    Tanaffus,
    Izhhar,
    #[serde(rename = "gunna")]
    Ghunnah,
    Thabii,
    Qashr,
    Wajib,
    Lazim,
}

/// Outcome of classifying one observation's category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Scored {
        category: Category,
        sub_type: SubType,
    },
    Penalty,
    Other,
}

/// One assessor's recorded error severity for one item on one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub participant_id: String,
    #[serde(default)]
    pub assessor_id: String,
    pub item_label: String,
    pub raw_category: String,
    pub error_severity: f64,
}

impl ObservationRecord {
    pub fn new(
        participant_id: impl Into<String>,
        assessor_id: impl Into<String>,
        raw_category: impl Into<String>,
        item_label: impl Into<String>,
        error_severity: f64,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            assessor_id: assessor_id.into(),
            item_label: item_label.into(),
            raw_category: raw_category.into(),
            error_severity,
        }
    }
}

/// Pre-grouped batch row: `occurrences` identical observations for one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedObservation {
    pub participant_id: String,
    pub item_label: String,
    pub raw_category: String,
    pub error_severity: f64,
    pub occurrences: u64,
}

impl From<&ObservationRecord> for GroupedObservation {
    fn from(record: &ObservationRecord) -> Self {
        Self {
            participant_id: record.participant_id.clone(),
            item_label: record.item_label.clone(),
            raw_category: record.raw_category.clone(),
            error_severity: record.error_severity,
            occurrences: 1,
        }
    }
}

/// Per-category outcome for one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScoreResult {
    pub category: Category,
    pub initial_score: f64,
    pub item_count: u64,
    pub total_raw_errors: f64,
    pub total_deduction: f64,
    pub final_score: f64,
}

/// Full breakdown produced for one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantScoreResult {
    pub category_scores: BTreeMap<Category, CategoryScoreResult>,
    pub base_score: f64,
    pub penalty_deduction: u8,
    pub penalty_applicable: bool,
    pub overall_score: f64,
    pub assessment_count: u64,
}

impl ParticipantScoreResult {
    pub fn final_score(&self, category: Category) -> f64 {
        self.category_scores
            .get(&category)
            .map_or(0.0, |score| score.final_score)
    }

    /// Convenience view with one named field per category.
    pub fn flat(&self) -> FlatScores {
        FlatScores {
            makhraj: self.final_score(Category::Makhraj),
            sifat: self.final_score(Category::Sifat),
            ahkam: self.final_score(Category::Ahkam),
            mad: self.final_score(Category::Mad),
            gharib: self.final_score(Category::Gharib),
            kelancaran: self.final_score(Category::Kelancaran),
            overall: self.overall_score,
        }
    }
}

/// Flattened score view for export and dashboard consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatScores {
    pub makhraj: f64,
    pub sifat: f64,
    pub ahkam: f64,
    pub mad: f64,
    pub gharib: f64,
    pub kelancaran: f64,
    pub overall: f64,
}
