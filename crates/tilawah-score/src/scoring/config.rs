use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::classifier::normalize_tag;
use super::domain::{Category, SubType};
use crate::config::ConfigError;

/// Sum every valid rule table's initial scores must reach.
pub const SCORE_BUDGET: f64 = 100.0;

const BUDGET_TOLERANCE: f64 = 1e-9;

/// Rubric configuration: one rule per scored category plus the Pengurangan table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub categories: Vec<CategoryRule>,
    pub penalty: PenaltyRule,
}

/// Maximum contribution and deduction model for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub key: Category,
    pub initial_score: f64,
    pub deduction: DeductionModel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DeductionModel {
    /// Same rate for every item, with each item capped at its fair share of the budget.
    Flat { rate: f64 },
    /// Rate per sub-type, capped only at the category level.
    SubTyped {
        rates: BTreeMap<SubType, f64>,
        default_rate: f64,
    },
}

impl DeductionModel {
    pub fn rate_for(&self, sub_type: SubType) -> f64 {
        match self {
            DeductionModel::Flat { rate } => *rate,
            DeductionModel::SubTyped {
                rates,
                default_rate,
            } => rates.get(&sub_type).copied().unwrap_or(*default_rate),
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, DeductionModel::Flat { .. })
    }

    fn rates(&self) -> Vec<f64> {
        match self {
            DeductionModel::Flat { rate } => vec![*rate],
            DeductionModel::SubTyped {
                rates,
                default_rate,
            } => rates
                .values()
                .copied()
                .chain(std::iter::once(*default_rate))
                .collect(),
        }
    }
}

/// Discrete Pengurangan severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PenaltyTier {
    /// Recorded for reporting only.
    Informational,
    /// Fifty points lost from the base score.
    Partial,
    /// Assessment unusable; overall collapses to 10.
    Void,
    /// Assessment rejected outright; overall collapses to 0.
    Disqualified,
}

impl PenaltyTier {
    pub const fn value(self) -> u8 {
        match self {
            Self::Informational => 0,
            Self::Partial => 50,
            Self::Void => 90,
            Self::Disqualified => 100,
        }
    }
}

impl TryFrom<u8> for PenaltyTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Informational),
            50 => Ok(Self::Partial),
            90 => Ok(Self::Void),
            100 => Ok(Self::Disqualified),
            other => Err(format!(
                "penalty tier must be one of 0, 50, 90, 100 (found {other})"
            )),
        }
    }
}

impl From<PenaltyTier> for u8 {
    fn from(tier: PenaltyTier) -> Self {
        tier.value()
    }
}

/// Ordered label patterns for the Pengurangan category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyRule {
    pub patterns: Vec<PenaltyPattern>,
    pub default_tier: PenaltyTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyPattern {
    pub pattern: String,
    pub tier: PenaltyTier,
}

impl PenaltyRule {
    /// First declared pattern contained in the label wins; unmatched labels get the default.
    pub fn tier_for(&self, item_label: &str) -> PenaltyTier {
        let label = normalize_tag(item_label);
        self.patterns
            .iter()
            .find(|entry| label.contains(entry.pattern.as_str()))
            .map_or(self.default_tier, |entry| entry.tier)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let flat = |key, initial_score, rate| CategoryRule {
            key,
            initial_score,
            deduction: DeductionModel::Flat { rate },
        };
        let pattern = |pattern: &str, tier| PenaltyPattern {
            pattern: pattern.to_string(),
            tier,
        };

        Self {
            categories: vec![
                flat(Category::Makhraj, 55.5, 1.5),
                flat(Category::Sifat, 14.5, 0.5),
                CategoryRule {
                    key: Category::Ahkam,
                    initial_score: 8.0,
                    deduction: DeductionModel::SubTyped {
                        rates: BTreeMap::from([
                            (SubType::Tanaffus, 2.0),
                            (SubType::Izhhar, 1.0),
                            (SubType::Ghunnah, 0.5),
                        ]),
                        default_rate: 0.5,
                    },
                },
                CategoryRule {
                    key: Category::Mad,
                    initial_score: 13.5,
                    deduction: DeductionModel::SubTyped {
                        rates: BTreeMap::from([
                            (SubType::Thabii, 2.0),
                            (SubType::Qashr, 2.0),
                            (SubType::Wajib, 1.0),
                            (SubType::Lazim, 1.0),
                        ]),
                        default_rate: 0.5,
                    },
                },
                flat(Category::Gharib, 6.0, 1.0),
                flat(Category::Kelancaran, 2.5, 2.5),
            ],
            penalty: PenaltyRule {
                patterns: vec![
                    pattern("video tidak ada gambar", PenaltyTier::Informational),
                    pattern("cuma sebagian", PenaltyTier::Partial),
                    pattern("hanya sebagian", PenaltyTier::Partial),
                    pattern("tidak ada suara", PenaltyTier::Disqualified),
                    pattern("salah maqro", PenaltyTier::Disqualified),
                    pattern("tidak bisa membaca", PenaltyTier::Void),
                ],
                default_tier: PenaltyTier::Void,
            },
        }
    }
}

impl ScoringConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::RulesIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        serde_json::from_reader(reader).map_err(ConfigError::RulesJson)
    }

    /// Checks the budget invariants and returns the table ordered by category with
    /// penalty patterns normalized for matching.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        for category in Category::ordered() {
            match self
                .categories
                .iter()
                .filter(|rule| rule.key == category)
                .count()
            {
                0 => return Err(ConfigError::MissingCategory(category)),
                1 => {}
                _ => return Err(ConfigError::DuplicateCategory(category)),
            }
        }
        self.categories.sort_by_key(|rule| rule.key);

        for rule in &self.categories {
            if !rule.initial_score.is_finite() || rule.initial_score <= 0.0 {
                return Err(ConfigError::InvalidInitialScore {
                    category: rule.key,
                    value: rule.initial_score,
                });
            }
            if let Some(rate) = rule
                .deduction
                .rates()
                .into_iter()
                .find(|rate| !rate.is_finite() || *rate < 0.0)
            {
                return Err(ConfigError::InvalidRate {
                    category: rule.key,
                    value: rate,
                });
            }
        }

        let total: f64 = self.categories.iter().map(|rule| rule.initial_score).sum();
        if (total - SCORE_BUDGET).abs() > BUDGET_TOLERANCE {
            return Err(ConfigError::BudgetMismatch { total });
        }

        for (index, entry) in self.penalty.patterns.iter_mut().enumerate() {
            let normalized = normalize_tag(&entry.pattern);
            if normalized.is_empty() {
                return Err(ConfigError::EmptyPenaltyPattern { index });
            }
            entry.pattern = normalized;
        }

        Ok(self)
    }

    /// Rule for `category`; only meaningful on a validated table.
    pub fn rule(&self, category: Category) -> Option<&CategoryRule> {
        self.categories.iter().find(|rule| rule.key == category)
    }
}
