use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::batch::BatchScores;
use super::domain::Category;

/// Population-level view of a scored batch for dashboards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub evaluated_on: NaiveDate,
    pub participant_count: usize,
    pub mean_overall_score: f64,
    pub mean_base_score: f64,
    pub min_overall_score: Option<f64>,
    pub max_overall_score: Option<f64>,
    pub category_means: Vec<CategoryMean>,
    /// Participants per applied penalty tier value.
    pub penalty_tiers: BTreeMap<u8, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMean {
    pub category: Category,
    pub category_label: &'static str,
    pub mean_final_score: f64,
}

impl BatchScores {
    /// Means are accumulated in participant id order, so the summary is reproducible.
    pub fn summary(&self, evaluated_on: NaiveDate) -> BatchSummary {
        let participant_count = self.len();
        let mut overall_total = 0.0;
        let mut base_total = 0.0;
        let mut min_overall: Option<f64> = None;
        let mut max_overall: Option<f64> = None;
        let mut category_totals = [0.0_f64; 6];
        let mut penalty_tiers = BTreeMap::new();

        for (_, result) in self.iter() {
            overall_total += result.overall_score;
            base_total += result.base_score;
            min_overall = Some(min_overall.map_or(result.overall_score, |min| {
                min.min(result.overall_score)
            }));
            max_overall = Some(max_overall.map_or(result.overall_score, |max| {
                max.max(result.overall_score)
            }));

            for score in result.category_scores.values() {
                category_totals[score.category.index()] += score.final_score;
            }

            if result.penalty_applicable {
                *penalty_tiers.entry(result.penalty_deduction).or_insert(0) += 1;
            }
        }

        let mean = |total: f64| {
            if participant_count == 0 {
                0.0
            } else {
                total / participant_count as f64
            }
        };

        let category_means = Category::ordered()
            .into_iter()
            .map(|category| CategoryMean {
                category,
                category_label: category.label(),
                mean_final_score: mean(category_totals[category.index()]),
            })
            .collect();

        BatchSummary {
            evaluated_on,
            participant_count,
            mean_overall_score: mean(overall_total),
            mean_base_score: mean(base_total),
            min_overall_score: min_overall,
            max_overall_score: max_overall,
            category_means,
            penalty_tiers,
        }
    }
}
