use super::config::{CategoryRule, DeductionModel};
use super::domain::{CategoryScoreResult, SubType};
use super::tally::CategoryTally;
use super::{checked_severity, ScoringError};

/// One already-classified observation inside a category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryItem {
    pub sub_type: SubType,
    pub error_severity: f64,
}

/// Scores a category from its classified items.
pub fn score_category(
    rule: &CategoryRule,
    items: &[CategoryItem],
) -> Result<CategoryScoreResult, ScoringError> {
    let mut tally = CategoryTally::default();
    for item in items {
        let severity = checked_severity(item.error_severity, "", rule.key.key())?;
        tally.record(item.sub_type, severity, 1);
    }
    Ok(finalize_category(rule, &tally))
}

/// Turns a category tally into its capped deduction and final score.
///
/// Flat models cap every item at `initial_score / item_count` before summing; sub-typed models
/// only cap the category total. Both clamp the total to `initial_score`.
pub(crate) fn finalize_category(rule: &CategoryRule, tally: &CategoryTally) -> CategoryScoreResult {
    let initial_score = rule.initial_score;
    let per_item_cap = match rule.deduction {
        DeductionModel::Flat { .. } if tally.item_count > 0 => {
            initial_score / tally.item_count as f64
        }
        _ => f64::INFINITY,
    };

    let mut total_raw_errors = 0.0;
    let mut uncapped_total = 0.0;
    for (&(sub_type, severity), &occurrences) in &tally.histogram {
        let severity = severity.value();
        let occurrences = occurrences as f64;
        let item_deduction = (severity * rule.deduction.rate_for(sub_type)).min(per_item_cap);
        total_raw_errors += severity * occurrences;
        uncapped_total += item_deduction * occurrences;
    }

    let total_deduction = uncapped_total.min(initial_score);

    CategoryScoreResult {
        category: rule.key,
        initial_score,
        item_count: tally.item_count,
        total_raw_errors,
        total_deduction,
        final_score: initial_score - total_deduction,
    }
}
