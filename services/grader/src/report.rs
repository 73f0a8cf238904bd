use crate::cli::{GradeArgs, OutputFormat, SummaryArgs};
use crate::infra::score_export;
use chrono::Local;
use serde::Serialize;
use tilawah_score::error::AppError;
use tilawah_score::{BatchScores, BatchSummary, FlatScores, ParticipantScoreResult, ScoringEngine};

#[derive(Debug, Serialize)]
struct ParticipantReport<'a> {
    participant_id: &'a str,
    scores: FlatScores,
    breakdown: &'a ParticipantScoreResult,
}

pub(crate) fn run_grade(engine: &ScoringEngine, args: GradeArgs) -> Result<(), AppError> {
    let GradeArgs {
        input,
        format,
        participant,
    } = args;

    let scores = score_export(engine, &input)?;
    let selected = select(&scores, participant.as_deref())?;

    match format {
        OutputFormat::Json => {
            let reports: Vec<_> = selected
                .into_iter()
                .map(|(participant_id, result)| ParticipantReport {
                    participant_id,
                    scores: result.flat(),
                    breakdown: result,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Table => render_grades(&selected),
    }
    Ok(())
}

pub(crate) fn run_summary(engine: &ScoringEngine, args: SummaryArgs) -> Result<(), AppError> {
    let evaluated_on = args
        .evaluated_on
        .unwrap_or_else(|| Local::now().date_naive());
    let summary = score_export(engine, &args.input)?.summary(evaluated_on);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => render_summary(&summary),
    }
    Ok(())
}

pub(crate) fn run_rules(engine: &ScoringEngine) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(engine.config())?);
    Ok(())
}

fn select<'s>(
    scores: &'s BatchScores,
    participant: Option<&str>,
) -> Result<Vec<(&'s str, &'s ParticipantScoreResult)>, AppError> {
    match participant {
        Some(id) => scores
            .iter()
            .find(|(participant_id, _)| *participant_id == id)
            .map(|entry| vec![entry])
            .ok_or_else(|| AppError::UnknownParticipant(id.to_string())),
        None => Ok(scores.iter().collect()),
    }
}

fn penalty_label(result: &ParticipantScoreResult) -> String {
    if result.penalty_applicable {
        format!("tier {}", result.penalty_deduction)
    } else {
        "none".to_string()
    }
}

fn render_grades(selected: &[(&str, &ParticipantScoreResult)]) {
    println!("Recitation scores ({} participants)", selected.len());
    println!(
        "{:<16} {:>8} {:>8} {:>8} {:>8} {:>8} {:>10} {:>8} {:>8} {:>8}",
        "participant",
        "makhraj",
        "sifat",
        "ahkam",
        "mad",
        "gharib",
        "kelancaran",
        "base",
        "penalty",
        "overall"
    );
    for (participant_id, result) in selected {
        let flat = result.flat();
        println!(
            "{:<16} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>10.2} {:>8.2} {:>8} {:>8.2}",
            participant_id,
            flat.makhraj,
            flat.sifat,
            flat.ahkam,
            flat.mad,
            flat.gharib,
            flat.kelancaran,
            result.base_score,
            penalty_label(result),
            flat.overall
        );
    }
}

fn render_summary(summary: &BatchSummary) {
    println!("Batch summary (evaluated {})", summary.evaluated_on);
    println!("Participants: {}", summary.participant_count);
    println!(
        "Mean overall {:.2}, mean base {:.2}",
        summary.mean_overall_score, summary.mean_base_score
    );
    if let (Some(min), Some(max)) = (summary.min_overall_score, summary.max_overall_score) {
        println!("Overall range: {:.2} - {:.2}", min, max);
    }

    println!("\nCategory means");
    for mean in &summary.category_means {
        println!("- {}: {:.2}", mean.category_label, mean.mean_final_score);
    }

    if summary.penalty_tiers.is_empty() {
        println!("\nNo Pengurangan penalties applied.");
    } else {
        println!("\nPengurangan penalties");
        for (tier, count) in &summary.penalty_tiers {
            println!("- tier {}: {} participants", tier, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilawah_score::{BatchEvaluator, Category, ObservationRecord};

    fn scores() -> BatchScores {
        let engine = ScoringEngine::default();
        let records = vec![
            ObservationRecord::new("p-2", "a", "makhraj", "\u{0628}", 1.0),
            ObservationRecord::new("p-1", "a", "sifat", "Hams", 0.0),
            ObservationRecord::new("p-3", "a", "pengurangan", "Tidak Bisa Membaca", 1.0),
        ];
        BatchEvaluator::new(&engine)
            .evaluate(records)
            .expect("scores")
    }

    #[test]
    fn selects_every_participant_in_id_order() {
        let scores = scores();
        let selected = select(&scores, None).expect("selection");
        let ids: Vec<_> = selected.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, ["p-1", "p-2", "p-3"]);
    }

    #[test]
    fn unknown_participant_is_reported() {
        let scores = scores();
        let err = select(&scores, Some("p-9")).expect_err("unknown participant");
        assert!(matches!(err, AppError::UnknownParticipant(id) if id == "p-9"));
    }

    #[test]
    fn penalty_label_names_the_tier() {
        let scores = scores();
        assert_eq!(penalty_label(scores.get("p-1").expect("p-1 scored")), "none");
        assert_eq!(penalty_label(scores.get("p-3").expect("p-3 scored")), "tier 90");
    }

    #[test]
    fn json_report_carries_flat_and_full_views() {
        let scores = scores();
        let result = scores.get("p-2").expect("p-2 scored");
        let report = ParticipantReport {
            participant_id: "p-2",
            scores: result.flat(),
            breakdown: result,
        };

        let value = serde_json::to_value(&report).expect("serializes");
        assert_eq!(value["scores"]["makhraj"], 54.0);
        assert_eq!(
            value["breakdown"]["category_scores"]["MAKHRAJ"]["final_score"],
            result.final_score(Category::Makhraj)
        );
    }
}
