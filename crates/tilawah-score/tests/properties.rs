use proptest::prelude::*;
use proptest::sample::Index;
use tilawah_score::scoring::{classify, Classification};
use tilawah_score::{Category, ObservationRecord, ScoringEngine};

const EPSILON: f64 = 1e-9;

fn tag() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "makhraj",
        "sifat",
        "ahkam",
        "mad",
        "gharib",
        "kelancaran",
        "pengurangan",
        "adab",
    ])
}

fn label() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "Tanaffus",
        "Izhar Syafawi",
        "Ghunnah Musyaddadah",
        "Mad Thabi'i",
        "Qashr",
        "Mad Wajib Muttashil",
        "Mad Lazim",
        "\u{0642}",
        "Tidak Bisa Membaca",
        "Maqro hanya sebagian",
        "Tidak Ada Suara",
        "Video Tidak Ada Gambar",
    ])
}

fn sheet(max_len: usize) -> impl Strategy<Value = Vec<ObservationRecord>> {
    prop::collection::vec(
        (tag(), label(), prop_oneof![Just(0.0), 0.0..20.0f64]).prop_map(
            |(tag, label, severity)| ObservationRecord::new("p-1", "assessor", tag, label, severity),
        ),
        0..max_len,
    )
}

fn is_penalty(record: &ObservationRecord) -> bool {
    classify(&record.raw_category, &record.item_label) == Classification::Penalty
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn scores_stay_within_their_budgets(records in sheet(60)) {
        let engine = ScoringEngine::default();
        let result = engine.score(&records).expect("scores");

        let mut summed = 0.0;
        for category in Category::ordered() {
            let score = &result.category_scores[&category];
            prop_assert!(score.final_score >= 0.0);
            prop_assert!(score.final_score <= score.initial_score);
            prop_assert!(score.total_deduction >= 0.0);
            summed += score.final_score;
        }
        prop_assert!((summed - result.base_score).abs() < EPSILON);
        prop_assert!((0.0..=100.0).contains(&result.overall_score));
        prop_assert!(result.overall_score <= result.base_score.max(10.0));
    }

    #[test]
    fn more_errors_never_raise_scores(
        records in sheet(40).prop_filter("needs an item", |records| !records.is_empty()),
        pick in any::<Index>(),
        extra in 0.0..30.0f64,
    ) {
        let engine = ScoringEngine::default();
        let index = pick.index(records.len());
        prop_assume!(!is_penalty(&records[index]));

        let before = engine.score(&records).expect("scores");
        let mut worse = records.clone();
        worse[index].error_severity += extra;
        let after = engine.score(&worse).expect("scores");

        for category in Category::ordered() {
            prop_assert!(after.final_score(category) <= before.final_score(category) + EPSILON);
        }
        prop_assert!(after.base_score <= before.base_score + EPSILON);
        prop_assert!(after.overall_score <= before.overall_score + EPSILON);
    }

    #[test]
    fn one_flat_item_costs_at_most_its_share(items in 1usize..40, severity in 0.0..1.0e6f64) {
        let engine = ScoringEngine::default();
        let mut records: Vec<_> = (1..items)
            .map(|index| ObservationRecord::new("p-1", "a", "makhraj", format!("letter-{index}"), 0.0))
            .collect();
        records.push(ObservationRecord::new("p-1", "a", "makhraj", "\u{062E}", severity));

        let result = engine.score(&records).expect("scores");
        let makhraj = &result.category_scores[&Category::Makhraj];
        let share = makhraj.initial_score / items as f64;

        prop_assert!(makhraj.total_deduction <= share + EPSILON);
        prop_assert!(makhraj.final_score >= makhraj.initial_score - share - EPSILON);
    }

    #[test]
    fn void_penalty_overrides_any_base(records in sheet(40), severity in 0.5..5.0f64) {
        let engine = ScoringEngine::default();
        let mut records: Vec<_> = records.into_iter().filter(|record| !is_penalty(record)).collect();
        records.push(ObservationRecord::new("p-1", "a", "pengurangan", "Tidak Bisa Membaca", severity));

        let result = engine.score(&records).expect("scores");
        prop_assert_eq!(result.overall_score, 10.0);
        prop_assert_eq!(result.penalty_deduction, 90);
    }

    #[test]
    fn disqualification_wins_over_every_other_penalty(records in sheet(40), severity in 0.5..5.0f64) {
        let engine = ScoringEngine::default();
        let mut records = records;
        records.push(ObservationRecord::new("p-1", "a", "pengurangan", "Salah Maqro", severity));

        let result = engine.score(&records).expect("scores");
        prop_assert_eq!(result.overall_score, 0.0);
        prop_assert_eq!(result.penalty_deduction, 100);
        prop_assert!(result.penalty_applicable);
    }
}

#[test]
fn zero_severity_penalty_rows_are_ignored() {
    let engine = ScoringEngine::default();
    let records = vec![
        ObservationRecord::new("p-1", "a", "makhraj", "\u{0628}", 0.0),
        ObservationRecord::new("p-1", "a", "pengurangan", "Salah Maqro", 0.0),
    ];

    let result = engine.score(&records).expect("scores");
    assert_eq!(result.overall_score, 100.0);
    assert!(!result.penalty_applicable);
}
