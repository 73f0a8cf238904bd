use crate::infra::{bootstrap, parse_date};
use crate::report::{run_grade, run_rules, run_summary};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tilawah_score::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "tilawah-grader",
    about = "Score recitation assessment exports and summarize batches",
    version
)]
struct Cli {
    /// Scoring rules JSON; overrides TILAWAH_RULES_PATH
    #[arg(long, global = true)]
    rules: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every participant in an observation export
    Grade(GradeArgs),
    /// Aggregate a scored export into dashboard figures
    Summary(SummaryArgs),
    /// Print the effective, validated rule tables
    Rules,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct GradeArgs {
    /// Observation CSV export (plain or grouped)
    #[arg(long)]
    pub(crate) input: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
    /// Only report this participant
    #[arg(long)]
    pub(crate) participant: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct SummaryArgs {
    /// Observation CSV export (plain or grouped)
    #[arg(long)]
    pub(crate) input: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
    /// Evaluation date stamped on the summary (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) evaluated_on: Option<NaiveDate>,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let engine = bootstrap(cli.rules)?;

    match cli.command {
        Command::Grade(args) => run_grade(&engine, args),
        Command::Summary(args) => run_summary(&engine, args),
        Command::Rules => run_rules(&engine),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_defaults_to_table_output() {
        let cli = Cli::try_parse_from(["tilawah-grader", "grade", "--input", "scores.csv"])
            .expect("grade parses");
        match cli.command {
            Command::Grade(args) => {
                assert_eq!(args.input, PathBuf::from("scores.csv"));
                assert_eq!(args.format, OutputFormat::Table);
                assert!(args.participant.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(cli.rules.is_none());
    }

    #[test]
    fn rules_flag_is_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "tilawah-grader",
            "summary",
            "--input",
            "scores.csv",
            "--format",
            "json",
            "--evaluated-on",
            "2025-03-14",
            "--rules",
            "rules.json",
        ])
        .expect("summary parses");
        assert_eq!(cli.rules, Some(PathBuf::from("rules.json")));
        match cli.command {
            Command::Summary(args) => {
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.evaluated_on, NaiveDate::from_ymd_opt(2025, 3, 14));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn grade_requires_an_input() {
        assert!(Cli::try_parse_from(["tilawah-grader", "grade"]).is_err());
    }
}
