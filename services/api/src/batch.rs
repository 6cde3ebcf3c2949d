use clap::{Args, ValueEnum};
use exam_outreach::config::AppConfig;
use exam_outreach::error::AppError;
use exam_outreach::telemetry;
use exam_outreach::workflows::exams::{ExamFrequency, FrequencyGrouping, TermCase};
use exam_outreach::workflows::outreach::export::read_exam_lists;
use exam_outreach::workflows::outreach::{OutreachJob, OutreachJobOutcome, OutreachReport};
use std::path::PathBuf;

use crate::infra::build_pipeline;

#[derive(Args, Debug)]
pub(crate) struct OutreachRunArgs {
    /// Unstructured prescription export (ID, DATA, TEL, CPF, SOLICITANTE, DS_RECEITA)
    #[arg(long)]
    pub(crate) unstructured: Option<PathBuf>,
    /// Structured patient export; loaded and summarized only
    #[arg(long)]
    pub(crate) structured: Option<PathBuf>,
    /// Where to write the outreach list (defaults to OUTREACH_OUTPUT_PATH)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Delivery log to append to (defaults to OUTREACH_DELIVERY_LOG)
    #[arg(long)]
    pub(crate) delivery_log: Option<PathBuf>,
    /// Print the generated message for each patient
    #[arg(long)]
    pub(crate) show_messages: bool,
}

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Prescription text to scan
    #[arg(long)]
    pub(crate) text: String,
    /// Casing for exams without a synonym (defaults to EXAM_TERM_CASE)
    #[arg(long, value_enum)]
    pub(crate) term_case: Option<TermCaseArg>,
}

#[derive(Args, Debug)]
pub(crate) struct FrequencyArgs {
    /// Outreach list written by `outreach run`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Count whole exam lists or individual exams
    #[arg(long, value_enum, default_value_t = GroupingArg::Combination)]
    pub(crate) group_by: GroupingArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TermCaseArg {
    Preserve,
    Upper,
}

impl From<TermCaseArg> for TermCase {
    fn from(value: TermCaseArg) -> Self {
        match value {
            TermCaseArg::Preserve => TermCase::Preserve,
            TermCaseArg::Upper => TermCase::Upper,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum GroupingArg {
    Combination,
    Exam,
}

impl From<GroupingArg> for FrequencyGrouping {
    fn from(value: GroupingArg) -> Self {
        match value {
            GroupingArg::Combination => FrequencyGrouping::Combination,
            GroupingArg::Exam => FrequencyGrouping::Exam,
        }
    }
}

pub(crate) fn run_outreach(args: OutreachRunArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let OutreachRunArgs {
        unstructured,
        structured,
        output,
        delivery_log,
        show_messages,
    } = args;

    let job = OutreachJob {
        unstructured,
        structured,
        output: output.unwrap_or(config.outreach.output_path.clone()),
        delivery_log: delivery_log.unwrap_or(config.outreach.delivery_log_path.clone()),
    };
    let pipeline = build_pipeline(config.outreach.term_case);
    let outcome = job.execute(&pipeline)?;

    render_outcome(&job, &outcome, show_messages);
    Ok(())
}

pub(crate) fn run_exam_match(args: MatchArgs) -> Result<(), AppError> {
    let term_case = match args.term_case {
        Some(value) => value.into(),
        None => AppConfig::load()?.outreach.term_case,
    };
    let pipeline = build_pipeline(term_case);

    match pipeline.matcher().find(&args.text) {
        Some(found) => {
            println!("Exams detected ({}):", found.len());
            for exam in found.exams() {
                println!("- {}", exam);
            }
            println!("Joined: {}", found);
        }
        None => println!("no match"),
    }
    Ok(())
}

pub(crate) fn run_exam_frequency(args: FrequencyArgs) -> Result<(), AppError> {
    let file = std::fs::File::open(&args.input)?;
    let lists = read_exam_lists(file)?;
    let frequency = ExamFrequency::from_lists(lists.iter().map(String::as_str), args.group_by.into());
    render_frequency(&frequency);
    Ok(())
}

fn render_outcome(job: &OutreachJob, outcome: &OutreachJobOutcome, show_messages: bool) {
    println!("Exam outreach");

    match &outcome.structured {
        Some(summary) => println!(
            "Structured dataset: {} rows, {} columns",
            summary.rows,
            summary.columns.len()
        ),
        None => println!("Structured dataset: not provided"),
    }

    let Some(report) = &outcome.report else {
        println!("Unstructured dataset: not provided, no outreach list generated");
        return;
    };

    render_report(report, show_messages);
    println!("\nOutreach list written to {}", job.output.display());
    println!("Delivery log appended at {}", job.delivery_log.display());
}

fn render_report(report: &OutreachReport, show_messages: bool) {
    let summary = &report.summary;
    println!("\nScreening");
    println!("- Records scanned: {}", summary.scanned);
    println!("- With detected exams: {}", summary.matched);
    println!("- Missing phone: {}", summary.missing_phone);
    println!("- Missing identification: {}", summary.missing_identification);
    println!("- Eligible: {}", summary.eligible);

    if report.records.is_empty() {
        println!("\nEligible patients: none");
        return;
    }

    println!("\nEligible patients");
    for record in &report.records {
        println!(
            "- {} | {} | {} | {}",
            record.id.as_deref().unwrap_or("-"),
            record.phone,
            record.exams,
            record.status.label()
        );
        if show_messages {
            println!("  {}", record.message);
        }
    }

    println!();
    render_frequency(&report.frequency(FrequencyGrouping::Combination));
}

fn render_frequency(frequency: &ExamFrequency) {
    if frequency.is_empty() {
        println!("Nenhum dado disponível para exibição.");
        return;
    }

    println!("Top exames solicitados");
    for entry in &frequency.entries {
        println!("- {}: {}", entry.exam, entry.patients);
    }
}
