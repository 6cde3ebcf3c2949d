mod delivery;
pub mod domain;
mod eligibility;
pub mod export;
mod message;
pub mod parser;

use crate::workflows::exams::{ExamCanonicalizer, ExamFrequency, ExamMatcher, FrequencyGrouping};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub use delivery::{
    DeliveryAttempt, DeliveryLog, DeliveryLogError, FileDeliveryLog, MemoryDeliveryLog,
};
pub use domain::{DeliveryStatus, EligibleRecord, Eligibility, OutreachCandidate, RawRecord};
pub use eligibility::{admit, screen};
pub use message::build_message;
pub use parser::TableSummary;

#[derive(Debug, thiserror::Error)]
pub enum OutreachError {
    #[error("failed to read or write outreach data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),
    #[error(transparent)]
    Delivery(#[from] DeliveryLogError),
}

/// Counts collected while screening a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutreachSummary {
    pub scanned: usize,
    pub matched: usize,
    pub eligible: usize,
    pub missing_phone: usize,
    pub missing_identification: usize,
}

impl OutreachSummary {
    fn tally(&mut self, outcome: Eligibility) {
        self.scanned += 1;
        match outcome {
            Eligibility::Eligible => {
                self.matched += 1;
                self.eligible += 1;
            }
            Eligibility::NoExam => {}
            Eligibility::MissingPhone => {
                self.matched += 1;
                self.missing_phone += 1;
            }
            Eligibility::MissingIdentification => {
                self.matched += 1;
                self.missing_identification += 1;
            }
        }
    }
}

/// Result of one outreach batch; `records` hold the canonicalized exam lists.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutreachReport {
    pub summary: OutreachSummary,
    pub records: Vec<EligibleRecord>,
}

impl OutreachReport {
    pub fn frequency(&self, grouping: FrequencyGrouping) -> ExamFrequency {
        ExamFrequency::from_lists(self.records.iter().map(|record| record.exams.as_str()), grouping)
    }
}

/// Match, screen, message, deliver, then canonicalize, in that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutreachPipeline {
    matcher: ExamMatcher,
    canonicalizer: ExamCanonicalizer,
}

impl OutreachPipeline {
    pub fn new(matcher: ExamMatcher, canonicalizer: ExamCanonicalizer) -> Self {
        Self {
            matcher,
            canonicalizer,
        }
    }

    pub fn matcher(&self) -> &ExamMatcher {
        &self.matcher
    }

    /// Runs the exam matcher on every record and keeps the eligible ones.
    pub fn screen(&self, records: Vec<RawRecord>) -> (Vec<OutreachCandidate>, OutreachSummary) {
        let mut summary = OutreachSummary::default();
        let mut candidates = Vec::new();

        for record in records {
            let exams = self.matcher.find_optional(record.prescription.as_deref());
            match admit(record, exams) {
                Ok(candidate) => {
                    summary.tally(Eligibility::Eligible);
                    candidates.push(candidate);
                }
                Err(outcome) => summary.tally(outcome),
            }
        }

        (candidates, summary)
    }

    pub fn run<L>(&self, records: Vec<RawRecord>, log: &L) -> Result<OutreachReport, OutreachError>
    where
        L: DeliveryLog + ?Sized,
    {
        let (candidates, summary) = self.screen(records);
        let mut delivered = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            delivered.push(self.deliver(candidate, log)?);
        }

        let records = delivered
            .into_iter()
            .map(|record| record.canonicalized(&self.canonicalizer))
            .collect();

        info!(
            scanned = summary.scanned,
            matched = summary.matched,
            eligible = summary.eligible,
            "outreach batch screened"
        );

        Ok(OutreachReport { summary, records })
    }

    pub fn run_from_reader<R, L>(&self, reader: R, log: &L) -> Result<OutreachReport, OutreachError>
    where
        R: Read,
        L: DeliveryLog + ?Sized,
    {
        let records = parser::parse_records(reader)?;
        self.run(records, log)
    }

    fn deliver<L>(&self, candidate: OutreachCandidate, log: &L) -> Result<EligibleRecord, OutreachError>
    where
        L: DeliveryLog + ?Sized,
    {
        let OutreachCandidate {
            record,
            phone,
            cpf,
            exams,
        } = candidate;
        let exams = exams.joined();
        let message = build_message(record.requester.as_deref(), &exams);

        let attempt = DeliveryAttempt::new(phone.clone(), exams.clone());
        log.record(&attempt)?;
        debug!(phone = %attempt.phone, exams = %attempt.exams, "outreach message delivered");

        Ok(EligibleRecord {
            id: record.id,
            date: record.date,
            phone,
            cpf,
            requester: record.requester,
            exams,
            message,
            status: DeliveryStatus::Sent,
        })
    }
}

/// File locations for a batch run; absent inputs skip the stage that needs them.
#[derive(Debug, Clone)]
pub struct OutreachJob {
    pub unstructured: Option<PathBuf>,
    pub structured: Option<PathBuf>,
    pub output: PathBuf,
    pub delivery_log: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OutreachJobOutcome {
    pub structured: Option<TableSummary>,
    pub report: Option<OutreachReport>,
}

impl OutreachJob {
    pub fn execute(&self, pipeline: &OutreachPipeline) -> Result<OutreachJobOutcome, OutreachError> {
        let structured = match &self.structured {
            Some(path) => {
                let summary = parser::summarize_table(open(path)?)?;
                info!(
                    path = %path.display(),
                    rows = summary.rows,
                    columns = summary.columns.len(),
                    "structured dataset loaded"
                );
                Some(summary)
            }
            None => {
                warn!("no structured dataset provided; skipping");
                None
            }
        };

        let Some(path) = &self.unstructured else {
            warn!("no unstructured dataset provided; outreach list not generated");
            return Ok(OutreachJobOutcome {
                structured,
                report: None,
            });
        };

        let records = parser::parse_records(open(path)?)?;
        let log = FileDeliveryLog::open(&self.delivery_log)?;
        let report = pipeline.run(records, &log)?;
        export::write_records_to_path(&self.output, &report.records)?;

        info!(
            output = %self.output.display(),
            delivery_log = %log.path().display(),
            eligible = report.records.len(),
            "outreach list written"
        );

        Ok(OutreachJobOutcome {
            structured,
            report: Some(report),
        })
    }
}

fn open(path: &Path) -> Result<std::fs::File, OutreachError> {
    Ok(std::fs::File::open(path)?)
}
