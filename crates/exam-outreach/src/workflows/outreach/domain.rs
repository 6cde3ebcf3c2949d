use serde::Serialize;
use std::collections::BTreeMap;

use crate::workflows::exams::{ExamCanonicalizer, ExamMatch};

/// One row of the unstructured prescription table.
///
/// Blank cells are read as `None`; columns outside the fixed set are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub id: Option<String>,
    pub date: Option<String>,
    pub phone: Option<String>,
    pub cpf: Option<String>,
    pub requester: Option<String>,
    pub prescription: Option<String>,
    pub extra: BTreeMap<String, String>,
}

/// Outcome of screening a record for outreach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    NoExam,
    MissingPhone,
    MissingIdentification,
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Eligibility::Eligible => "Eligible",
            Eligibility::NoExam => "No exam detected",
            Eligibility::MissingPhone => "Missing phone",
            Eligibility::MissingIdentification => "Missing identification",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeliveryStatus {
    #[serde(rename = "Enviado")]
    Sent,
}

impl DeliveryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "Enviado",
        }
    }
}

/// A record that passed screening and received an outreach message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibleRecord {
    pub id: Option<String>,
    pub date: Option<String>,
    pub phone: String,
    pub cpf: String,
    pub requester: Option<String>,
    pub exams: String,
    pub message: String,
    pub status: DeliveryStatus,
}

impl EligibleRecord {
    /// Applies the final uppercase and synonym pass to the exam list.
    pub fn canonicalized(mut self, canonicalizer: &ExamCanonicalizer) -> Self {
        self.exams = canonicalizer.canonicalize(&self.exams);
        self
    }
}

/// Screened record still waiting for its message and delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutreachCandidate {
    pub record: RawRecord,
    pub phone: String,
    pub cpf: String,
    pub exams: ExamMatch,
}
