use super::domain::{Eligibility, OutreachCandidate, RawRecord};
use super::parser::is_missing;
use crate::workflows::exams::ExamMatch;

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !is_missing(value))
}

fn contact(record: &RawRecord) -> Result<(&str, &str), Eligibility> {
    let phone = present(record.phone.as_deref()).ok_or(Eligibility::MissingPhone)?;
    let cpf = present(record.cpf.as_deref()).ok_or(Eligibility::MissingIdentification)?;
    Ok((phone, cpf))
}

/// Classifies a record; the first missing requirement decides the outcome.
pub fn screen(record: &RawRecord, exams: Option<&ExamMatch>) -> Eligibility {
    if exams.map_or(true, ExamMatch::is_empty) {
        return Eligibility::NoExam;
    }
    match contact(record) {
        Ok(_) => Eligibility::Eligible,
        Err(reason) => reason,
    }
}

/// Turns an eligible record into an outreach candidate, or reports why it was left out.
pub fn admit(record: RawRecord, exams: Option<ExamMatch>) -> Result<OutreachCandidate, Eligibility> {
    let exams = exams
        .filter(|exams| !exams.is_empty())
        .ok_or(Eligibility::NoExam)?;
    let (phone, cpf) = contact(&record)?;
    let (phone, cpf) = (phone.to_string(), cpf.to_string());

    Ok(OutreachCandidate {
        record,
        phone,
        cpf,
        exams,
    })
}
