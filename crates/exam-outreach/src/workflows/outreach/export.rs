use super::domain::EligibleRecord;
use super::OutreachError;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

pub const EXAMS_COLUMN: &str = "EXAMES_IDENTIFICADOS";

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "DATA")]
    date: &'a str,
    #[serde(rename = "TEL")]
    phone: &'a str,
    #[serde(rename = "CPF")]
    cpf: &'a str,
    #[serde(rename = "SOLICITANTE")]
    requester: &'a str,
    #[serde(rename = "EXAMES_IDENTIFICADOS")]
    exams: &'a str,
    #[serde(rename = "MENSAGEM_WHATSAPP")]
    message: &'a str,
    #[serde(rename = "STATUS_ENVIO")]
    status: &'a str,
}

impl<'a> From<&'a EligibleRecord> for OutputRow<'a> {
    fn from(record: &'a EligibleRecord) -> Self {
        Self {
            id: record.id.as_deref().unwrap_or_default(),
            date: record.date.as_deref().unwrap_or_default(),
            phone: &record.phone,
            cpf: &record.cpf,
            requester: record.requester.as_deref().unwrap_or_default(),
            exams: &record.exams,
            message: &record.message,
            status: record.status.label(),
        }
    }
}

/// Writes the outreach list with a header row, even when it is empty.
pub fn write_records<W: Write>(writer: W, records: &[EligibleRecord]) -> Result<(), OutreachError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record([
        "ID",
        "DATA",
        "TEL",
        "CPF",
        "SOLICITANTE",
        EXAMS_COLUMN,
        "MENSAGEM_WHATSAPP",
        "STATUS_ENVIO",
    ])?;

    for record in records {
        csv_writer.serialize(OutputRow::from(record))?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_records_to_path<P: AsRef<Path>>(
    path: P,
    records: &[EligibleRecord],
) -> Result<(), OutreachError> {
    let file = std::fs::File::create(path)?;
    write_records(file, records)
}

#[derive(Debug, Deserialize)]
struct ExamListRow {
    #[serde(rename = "EXAMES_IDENTIFICADOS", default)]
    exams: Option<String>,
}

/// Reads the exam-list column back from a previously written outreach list.
pub fn read_exam_lists<R: Read>(reader: R) -> Result<Vec<String>, OutreachError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    if !csv_reader
        .headers()?
        .iter()
        .any(|header| header == EXAMS_COLUMN)
    {
        return Err(OutreachError::MissingColumn(EXAMS_COLUMN));
    }

    let mut lists = Vec::new();
    for row in csv_reader.deserialize::<ExamListRow>() {
        if let Some(exams) = row?.exams.filter(|value| !value.is_empty()) {
            lists.push(exams);
        }
    }

    Ok(lists)
}
