use super::domain::RawRecord;
use super::OutreachError;
use csv::StringRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;

pub const ID_COLUMN: &str = "ID";
pub const DATE_COLUMN: &str = "DATA";
pub const PHONE_COLUMN: &str = "TEL";
pub const CPF_COLUMN: &str = "CPF";
pub const REQUESTER_COLUMN: &str = "SOLICITANTE";
pub const PRESCRIPTION_COLUMN: &str = "DS_RECEITA";

const REQUIRED_COLUMNS: [&str; 6] = [
    ID_COLUMN,
    DATE_COLUMN,
    PHONE_COLUMN,
    CPF_COLUMN,
    REQUESTER_COLUMN,
    PRESCRIPTION_COLUMN,
];

/// Cell values read as missing, in addition to blank cells.
pub const MISSING_MARKERS: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

pub(crate) fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value.trim())
}

struct ColumnLayout {
    required: [usize; 6],
    extra: Vec<(usize, String)>,
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord) -> Result<Self, OutreachError> {
        let names: Vec<String> = headers.iter().map(normalize_header).collect();
        let mut required = [0usize; 6];

        for (slot, column) in REQUIRED_COLUMNS.iter().copied().enumerate() {
            required[slot] = names
                .iter()
                .position(|name| name == column)
                .ok_or(OutreachError::MissingColumn(column))?;
        }

        let extra = names
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !required.contains(index))
            .collect();

        Ok(Self { required, extra })
    }

    fn cell(&self, row: &StringRecord, slot: usize) -> Option<String> {
        row.get(self.required[slot])
            .map(str::trim)
            .filter(|value| !is_missing(value))
            .map(str::to_string)
    }
}

fn normalize_header(value: &str) -> String {
    value.replace('\u{feff}', "").trim().to_string()
}

/// Reads the unstructured prescription table.
pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<RawRecord>, OutreachError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let layout = ColumnLayout::resolve(csv_reader.headers()?)?;
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        let extra: BTreeMap<String, String> = layout
            .extra
            .iter()
            .filter_map(|(index, name)| {
                row.get(*index)
                    .map(|value| (name.clone(), value.to_string()))
            })
            .collect();

        records.push(RawRecord {
            id: layout.cell(&row, 0),
            date: layout.cell(&row, 1),
            phone: layout.cell(&row, 2),
            cpf: layout.cell(&row, 3),
            requester: layout.cell(&row, 4),
            prescription: layout.cell(&row, 5),
            extra,
        });
    }

    Ok(records)
}

/// Shape of a table that is loaded but not otherwise processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub columns: Vec<String>,
    pub rows: usize,
}

pub(crate) fn summarize_table<R: Read>(reader: R) -> Result<TableSummary, OutreachError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let columns = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows = 0;
    for row in csv_reader.records() {
        row?;
        rows += 1;
    }

    Ok(TableSummary { columns, rows })
}
