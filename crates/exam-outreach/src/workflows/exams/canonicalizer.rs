use super::matcher::EXAM_SEPARATOR;
use super::synonyms::SynonymTable;

/// Final normalisation pass over an aggregated exam list.
///
/// The list is uppercased and each comma-separated entry is replaced as a whole when it
/// is a synonym key; entries that merely contain a key are left intact.
#[derive(Debug, Clone, Copy)]
pub struct ExamCanonicalizer {
    synonyms: SynonymTable,
}

impl Default for ExamCanonicalizer {
    fn default() -> Self {
        Self::new(SynonymTable::second_stage())
    }
}

impl ExamCanonicalizer {
    pub fn new(synonyms: SynonymTable) -> Self {
        Self { synonyms }
    }

    pub fn canonicalize(&self, joined: &str) -> String {
        let upper = joined.to_uppercase();
        upper
            .split(EXAM_SEPARATOR)
            .map(|entry| self.synonyms.resolve_upper(entry).unwrap_or(entry))
            .collect::<Vec<_>>()
            .join(EXAM_SEPARATOR)
    }
}
