use super::lexicon::exam_pattern;
use super::synonyms::SynonymTable;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Textual stand-in scanned when a record has no prescription text at all.
pub const MISSING_TEXT: &str = "nan";

/// Separator used when an exam set is rendered as a single field.
pub const EXAM_SEPARATOR: &str = ", ";

/// How matched terms without a synonym entry are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermCase {
    /// Keep the casing found in the source text.
    #[default]
    Preserve,
    /// Uppercase every term, matching the casing of synonym targets.
    Upper,
}

impl TermCase {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "preserve" | "original" => Some(Self::Preserve),
            "upper" | "uppercase" => Some(Self::Upper),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TermCase::Preserve => "preserve",
            TermCase::Upper => "upper",
        }
    }
}

/// Distinct exam names found in one text, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExamMatch {
    exams: Vec<String>,
}

impl ExamMatch {
    pub fn exams(&self) -> &[String] {
        &self.exams
    }

    pub fn len(&self) -> usize {
        self.exams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exams.is_empty()
    }

    pub fn contains(&self, exam: &str) -> bool {
        self.exams.iter().any(|candidate| candidate == exam)
    }

    pub fn joined(&self) -> String {
        self.exams.join(EXAM_SEPARATOR)
    }

    pub fn into_exams(self) -> Vec<String> {
        self.exams
    }
}

impl fmt::Display for ExamMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Scans free text for lexicon exam names and resolves first-stage synonyms.
#[derive(Debug, Clone, Copy)]
pub struct ExamMatcher {
    synonyms: SynonymTable,
    term_case: TermCase,
}

impl Default for ExamMatcher {
    fn default() -> Self {
        Self::new(SynonymTable::first_stage(), TermCase::default())
    }
}

impl ExamMatcher {
    pub fn new(synonyms: SynonymTable, term_case: TermCase) -> Self {
        Self {
            synonyms,
            term_case,
        }
    }

    pub fn with_term_case(mut self, term_case: TermCase) -> Self {
        self.term_case = term_case;
        self
    }

    pub fn term_case(&self) -> TermCase {
        self.term_case
    }

    /// Returns `None` when the text mentions no lexicon exam.
    pub fn find(&self, text: &str) -> Option<ExamMatch> {
        let mut seen = HashSet::new();
        let mut exams = Vec::new();

        for found in exam_pattern().find_iter(text) {
            let exam = self.resolve(found.as_str());
            if seen.insert(exam.clone()) {
                exams.push(exam);
            }
        }

        if exams.is_empty() {
            None
        } else {
            Some(ExamMatch { exams })
        }
    }

    /// Missing text is scanned as [`MISSING_TEXT`] rather than skipped.
    pub fn find_optional(&self, text: Option<&str>) -> Option<ExamMatch> {
        self.find(text.unwrap_or(MISSING_TEXT))
    }

    /// Comma-joined form of [`ExamMatcher::find`].
    pub fn match_text(&self, text: &str) -> Option<String> {
        self.find(text).map(|found| found.joined())
    }

    fn resolve(&self, raw: &str) -> String {
        let upper = raw.to_uppercase();
        if let Some(canonical) = self.synonyms.resolve_upper(&upper) {
            return canonical.to_string();
        }

        match self.term_case {
            TermCase::Preserve => raw.to_string(),
            TermCase::Upper => upper,
        }
    }
}
