mod canonicalizer;
pub mod frequency;
mod lexicon;
mod matcher;
mod synonyms;

pub use canonicalizer::ExamCanonicalizer;
pub use frequency::{ExamFrequency, ExamFrequencyEntry, FrequencyGrouping};
pub use lexicon::EXAM_LEXICON;
pub use matcher::{ExamMatch, ExamMatcher, TermCase, EXAM_SEPARATOR, MISSING_TEXT};
pub use synonyms::SynonymTable;
