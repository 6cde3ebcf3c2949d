use super::matcher::EXAM_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Grouping used when counting exam lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyGrouping {
    /// Each distinct exam-list value counts as one bucket.
    #[default]
    Combination,
    /// Every exam inside a list is counted on its own.
    Exam,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamFrequencyEntry {
    pub exam: String,
    pub patients: usize,
}

/// Ranked exam counts, highest first, ties broken by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExamFrequency {
    pub grouping: FrequencyGrouping,
    pub entries: Vec<ExamFrequencyEntry>,
}

impl ExamFrequency {
    pub fn from_lists<'a, I>(lists: I, grouping: FrequencyGrouping) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();

        for list in lists {
            let list = list.trim();
            if list.is_empty() {
                continue;
            }

            match grouping {
                FrequencyGrouping::Combination => {
                    *counts.entry(list.to_string()).or_default() += 1;
                }
                FrequencyGrouping::Exam => {
                    for exam in list.split(EXAM_SEPARATOR).map(str::trim) {
                        if !exam.is_empty() {
                            *counts.entry(exam.to_string()).or_default() += 1;
                        }
                    }
                }
            }
        }

        let mut entries: Vec<ExamFrequencyEntry> = counts
            .into_iter()
            .map(|(exam, patients)| ExamFrequencyEntry { exam, patients })
            .collect();
        entries.sort_by(|a, b| b.patients.cmp(&a.patients).then_with(|| a.exam.cmp(&b.exam)));

        Self { grouping, entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&ExamFrequencyEntry> {
        self.entries.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTS: [&str; 4] = [
        "RADIOGRAFIA, HOLTER",
        "RADIOGRAFIA",
        "RADIOGRAFIA, HOLTER",
        "MAPA",
    ];

    #[test]
    fn combination_grouping_counts_whole_values() {
        let frequency = ExamFrequency::from_lists(LISTS, FrequencyGrouping::Combination);
        let top = frequency.top().expect("entries");
        assert_eq!(top.exam, "RADIOGRAFIA, HOLTER");
        assert_eq!(top.patients, 2);
        assert_eq!(frequency.entries.len(), 3);
        assert_eq!(frequency.entries[1].exam, "MAPA");
    }

    #[test]
    fn exam_grouping_splits_lists() {
        let frequency = ExamFrequency::from_lists(LISTS, FrequencyGrouping::Exam);
        let counts: Vec<(&str, usize)> = frequency
            .entries
            .iter()
            .map(|entry| (entry.exam.as_str(), entry.patients))
            .collect();
        assert_eq!(counts, vec![("RADIOGRAFIA", 3), ("HOLTER", 2), ("MAPA", 1)]);
    }

    #[test]
    fn blank_lists_are_ignored() {
        let frequency = ExamFrequency::from_lists(["", "  "], FrequencyGrouping::Exam);
        assert!(frequency.is_empty());
    }
}
