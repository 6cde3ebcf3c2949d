const FIRST_STAGE_ENTRIES: &[(&str, &str)] = &[
    ("RX", "RADIOGRAFIA"),
    ("ULTRASSOM", "ULTRASSONOGRAFIA"),
    ("ECG", "ELETROCARDIOGRAMA"),
    ("HEMOGRAMA COMPLETO", "HEMOGRAMA"),
];

const SECOND_STAGE_ENTRIES: &[(&str, &str)] =
    &[("RX", "RADIOGRAFIA"), ("ULTRASSOM", "ULTRASSONOGRAFIA")];

/// Immutable mapping from an alternate exam name to its canonical name.
///
/// Keys and values are stored uppercase; lookups uppercase the probe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynonymTable {
    entries: &'static [(&'static str, &'static str)],
}

impl SynonymTable {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Table applied to every raw match while scanning prescription text.
    pub const fn first_stage() -> Self {
        Self::new(FIRST_STAGE_ENTRIES)
    }

    /// Table applied once to the aggregated exam list before it is persisted.
    pub const fn second_stage() -> Self {
        Self::new(SECOND_STAGE_ENTRIES)
    }

    pub fn resolve(&self, term: &str) -> Option<&'static str> {
        let key = term.to_uppercase();
        self.resolve_upper(&key)
    }

    pub(crate) fn resolve_upper(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, canonical)| *canonical)
    }

    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }
}
