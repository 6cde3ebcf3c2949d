use regex::Regex;
use std::sync::OnceLock;

/// Exam names recognised in prescription text, in alternation priority order.
///
/// The regex engine picks the leftmost alternative that matches, so a longer phrase
/// only wins over a shorter one when it is listed first.
pub const EXAM_LEXICON: &[&str] = &[
    "ressonância magnética",
    "tomografia computadorizada",
    "ultrassonografia",
    "ultrassom",
    "mamografia",
    "radiografia",
    "ecocardiograma",
    "eletrocardiograma",
    "rx",
    "hemograma",
    "teste ergométrico",
    "fisioterapia",
    "endoscopia",
    "colonoscopia",
    "doppler",
    "angiografia",
    "cintilografia",
    "espirometria",
    "densitometria óssea",
    "polissonografia",
    "biopsia",
    "exame de sangue",
    "exame laboratorial",
    "exame clínico",
    "eletroneuromiografia",
    "holter",
    "mapa",
    "radioterapia",
    "pet-scan",
    "cintilografia óssea",
    "urodinâmica",
    "manometria esofágica",
    "capsuloscopia",
];

static EXAM_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Case-insensitive, word-bounded alternation over [`EXAM_LEXICON`].
pub(crate) fn exam_pattern() -> &'static Regex {
    EXAM_PATTERN.get_or_init(|| {
        let alternatives = EXAM_LEXICON
            .iter()
            .map(|term| regex::escape(term))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)\b(?:{alternatives})\b"))
            .expect("exam lexicon compiles")
    })
}
