use exam_outreach::workflows::exams::{
    ExamCanonicalizer, ExamMatcher, SynonymTable, TermCase, EXAM_LEXICON,
};
use exam_outreach::workflows::outreach::{screen, Eligibility, RawRecord};
use std::collections::HashSet;

fn title_case(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn upper_set(found: &[String]) -> HashSet<String> {
    found.iter().map(|exam| exam.to_uppercase()).collect()
}

#[test]
fn text_without_lexicon_terms_is_absent() {
    let matcher = ExamMatcher::default();
    for text in [
        "",
        "   ",
        "nan",
        "XRXY",
        "raiox do joelho",
        "mapas e holters",
        "radiografias antigas",
        "ultrassons",
        "Nenhum exame mencionado",
        "Retorno em 30 dias com resultados",
    ] {
        assert!(matcher.find(text).is_none(), "unexpected match in {text:?}");
        assert!(matcher.match_text(text).is_none());
    }
}

#[test]
fn single_term_resolves_to_synonym_or_keeps_source_case() {
    let matcher = ExamMatcher::default();
    let synonyms = SynonymTable::first_stage();

    for term in EXAM_LEXICON {
        for variant in [term.to_string(), term.to_uppercase(), title_case(term)] {
            let text = format!("Pedido médico: {variant} urgente");
            let found = matcher.find(&text).expect("lexicon term matches");
            assert_eq!(found.len(), 1, "{text:?} produced {:?}", found.exams());

            let exam = &found.exams()[0];
            match synonyms.resolve(&variant) {
                Some(canonical) => assert_eq!(exam, canonical),
                None if *term == "cintilografia óssea" => {
                    assert!(variant.starts_with(exam.as_str()));
                }
                None => assert_eq!(exam, &variant),
            }
        }
    }
}

#[test]
fn matching_is_deterministic() {
    let matcher = ExamMatcher::default();
    let text = "Holter, mapa, RX, ultrassom, espirometria, rx e Holter novamente";
    let first = matcher.find(text).expect("match");
    for _ in 0..10 {
        let again = matcher.find(text).expect("match");
        assert_eq!(upper_set(again.exams()), upper_set(first.exams()));
    }
}

#[test]
fn repeated_mentions_collapse_to_one_entry() {
    let found = ExamMatcher::default()
        .find("ultrassom hoje, ULTRASSOM amanhã e Ultrassom depois")
        .expect("match");
    assert_eq!(found.exams(), ["ULTRASSONOGRAFIA"]);
}

#[test]
fn rx_and_complete_blood_count_prescription() {
    let found = ExamMatcher::default()
        .find("Paciente necessita de RX e hemograma completo")
        .expect("match");
    let expected: HashSet<String> = ["RADIOGRAFIA", "HEMOGRAMA"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(upper_set(found.exams()), expected);
}

#[test]
fn abdominal_ultrasound_prescription() {
    let joined = ExamMatcher::default().match_text("Solicito ultrassom abdominal");
    assert_eq!(joined.as_deref(), Some("ULTRASSONOGRAFIA"));
}

#[test]
fn prescription_without_exam_is_never_eligible() {
    let exams = ExamMatcher::default().find("Nenhum exame mencionado");
    assert!(exams.is_none());

    let record = RawRecord {
        phone: Some("11999990000".to_string()),
        cpf: Some("12345678900".to_string()),
        prescription: Some("Nenhum exame mencionado".to_string()),
        ..RawRecord::default()
    };
    assert_eq!(screen(&record, exams.as_ref()), Eligibility::NoExam);
}

#[test]
fn matched_record_without_phone_is_excluded() {
    let exams = ExamMatcher::default().find("RX de tórax");
    let record = RawRecord {
        phone: None,
        cpf: Some("123".to_string()),
        ..RawRecord::default()
    };
    assert_eq!(screen(&record, exams.as_ref()), Eligibility::MissingPhone);
}

#[test]
fn canonical_list_without_second_stage_keys_is_unchanged() {
    let canonicalizer = ExamCanonicalizer::default();
    assert_eq!(
        canonicalizer.canonicalize("RADIOGRAFIA, HOLTER"),
        "RADIOGRAFIA, HOLTER"
    );
}

#[test]
fn canonicalization_is_idempotent() {
    let canonicalizer = ExamCanonicalizer::default();
    for input in [
        "",
        "rx",
        "RX, ultrassom",
        "radiografia, rx, Holter",
        "RX-CONTRASTE, ULTRASSOM",
        "x, ",
        "Mamografia, mamografia",
        "ÓSSEA, densitometria óssea",
    ] {
        let once = canonicalizer.canonicalize(input);
        assert_eq!(canonicalizer.canonicalize(&once), once, "input {input:?}");
    }
}

#[test]
fn matcher_output_composes_with_second_stage() {
    let matcher = ExamMatcher::default();
    let canonicalizer = ExamCanonicalizer::default();
    let joined = matcher
        .match_text("rx de tórax, ultrassonografia e holter")
        .expect("match");
    assert_eq!(joined, "RADIOGRAFIA, ultrassonografia, holter");
    assert_eq!(
        canonicalizer.canonicalize(&joined),
        "RADIOGRAFIA, ULTRASSONOGRAFIA, HOLTER"
    );
}

#[test]
fn upper_policy_makes_stages_agree() {
    let matcher = ExamMatcher::default().with_term_case(TermCase::Upper);
    let canonicalizer = ExamCanonicalizer::default();
    let joined = matcher.match_text("Holter e mapa").expect("match");
    assert_eq!(canonicalizer.canonicalize(&joined), joined);
}
