/// Renders the WhatsApp outreach text for one patient.
///
/// A missing requester name renders as an empty greeting target.
pub fn build_message(requester: Option<&str>, exams: &str) -> String {
    let requester = requester.unwrap_or_default();
    format!(
        "Olá 👋, {requester}! Notamos que você tem um exame pendente: {exams}.\
Para maior comodidade, agende seu exame em nossa rede hospitalar agora mesmo!🗓 \
Caso já tenha realizado o exame, desconsidere esta mensagem. Estamos à disposição!"
    )
}
