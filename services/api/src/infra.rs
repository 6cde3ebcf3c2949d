use exam_outreach::workflows::exams::{ExamCanonicalizer, ExamMatcher, SynonymTable, TermCase};
use exam_outreach::workflows::outreach::OutreachPipeline;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) pipeline: OutreachPipeline,
}

/// Wires the two synonym tables into their call sites.
pub(crate) fn build_pipeline(term_case: TermCase) -> OutreachPipeline {
    OutreachPipeline::new(
        ExamMatcher::new(SynonymTable::first_stage(), term_case),
        ExamCanonicalizer::new(SynonymTable::second_stage()),
    )
}
