use tracing_indicatif::span_ext::IndicatifSpanExt;

/// Labels the current span's progress indicator.
///
/// The span must carry `progress = true` and be recorded at `info` or above to
/// be drawn.
pub(crate) fn label_current_span(message: &str, finished: &str) {
    let span = tracing::Span::current();
    span.pb_set_message(message);
    span.pb_set_finish_message(finished);
}
