use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::Layer,
    registry::LookupSpan,
};

use crate::logging::config::{ConsoleConfig, LogFormat};

/// Boxed-слой, стирающий конкретный тип формата (json/pretty/compact).
pub type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Собирает fmt-слой с заданным форматом и writer'ом.
pub fn build_layer<S, W>(
    format: LogFormat,
    writer: W,
    with_ansi: bool,
    options: &ConsoleConfig,
) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_ansi(with_ansi)
        .with_target(options.with_target)
        .with_thread_ids(options.with_thread_ids)
        .with_line_number(options.with_line_numbers);

    match format {
        LogFormat::Json => Box::new(base.json().with_current_span(true)),
        LogFormat::Pretty => Box::new(base.pretty().with_span_events(FmtSpan::CLOSE)),
        LogFormat::Compact => Box::new(base.compact()),
    }
}
