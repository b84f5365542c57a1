use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::LogConfig;

/// Installs the global subscriber. Keep the returned guard alive until exit so
/// the file appender flushes.
pub fn init_logging(log_config: &LogConfig) -> Option<WorkerGuard> {
    let (file_layer, guard) = match (&log_config.dir, log_config.file_enabled) {
        (Some(dir), true) => {
            let file_appender = tracing_appender::rolling::daily(dir, "schema-manager.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_target(true)
                .boxed();
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    // Console goes to stderr, stdout carries the command output.
    let console_layer = match log_config.console_format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
        "compact" => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
        _ => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_config.filter_directives()));

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}
