//! Logger bootstrap
//!
//! Console logging by default; with a configured log directory the
//! output rolls to a daily file instead. The level string accepts a
//! bare level name ("debug") or a full directive set
//! ("info,polyana_engine=debug").

use tracing_subscriber::EnvFilter;

/// Initialize console logging at the default level
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize logging, optionally into a daily-rolling file
///
/// HTTP client internals are quieted to warn unless the directive
/// string overrides them. An unusable log directory falls back to
/// console output.
pub fn init_logger_with_file(level: Option<&str>, log_dir: Option<&str>) {
    let directives = level.unwrap_or("info");
    let filter = EnvFilter::try_new(format!("{directives},hyper=warn,reqwest=warn"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if let Some(dir) = log_dir
        && std::fs::create_dir_all(dir).is_ok()
    {
        let appender = tracing_appender::rolling::daily(dir, "polyana-engine");
        builder.with_writer(appender).init();
        return;
    }
    builder.init();
}
