use std::io;
use std::path::Path;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_PREFIX: &str = "gateway";
/// Keeps the HTTP stack at warn so per-request lines come from our own
/// `http request` middleware event.
const DEFAULT_DIRECTIVES: &str = "info,hyper=warn,reqwest=warn,wiremock=warn";

#[derive(Debug, Clone, Copy)]
pub struct LogOptions<'a> {
    pub dir: &'a Path,
    pub file_prefix: &'a str,
    pub to_stderr: bool,
}

/// JSON lines to `<dir>/<prefix>.<date>`, rotated daily, plus optional plain
/// stderr output. Keep the returned guard alive for the process lifetime.
pub fn init_tracing(
    options: LogOptions<'_>,
) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(options.dir)?;
    let prefix = file_prefix(options.file_prefix);
    let file_appender = tracing_appender::rolling::daily(options.dir, prefix);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_target(false)
        .json();

    let registry = tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer);

    if options.to_stderr {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false);
        registry.with(stderr_layer).init();
    } else {
        registry.init();
    }

    tracing::info!(dir = %options.dir.display(), prefix, "logging initialised");
    Ok(file_guard)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// A blank prefix or one containing a path separator falls back to the default.
fn file_prefix(prefix: &str) -> &str {
    let trimmed = prefix.trim();
    if trimmed.is_empty() || trimmed.contains(['/', '\\']) {
        DEFAULT_LOG_PREFIX
    } else {
        trimmed
    }
}
