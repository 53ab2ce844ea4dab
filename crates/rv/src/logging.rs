use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr so
/// `rv openapi` output stays clean.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
