use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "foxmarks=info";

/// Logs to stderr, filtered by `RUST_LOG`. `log` records are bridged in.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
