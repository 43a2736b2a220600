use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SITETHEME_LOG";
const DEFAULT_DIRECTIVE: &str = "sitetheme=info";

/// Installs the fmt subscriber. Later calls are no-ops.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
