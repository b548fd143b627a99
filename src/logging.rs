use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize logging to standard error.
///
/// Defaults to `warn` level unless overridden by `MURMUR_LOG`. Stdout stays
/// untouched: it carries the live segment stream, so anything meant for a
/// human goes to stderr.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_env_var("MURMUR_LOG")
        .with_default_directive(tracing::level_filters::LevelFilter::WARN.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
