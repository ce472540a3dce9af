use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

/// Log filter used when RUST_LOG is not set: progress from this crate, nothing from dependencies.
pub const DEFAULT_LOG_SETTINGS: &str = "sitemap_ltx=info";

/// Installs the global tracing subscriber.
///
/// The filter comes from RUST_LOG, falling back to `default_log_settings`.
/// Events go to stderr so that stdout only ever carries the generated llms.txt document.
pub fn setup_logging(default_log_settings: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_log_settings.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
}
