//! Tracing subscriber setup for binaries and load runs.

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

use crate::config::LoggingSettings;

/// Install the global subscriber, writing to stderr. `RUST_LOG` wins over
/// `settings.level`.
///
/// # Errors
///
/// [`TryInitError`] if a global subscriber is already installed.
pub fn init_tracing(settings: &LoggingSettings) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(settings.ansi)
                .with_thread_ids(settings.thread_ids)
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
}
