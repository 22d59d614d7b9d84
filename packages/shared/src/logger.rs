//! Logging setup for the fukubiki binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Log output covers both the library crates and the binary itself. The
/// default can be overridden with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "fukubiki-server")
/// * `default_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use fukubiki_shared::logger::setup_logger;
///
/// setup_logger("fukubiki-server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_level: &str) {
    let directives = format!(
        "fukubiki_server={level},fukubiki_client={level},fukubiki_shared={level},{bin}={level}",
        level = default_level,
        bin = binary_name.replace('-', "_"),
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| directives.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
