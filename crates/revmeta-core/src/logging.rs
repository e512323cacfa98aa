use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::MirrorConfig;

/// Initialize a tracing subscriber with default configuration.
///
/// This sets up a subscriber that prints formatted logs to stdout.
/// It uses the `RUST_LOG` environment variable to determine the log level,
/// defaulting to "info" if not set.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    install("info")
}

/// Initialize tracing for a mirror configuration.
///
/// With the debug flag set the default level drops to "debug". `RUST_LOG`
/// still wins when present.
pub fn init_for(config: &MirrorConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    install(if config.debug { "debug" } else { "info" })
}

fn install(default_level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .compact();

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{info, warn};

    #[test]
    fn test_logging_init() {
        // Only one subscriber per process; a second init reports an error.
        let _ = init_for(&MirrorConfig::debug());
        assert!(init().is_err());

        info!("This is an info message");
        warn!("This is a warning message");
    }
}
