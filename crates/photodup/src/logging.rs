//! Logging initialization.
//!
//! Logs go to stderr through `tracing-subscriber`; stdout is reserved for
//! scan results. `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `level` is any `EnvFilter` directive ("info", "photodup_core=debug", ...).
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section, with CLI overrides.
pub fn init_from_config(config: &photodup_core::Config, verbose: bool, json_logs: bool) {
    let (level, json_format) = resolve(config, verbose, json_logs);
    init(level, json_format);
}

/// Effective level and format. `--verbose` never lowers a more detailed
/// configured level.
fn resolve(config: &photodup_core::Config, verbose: bool, json_logs: bool) -> (&str, bool) {
    let configured = config.logging.level.as_str();
    let level = if verbose && configured != "trace" {
        "debug"
    } else {
        configured
    };
    (level, json_logs || config.logging.format == "json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use photodup_core::Config;

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(resolve(&Config::default(), false, false), ("info", false));
    }

    #[test]
    fn test_resolve_overrides() {
        let mut config = Config::default();
        assert_eq!(resolve(&config, true, true), ("debug", true));

        config.logging.level = "trace".into();
        config.logging.format = "json".into();
        assert_eq!(resolve(&config, true, false), ("trace", true));

        config.logging.level = "warn".into();
        assert_eq!(resolve(&config, false, false).0, "warn");
    }
}
