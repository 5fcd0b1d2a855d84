//! Tracing setup for the binary

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset, by `-v` count
fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "rubik=warn",
        1 => "rubik=info",
        _ => "rubik=debug",
    }
}

/// Install the global subscriber, writing to stderr so command output on
/// stdout stays clean. A second call is a no-op.
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity))),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_by_verbosity() {
        assert_eq!(default_filter(0), "rubik=warn");
        assert_eq!(default_filter(1), "rubik=info");
        assert_eq!(default_filter(5), "rubik=debug");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(0);
        init(2);
    }
}
