// 📝 Logging - tracing subscriber setup for binaries

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "payroll_aggregator=info";

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to `default_filter`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
