//! Logging initialization.
//!
//! Every layer emits `tracing` events; this module installs the subscriber
//! that prints them. The filter comes from `RUST_LOG` when set.

use std::sync::Once;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "parity=info";

/// Output format of the installed subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines on stderr.
    Human,
    /// One JSON object per event on stderr.
    Json,
    /// Nothing is printed; events are still dispatched.
    Test,
}

static INIT_ONCE: Once = Once::new();

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber for `profile`.
///
/// Only the first call has an effect. If another subscriber was installed
/// already, the existing one is kept.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let installed = match profile {
            Profile::Human => tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .finish()
                .try_init(),
            Profile::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .finish()
                .try_init(),
            Profile::Test => tracing_subscriber::registry().try_init(),
        };
        if installed.is_err() {
            tracing::debug!("Global subscriber already installed");
        }
    });
}
