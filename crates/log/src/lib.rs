//! # formflow-log
//!
//! Thin bootstrap around `tracing-subscriber` so hosts and test suites install
//! the same filter and output format.
//!
//! ```rust,ignore
//! let config = formflow_log::Config::from_env();
//! formflow_log::init(&config)?;
//! tracing::info!("form engine ready");
//! ```

mod builder;
mod config;
mod error;

pub use builder::LoggerBuilder;
pub use config::{Config, DisplayConfig, Format};
pub use error::{LogError, LogResult};

// Re-export the event macros so callers need a single logging dependency.
pub use tracing::{debug, error, info, trace, warn};

/// Install the global subscriber described by `config`.
pub fn init(config: &Config) -> LogResult<()> {
    LoggerBuilder::from_config(config.clone()).build()
}

/// Install a subscriber suited for test binaries.
///
/// Output goes through the test writer so it is captured per test. Calling
/// this more than once is harmless.
pub fn init_test() {
    match LoggerBuilder::from_config(Config::testing()).test_writer().build() {
        Ok(()) | Err(LogError::AlreadyInitialized) => {}
        Err(e) => eprintln!("formflow-log: test subscriber not installed: {e}"),
    }
}
