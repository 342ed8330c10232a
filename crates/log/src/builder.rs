//! Logger builder implementation

use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::{Config, DisplayConfig, Format};
use crate::error::{LogError, LogResult};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
    test_writer: bool,
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self {
            config,
            test_writer: false,
        }
    }

    /// Route output through libtest's capturing writer.
    #[must_use]
    pub fn test_writer(mut self) -> Self {
        self.test_writer = true;
        self
    }

    /// Parse the filter directive without installing anything.
    pub fn filter(&self) -> LogResult<EnvFilter> {
        EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::Filter(format!("{}: {e}", self.config.level)))
    }

    /// Build and install the global subscriber.
    pub fn build(self) -> LogResult<()> {
        let filter = self.filter()?;
        let fmt_layer = self.fmt_layer();

        Registry::default()
            .with(fmt_layer)
            .with(filter)
            .try_init()
            .map_err(|_| LogError::AlreadyInitialized)
    }

    fn fmt_layer(&self) -> BoxedLayer {
        let DisplayConfig {
            colors,
            time,
            target,
            source,
        } = self.config.display.clone();

        macro_rules! finish {
            ($layer:expr) => {{
                let layer = $layer
                    .with_ansi(colors)
                    .with_target(target)
                    .with_file(source)
                    .with_line_number(source);
                match (self.test_writer, time) {
                    (true, true) => layer.with_test_writer().boxed(),
                    (true, false) => layer.with_test_writer().without_time().boxed(),
                    (false, true) => layer.boxed(),
                    (false, false) => layer.without_time().boxed(),
                }
            }};
        }

        match self.config.format {
            Format::Pretty => finish!(fmt::layer().pretty()),
            Format::Compact => finish!(fmt::layer().compact()),
            Format::Json => finish!(fmt::layer().json()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_filter_is_rejected_before_install() {
        let builder = LoggerBuilder::from_config(Config {
            level: "formflow=notalevel".to_string(),
            ..Config::default()
        });
        let err = builder.filter().unwrap_err();
        assert_eq!(err.code(), "LOG_FILTER");
    }

    #[test]
    fn valid_filter_parses() {
        let builder = LoggerBuilder::from_config(Config::development());
        assert!(builder.filter().is_ok());
    }
}
