use std::collections::VecDeque;
use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

/// Prepends a stack of prefixes (e.g. the keyword being fetched) to messages.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    prefixes: VecDeque<String>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push_back(prefix.into());
        self
    }

    fn format(&self, message: &str) -> String {
        let prefix = self.prefixes.iter().map(|p| format!("{} ", p)).collect::<String>();
        format!("{}{}", prefix, message)
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}", self.format(message));
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!("{}", self.format(message));
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!("{}", self.format(message));
    }
}

/// Installs the fmt subscriber once; later calls only hand back a `Logger`.
pub fn init_logging(verbose: bool) -> Logger {
    if !tracing::dispatcher::has_been_set() {
        INIT.call_once(|| {
            let level = if verbose { Level::DEBUG } else { Level::INFO };
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .init();
        });
    }
    Logger::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_stack() {
        let logger = Logger::new().with_prefix("[1/6]").with_prefix("[carbon measures]");
        assert_eq!(logger.format("done"), "[1/6] [carbon measures] done");
        assert_eq!(Logger::new().format("plain"), "plain");
    }
}
