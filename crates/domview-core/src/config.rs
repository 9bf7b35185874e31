/// Runtime configuration for domview applications.
#[derive(Debug, Clone)]
pub struct Config {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Output format of the log subscriber.
    pub log_format: LogFormat,
    /// Emit ANSI colour codes. Ignored in the browser.
    pub ansi: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_filter: "info,domview=debug".to_string(),
            log_format: LogFormat::Full,
            ansi: true,
        }
    }
}

impl Config {
    /// Configuration suited to tests: quiet by default, no colours.
    pub fn quiet() -> Self {
        Config {
            log_filter: "warn".to_string(),
            log_format: LogFormat::Compact,
            ansi: false,
        }
    }

    /// Override the log filter directive.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Override the log format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Default multi-field format
    Full,
    /// Single-line compact format
    Compact,
}
