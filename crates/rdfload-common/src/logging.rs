//! Logging setup
//!
//! One `tracing` subscriber per process, writing to stderr so that stdout
//! only carries the import report. A [`LogConfig`] starts from command-line
//! choices and can be overridden from the environment:
//!
//! - `LOG_LEVEL`: trace, debug, info, warn, error
//! - `LOG_FORMAT`: text, json
//! - `LOG_FILTER`: extra `EnvFilter` directives, comma separated
//! - `LOG_INCLUDE_TARGETS`: true/false
//!
//! Prefer structured fields for values worth filtering on:
//!
//! ```rust,ignore
//! info!(file = %name, triples = loaded, "Imported file");
//! warn!(attempt, max_attempts, error = %err, "Import attempt failed");
//! ```

use anyhow::{anyhow, Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Minimum level that is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(anyhow!("invalid log level '{}'", s)),
        }
    }
}

/// Line format of the stderr output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow!("invalid log format '{}', expected text or json", s)),
        }
    }
}

/// Subscriber settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Extra directives such as `neo4rs=warn`
    pub directives: Option<String>,
    /// Print the module path of each event
    pub include_targets: bool,
}

impl LogConfig {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    pub fn include_targets(mut self, include: bool) -> Self {
        self.include_targets = include;
        self
    }

    /// Apply `LOG_*` variables from the process environment
    pub fn with_env(self) -> Result<Self> {
        self.overlay(|key| std::env::var(key).ok())
    }

    /// Apply `LOG_*` values obtained through `lookup`
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(level) = lookup("LOG_LEVEL") {
            self.level = level.parse().context("LOG_LEVEL")?;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.format = format.parse().context("LOG_FORMAT")?;
        }
        if let Some(directives) = lookup("LOG_FILTER") {
            self.directives = Some(directives);
        }
        if let Some(include) = lookup("LOG_INCLUDE_TARGETS") {
            self.include_targets = include.trim().parse().with_context(|| {
                format!("LOG_INCLUDE_TARGETS: expected true or false, got '{}'", include)
            })?;
        }
        Ok(self)
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        let mut filter = EnvFilter::from_default_env().add_directive(self.level.as_filter().into());

        for directive in self
            .directives
            .iter()
            .flat_map(|d| d.split(','))
            .map(str::trim)
            .filter(|d| !d.is_empty())
        {
            filter = filter.add_directive(
                directive
                    .parse()
                    .with_context(|| format!("invalid log filter directive '{}'", directive))?,
            );
        }

        Ok(filter)
    }
}

/// Install the global subscriber; call once at startup
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = config.env_filter()?;
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.include_targets);

    match config.format {
        LogFormat::Text => tracing_subscriber::registry().with(filter).with(layer).try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init()?,
    }

    Ok(())
}
