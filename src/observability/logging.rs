//! Diagnostic logging.
//!
//! The [`Logger`] trait is the operator-facing diagnostic channel: fetch
//! failures and (when enabled) raw response bodies are written here and
//! nowhere else. The default implementation forwards to `tracing`.

use std::collections::HashMap;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Trace level.
    Trace = 0,
    /// Debug level.
    Debug = 1,
    /// Info level.
    #[default]
    Info = 2,
    /// Warning level.
    Warn = 3,
    /// Error level.
    Error = 4,
    /// Off (no logging).
    Off = 5,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Maximum body length to log.
    pub max_body_length: usize,
    /// Redact sensitive data.
    pub redact_sensitive: bool,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            max_body_length: 4096,
            redact_sensitive: true,
            json: false,
        }
    }
}

impl LogConfig {
    /// Creates a new log configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log level.
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the maximum logged body length.
    pub fn max_body_length(mut self, max: usize) -> Self {
        self.max_body_length = max;
        self
    }

    /// Switches output to JSON lines.
    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Disables sensitive data redaction.
    pub fn no_redact(mut self) -> Self {
        self.redact_sensitive = false;
        self
    }
}

/// Installs a global `tracing` subscriber for the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level. Returns `false`
/// if a global subscriber was already installed.
pub fn init_subscriber(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_filter()));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };

    result.is_ok()
}

/// Logger interface.
pub trait Logger: Send + Sync {
    /// Logs a message at the specified level.
    fn log(&self, level: LogLevel, message: &str, context: Option<&HashMap<String, String>>);

    /// Logs at trace level.
    fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message, None);
    }

    /// Logs at debug level.
    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, None);
    }

    /// Logs at info level.
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, None);
    }

    /// Logs at warning level.
    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, None);
    }

    /// Logs at error level.
    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, None);
    }
}

/// Logger that forwards to `tracing` events.
pub struct TracingLogger {
    config: LogConfig,
    patterns: Vec<(regex::Regex, &'static str)>,
}

impl TracingLogger {
    /// Creates a new tracing logger.
    pub fn new(config: LogConfig) -> Self {
        let patterns = [
            (r"Bearer [A-Za-z0-9._~+/=-]+", "Bearer ***"),
            (r"eyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+", "***.jwt"),
            (r#"(?i)(token|authorization)["']?\s*[=:]\s*["']?[^\s,}"']+"#, "$1=***"),
        ]
        .into_iter()
        .filter_map(|(pattern, replacement)| {
            regex::Regex::new(pattern).ok().map(|re| (re, replacement))
        })
        .collect();

        Self { config, patterns }
    }

    /// Creates with default configuration.
    pub fn default_config() -> Self {
        Self::new(LogConfig::default())
    }

    /// Redacts credentials and truncates overly long text.
    fn sanitize(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_sensitive {
            for (re, replacement) in &self.patterns {
                result = re.replace_all(&result, *replacement).into_owned();
            }
        }

        if result.len() > self.config.max_body_length {
            let mut cut = self.config.max_body_length;
            while !result.is_char_boundary(cut) {
                cut -= 1;
            }
            result.truncate(cut);
            result.push_str("...[truncated]");
        }

        result
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str, context: Option<&HashMap<String, String>>) {
        if level < self.config.level {
            return;
        }

        let message = self.sanitize(message);
        let context = context
            .map(|ctx| {
                let redacted: HashMap<&String, String> = ctx
                    .iter()
                    .map(|(k, v)| {
                        let v = if self.config.redact_sensitive
                            && (k.contains("key") || k.contains("token") || k.contains("auth"))
                        {
                            "***".to_string()
                        } else {
                            self.sanitize(v)
                        };
                        (k, v)
                    })
                    .collect();
                serde_json::to_string(&redacted).unwrap_or_default()
            })
            .unwrap_or_default();

        match level {
            LogLevel::Trace => tracing::trace!(context = %context, "{}", message),
            LogLevel::Debug => tracing::debug!(context = %context, "{}", message),
            LogLevel::Info => tracing::info!(context = %context, "{}", message),
            LogLevel::Warn => tracing::warn!(context = %context, "{}", message),
            LogLevel::Error => tracing::error!(context = %context, "{}", message),
            LogLevel::Off => {}
        }
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::default_config()
    }
}

impl std::fmt::Debug for TracingLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracingLogger")
            .field("config", &self.config)
            .finish()
    }
}

/// No-op logger that discards all messages.
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: LogLevel, _message: &str, _context: Option<&HashMap<String, String>>) {}
}

impl std::fmt::Debug for NoopLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoopLogger").finish()
    }
}
