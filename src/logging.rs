//! Logging - tracing subscriber on stderr (stdout is reserved for command output)

use tracing_subscriber::{fmt, EnvFilter};

use crate::core::paths::env as vars;

const DEFAULT_DIRECTIVES: &str = "safewallet=info,tower_http=info,warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl LogFormat {
    /// `SAFEWALLET_LOG_JSON=1` wins, then `SAFEWALLET_LOG_FORMAT`.
    pub fn from_env() -> Self {
        if std::env::var(vars::LOG_JSON).map(|v| v == "1").unwrap_or(false) {
            return LogFormat::Json;
        }
        std::env::var(vars::LOG_FORMAT)
            .ok()
            .and_then(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "compact" | "plain" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

pub fn init_logging() {
    init_logging_with(LogFormat::from_env());
}

pub fn init_logging_with(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    // try_init: tests and embedders may have installed a subscriber already
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
