use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Filter directives, `RUST_LOG` syntax.
pub const FILTER_ENV: &str = "RUST_LOG";
/// Output format: `json`, `pretty` or `compact`.
pub const FORMAT_ENV: &str = "STOCKROOM_LOG_FORMAT";
pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
            LogFormat::Compact => "compact",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log format `{0}` (expected json, pretty or compact)")]
pub struct UnknownLogFormat(pub String);

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(UnknownLogFormat(s.to_string())),
        }
    }
}

/// What to log and how to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub filter: String,
    pub format: LogFormat,
    /// Route output through the test harness so `cargo test` captures it.
    pub test_writer: bool,
    /// A format value that could not be parsed; reported once logging is up.
    pub(crate) rejected_format: Option<UnknownLogFormat>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
            test_writer: false,
            rejected_format: None,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let filter = lookup(FILTER_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let (format, rejected_format) = match lookup(FORMAT_ENV) {
            None => (LogFormat::default(), None),
            Some(raw) => match raw.parse() {
                Ok(format) => (format, None),
                Err(e) => (LogFormat::default(), Some(e)),
            },
        };

        Self {
            filter,
            format,
            test_writer: false,
            rejected_format,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_test_writer(mut self) -> Self {
        self.test_writer = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_to_info_and_json() {
        let config = LogConfig::from_lookup(lookup(&[]));
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn reads_filter_and_format() {
        let config = LogConfig::from_lookup(lookup(&[
            ("RUST_LOG", "stockroom_infra=debug"),
            ("STOCKROOM_LOG_FORMAT", " Pretty "),
        ]));
        assert_eq!(config.filter, "stockroom_infra=debug");
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.rejected_format, None);
    }

    #[test]
    fn blank_filter_falls_back_to_default() {
        let config = LogConfig::from_lookup(lookup(&[("RUST_LOG", "  ")]));
        assert_eq!(config.filter, DEFAULT_FILTER);
    }

    #[test]
    fn unknown_format_falls_back_to_json() {
        let config = LogConfig::from_lookup(lookup(&[("STOCKROOM_LOG_FORMAT", "xml")]));
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.rejected_format, Some(UnknownLogFormat("xml".into())));
    }

    #[test]
    fn format_parsing_is_case_insensitive() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::Compact.to_string(), "compact");
    }
}
