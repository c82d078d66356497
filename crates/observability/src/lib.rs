//! Tracing and logging setup shared by binaries, tests and benches.

/// Initialize process-wide logging from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(LogConfig::from_env());
}

pub use config::{LogConfig, LogFormat, UnknownLogFormat};
pub use self::tracing::init_with;

/// Environment-driven logging configuration.
pub mod config;

/// Subscriber installation.
pub mod tracing;
