/*!
 * Error Types
 * Configuration errors with thiserror and miette diagnostics
 *
 * Lock operations themselves never fail: `acquire` blocks until it succeeds
 * and `release` of an unknown key is a no-op. Errors only surface while
 * building a manager from a configuration, or when an async acquire loses
 * its blocking task.
 */

use miette::Diagnostic;
use thiserror::Error;

/// Result type for keyed lock construction
pub type KeyedLockResult<T> = Result<T, KeyedLockError>;

/// Keyed lock errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum KeyedLockError {
    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(keyed_lock::invalid_config),
        help("Stripe count must be a non-zero power of two and prewarm_slots must not exceed the prewarm cap.")
    )]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    #[diagnostic(
        code(keyed_lock::config_parse),
        help("Configuration must be a JSON object with optional `backend`, `stripes` and `prewarm_slots` fields.")
    )]
    ConfigParse(String),

    #[error("Acquire was cancelled before the key was handed over")]
    #[diagnostic(
        code(keyed_lock::cancelled),
        help("The blocking task was aborted or panicked, usually because the runtime is shutting down.")
    )]
    Cancelled,
}

impl From<serde_json::Error> for KeyedLockError {
    fn from(err: serde_json::Error) -> Self {
        KeyedLockError::ConfigParse(err.to_string())
    }
}
