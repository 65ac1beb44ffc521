//! Error types for the fallible edges of the firmware.
//!
//! The control core itself has no error paths: pin levels and counters are
//! always well defined.  Only configuration overrides and operator input
//! can be rejected.  All variants are `Copy` so they can be reported
//! through the event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// A configuration override was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The override text is not valid JSON for [`SystemConfig`](crate::config::SystemConfig).
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed config"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Operator command errors
// ---------------------------------------------------------------------------

/// A serial command line could not be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Blank line.
    Empty,
    /// Unrecognised command word.
    Unknown,
    /// Known command with a bad or missing argument.
    BadArgument(&'static str),
    /// `CONFIG` payload rejected.
    Config(ConfigError),
    /// Input line longer than the receive buffer.
    Overflow,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::Unknown => write!(f, "unknown command"),
            Self::BadArgument(msg) => write!(f, "bad argument: {msg}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Overflow => write!(f, "line too long"),
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
