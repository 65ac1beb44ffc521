//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (serial console
//! today) that the [`AppService`](super::service::AppService) interprets
//! and acts upon.

use crate::config::SystemConfig;
use crate::error::CommandError;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Arm the system.  The evaluator moves Idle → Monitoring.
    Arm,

    /// Disarm immediately, bypassing transition debounce.
    Disarm,

    /// Emit a full status report.
    Status,

    /// Toggle verbose sensor reporting.
    Verbose(bool),

    /// Hot-swap the configuration.  Not persisted.
    UpdateConfig(SystemConfig),
}

/// Usage line shown after a rejected command.
pub const USAGE: &str = "ARM | DISARM | STATUS | VERBOSE ON|OFF | CONFIG {json}";

impl AppCommand {
    /// Parse one console line.  Keywords are case-insensitive; surrounding
    /// whitespace is ignored.  The `CONFIG` payload is passed to
    /// [`SystemConfig::from_json`] verbatim.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };

        if head.eq_ignore_ascii_case("ARM") && rest.is_empty() {
            Ok(Self::Arm)
        } else if head.eq_ignore_ascii_case("DISARM") && rest.is_empty() {
            Ok(Self::Disarm)
        } else if head.eq_ignore_ascii_case("STATUS") && rest.is_empty() {
            Ok(Self::Status)
        } else if head.eq_ignore_ascii_case("VERBOSE") {
            if rest.eq_ignore_ascii_case("ON") {
                Ok(Self::Verbose(true))
            } else if rest.eq_ignore_ascii_case("OFF") {
                Ok(Self::Verbose(false))
            } else {
                Err(CommandError::BadArgument("VERBOSE expects ON or OFF"))
            }
        } else if head.eq_ignore_ascii_case("CONFIG") {
            if rest.is_empty() {
                return Err(CommandError::BadArgument("CONFIG expects a JSON object"));
            }
            Ok(Self::UpdateConfig(SystemConfig::from_json(rest)?))
        } else {
            Err(CommandError::Unknown)
        }
    }
}
