//! Structured logging system with visual formatting.
//!
//! All terminal output of planetr goes through [`Log`], which draws the schedule and
//! status messages with Unicode box drawing characters.
//!
//! Two runtime switches control output: a global enable flag for quiet operation
//! (`--quiet`, JSON output, tests) and a debug flag that gates [`Log::log_debug`].

use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Log level enumeration for categorizing message importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Log,  // Normal operational logs
    Warn, // Warning messages (non-fatal issues)
    Err,  // Error messages (recoverable failures)
    Crit, // Critical errors (may require user intervention)
    Info, // Informational messages (status updates)
}

impl LogLevel {
    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Log => "[LOG]",
            LogLevel::Warn => "[WARN]",
            LogLevel::Err => "[ERR]",
            LogLevel::Crit => "[CRIT]",
            LogLevel::Info => "[INFO]",
        }
    }
}

/// Main logging interface providing structured output formatting.
pub struct Log;

impl Log {
    /// Enable or disable all output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Show or hide messages logged through [`Log::log_debug`].
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_debug() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Main log function with level-based prefixes.
    ///
    /// # Arguments
    /// * `level` - LogLevel indicating message importance
    /// * `message` - Text content to log
    pub fn log(level: LogLevel, message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("{} {}", level.prefix(), message);
    }

    // ═══ Convenience Methods for Common Log Levels ═══

    /// Log an error message.
    pub fn log_error(message: &str) {
        Self::log(LogLevel::Err, message);
    }

    /// Log a warning message.
    pub fn log_warning(message: &str) {
        Self::log(LogLevel::Warn, message);
    }

    /// Log an informational message.
    pub fn log_info(message: &str) {
        Self::log(LogLevel::Info, message);
    }

    /// Log a debug message. Only shown when debug output is on.
    pub fn log_debug(message: &str) {
        if !Self::is_debug() {
            return;
        }
        Self::log(LogLevel::Log, message);
    }

    /// Log a critical error message.
    pub fn log_critical(message: &str) {
        Self::log(LogLevel::Crit, message);
    }

    // ═══ Visual Formatting Functions ═══

    /// Log a decorated message with visual branching indicator.
    ///
    /// Used for main status messages and important information.
    pub fn log_decorated(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┣ {}", message);
    }

    /// Log an indented message for sub-items or details.
    pub fn log_indented(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃   {}", message);
    }

    /// Log a visual pipe separator.
    pub fn log_pipe() {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
    }

    /// Log a block start message with visual separation.
    ///
    /// Used for each section of the schedule and for hour changes in watch mode.
    pub fn log_block_start(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
        println!("┣ {}", message);
    }

    /// Log the application version header.
    pub fn log_version() {
        if !Self::is_enabled() {
            return;
        }
        println!("┏ planetr v{} ━━╸", env!("CARGO_PKG_VERSION"));
        println!("┃");
    }

    /// Log the final termination marker.
    pub fn log_end() {
        if !Self::is_enabled() {
            return;
        }
        println!("╹");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_level_prefixes() {
        assert_eq!(LogLevel::Log.prefix(), "[LOG]");
        assert_eq!(LogLevel::Warn.prefix(), "[WARN]");
        assert_eq!(LogLevel::Crit.prefix(), "[CRIT]");
    }

    #[test]
    #[serial]
    fn test_switches_toggle() {
        Log::set_enabled(false);
        assert!(!Log::is_enabled());
        Log::set_enabled(true);
        assert!(Log::is_enabled());

        Log::set_debug(true);
        assert!(Log::is_debug());
        Log::set_debug(false);
        assert!(!Log::is_debug());
    }
}
