#![deny(missing_docs)]
//! Log macros for the novel platform client.
//!
//! The client logs failed requests with their method and path, every token
//! refresh and whether it succeeded, and session file read or write errors.
//! The CLI adds one debug line per dispatched search message. Tokens only
//! appear in logs through [`redact`], which keeps a short prefix and the
//! length.
//!
//! Logger setup belongs to the binary. Tests call [`initialize_for_tests`].

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! novel_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! novel_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! novel_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! novel_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! novel_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Renders a secret (access or refresh token) for log output.
///
/// Only the length and a four character prefix survive, which is enough to
/// tell two tokens apart in a trace.
pub fn redact(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{prefix}…({} chars)", secret.chars().count())
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::redact;

    #[test]
    fn redact_keeps_prefix_and_length_only() {
        assert_eq!(redact("abcdefgh"), "abcd…(8 chars)");
        assert_eq!(redact("ab"), "ab…(2 chars)");
    }
}
