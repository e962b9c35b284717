//! Terminal UI utilities: status messages and formatted output.
//!
//! Everything here writes to stderr so that stdout stays clean for `--raw`
//! JSON output. Gracefully degrades when colors or a TTY are unavailable.

mod format;
mod messages;

pub use format::{format_duration, format_size, print_build_report};
pub use messages::{error, info, success, warning};

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR, then falls back to terminal
/// detection on stderr.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    console::user_attended_stderr()
}

/// Initialize color support based on environment.
///
/// owo-colors respects NO_COLOR and terminal capabilities on its own;
/// this hook exists for explicit early initialization.
pub fn init_colors() {
    let _ = should_use_color();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_detection_does_not_panic() {
        let _ = should_use_color();
        init_colors();
    }
}
