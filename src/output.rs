//! # Output Configuration
//!
//! Controls whether the CLI colors its messages. The module respects the
//! following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```
//! use git_sort::output::{OutputConfig, Severity};
//!
//! let config = OutputConfig::from_env_and_flag("never");
//! assert_eq!(config.label(Severity::Error), "Error:");
//! ```

use std::env;

use console::style;

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

/// Kind of message printed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stderr is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        // Messages go to stderr
        console::Term::stderr().features().colors_supported()
    }

    /// The label printed in front of a message, colored when enabled.
    pub fn label(&self, severity: Severity) -> String {
        let text = match severity {
            Severity::Error => "Error:",
            Severity::Warning => "Warning:",
        };
        if !self.use_color {
            return text.to_string();
        }
        match severity {
            Severity::Error => style(text).red().bold().force_styling(true).to_string(),
            Severity::Warning => style(text).yellow().bold().force_styling(true).to_string(),
        }
    }

    /// Format a message with its label.
    pub fn message(&self, severity: Severity, message: impl std::fmt::Display) -> String {
        format!("{} {}", self.label(severity), message)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const COLOR_VARS: [&str; 4] = ["NO_COLOR", "CLICOLOR", "CLICOLOR_FORCE", "TERM"];

    /// Run `f` with the color variables set to `vars`, restoring them after.
    fn with_color_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let saved: Vec<_> = COLOR_VARS.iter().map(|k| (*k, env::var_os(k))).collect();
        for key in COLOR_VARS {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = f();
        for (key, value) in saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
        result
    }

    #[test]
    #[serial]
    fn test_auto_respects_no_color() {
        let config = with_color_env(&[("NO_COLOR", ""), ("CLICOLOR_FORCE", "1")], || {
            OutputConfig::from_env_and_flag("auto")
        });
        assert!(!config.use_color);
    }

    #[test]
    #[serial]
    fn test_auto_respects_clicolor() {
        let config = with_color_env(&[("CLICOLOR", "0")], || OutputConfig::from_env_and_flag("auto"));
        assert!(!config.use_color);
    }

    #[test]
    #[serial]
    fn test_auto_forced_colors() {
        let config = with_color_env(&[("CLICOLOR_FORCE", "1"), ("TERM", "dumb")], || {
            OutputConfig::from_env_and_flag("auto")
        });
        assert!(config.use_color);
    }

    #[test]
    #[serial]
    fn test_auto_dumb_terminal() {
        let config = with_color_env(&[("TERM", "dumb")], || OutputConfig::from_env_and_flag("auto"));
        assert!(!config.use_color);
    }

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("never");
        assert!(!config.use_color);
    }

    #[test]
    fn test_color_flag_is_case_insensitive() {
        assert!(OutputConfig::from_env_and_flag("ALWAYS").use_color);
        assert!(!OutputConfig::from_env_and_flag("Never").use_color);
    }

    #[test]
    fn test_plain_labels() {
        let config = OutputConfig { use_color: false };
        assert_eq!(config.label(Severity::Warning), "Warning:");
        assert_eq!(
            config.message(Severity::Error, "Input is not sorted."),
            "Error: Input is not sorted."
        );
    }

    #[test]
    fn test_colored_labels_keep_text() {
        let config = OutputConfig { use_color: true };
        let label = config.label(Severity::Error);
        assert_ne!(label, "Error:");
        assert_eq!(console::strip_ansi_codes(&label), "Error:");
    }
}
