//! Output formatting utilities with TTY auto-detection and semantic styling.

use std::io::IsTerminal;

use clap::ValueEnum;
use colored::{ColoredString, Colorize};

use crate::config::{self, Config};

/// Output format for commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-optimized: colors, highlighted matches, tables
    #[default]
    Pretty,
    /// Script-optimized: no colors, pipe-delimited
    Plain,
    /// Machine-readable JSON
    Json,
    /// Machine-readable YAML
    Yaml,
}

impl OutputFormat {
    /// Resolve the output format, applying TTY auto-detection.
    ///
    /// If format is Pretty but stdout is not a TTY, returns Plain.
    pub fn resolve(self) -> Self {
        match self {
            OutputFormat::Pretty if !std::io::stdout().is_terminal() => OutputFormat::Plain,
            other => other,
        }
    }

    /// Parse FZRANK_FORMAT, ignoring unknown values.
    pub fn from_env() -> Option<Self> {
        config::env_string("FZRANK_FORMAT")
            .and_then(|v| OutputFormat::from_str(v.trim(), true).ok())
    }
}

/// Apply NO_COLOR / FORCE_COLOR before anything is printed.
pub fn init_color() {
    if config::env_is_set("NO_COLOR") {
        colored::control::set_override(false);
    } else if config::env_is_set("FORCE_COLOR") {
        colored::control::set_override(true);
    }
}

// ============================================================================
// Semantic Styling
// ============================================================================

/// Score colors.
/// - Green: strong match (boundary-aligned or contiguous)
/// - Normal: ordinary match
/// - Dimmed: zero or negative (empty query, heavy gaps)
pub fn style_score(score: i64) -> ColoredString {
    let s = score.to_string();
    if score >= 64 {
        s.green()
    } else if score > 0 {
        s.normal()
    } else {
        s.dimmed()
    }
}

/// Format ranges as `0..1,2..3`.
pub fn format_ranges(ranges: &[(usize, usize)]) -> String {
    ranges
        .iter()
        .map(|(s, e)| format!("{}..{}", s, e))
        .collect::<Vec<_>>()
        .join(",")
}

/// Print a dimmed hint to stderr unless quiet mode is on.
pub fn hint(config: &Config, message: &str) {
    if !config::is_quiet(config) {
        eprintln!("{}", format!("Hint: {}", message).dimmed());
    }
}

// ============================================================================
// Terminal utilities
// ============================================================================

/// Get terminal width, defaulting to 80 if unavailable.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Truncate a string from the back, showing "prefix…".
pub fn truncate_back(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        "…".to_string()
    } else {
        let truncated: String = s.chars().take(max_chars - 1).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ranges() {
        assert_eq!(format_ranges(&[(0, 1), (2, 5)]), "0..1,2..5");
        assert_eq!(format_ranges(&[]), "");
    }

    #[test]
    fn test_non_pretty_formats_resolve_unchanged() {
        assert_eq!(OutputFormat::Json.resolve(), OutputFormat::Json);
        assert_eq!(OutputFormat::Plain.resolve(), OutputFormat::Plain);
        assert_eq!(OutputFormat::Yaml.resolve(), OutputFormat::Yaml);
    }

    #[test]
    fn test_truncate_back() {
        assert_eq!(truncate_back("hello", 10), "hello");
        assert_eq!(truncate_back("hello world", 6), "hello…");
        assert_eq!(truncate_back("hello", 1), "…");
    }

    #[test]
    fn test_style_score_keeps_text() {
        assert!(style_score(80).to_string().contains("80"));
        assert!(style_score(-3).to_string().contains("-3"));
    }
}
