//! Shared CLI argument structs for consistent flag definitions across commands.
//!
//! Use `#[command(flatten)]` to include them in command-specific Args structs.

use clap::Args;

use fzrank::CaseMode;

use crate::config::{self, Config};
use crate::output::OutputFormat;

// ============================================================================
// FormatArgs - Output format flags
// ============================================================================

/// Common output format flags.
///
/// Provides consistent --format/-f and --json flags across commands.
/// Use `resolve()` to get the effective format with TTY auto-detection.
#[derive(Args, Clone, Debug, Default)]
pub struct FormatArgs {
    /// Output format (default: $FZRANK_FORMAT or pretty; auto-detects TTY)
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output as JSON (shorthand for --format=json)
    #[arg(long, conflicts_with = "format")]
    pub json: bool,
}

impl FormatArgs {
    /// Resolve the effective output format.
    ///
    /// Precedence: --json, --format, FZRANK_FORMAT, pretty. Pretty falls
    /// back to plain when stdout is not a TTY.
    pub fn resolve(&self) -> OutputFormat {
        if self.json {
            return OutputFormat::Json;
        }
        self.format
            .or_else(OutputFormat::from_env)
            .unwrap_or_default()
            .resolve()
    }
}

// ============================================================================
// MatchingArgs - Query interpretation flags
// ============================================================================

/// Flags controlling how a query is matched.
#[derive(Args, Clone, Debug, Default)]
pub struct MatchingArgs {
    /// Case handling (default: $FZRANK_CASE or config, else smart)
    #[arg(long, value_enum)]
    pub case: Option<CaseMode>,

    /// Shorthand for --case=ignore
    #[arg(short = 'i', long, conflicts_with = "case")]
    pub ignore_case: bool,

    /// Match the whole query as one pattern instead of whitespace tokens
    #[arg(long)]
    pub no_split: bool,
}

impl MatchingArgs {
    /// Effective case mode: flags, then FZRANK_CASE, then config.
    pub fn case_mode(&self, config: &Config) -> CaseMode {
        if self.ignore_case {
            CaseMode::Ignore
        } else {
            self.case.unwrap_or_else(|| config::case_mode(config))
        }
    }

    /// Whether to split the query into whitespace tokens.
    pub fn split_tokens(&self, config: &Config) -> bool {
        !self.no_split && config.matching.split_tokens
    }

    /// Short description for headers, e.g. "case=smart, tokens".
    pub fn description(&self, config: &Config) -> String {
        let split = if self.split_tokens(config) {
            "tokens"
        } else {
            "whole query"
        };
        format!("case={}, {}", self.case_mode(config).as_str(), split)
    }
}

// ============================================================================
// Tests
// ============================================================================
