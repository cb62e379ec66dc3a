//! Command-line interface parsing for postcheck
//!
//! This module handles parsing of CLI arguments using clap: the positional
//! postcode, the required lookup mode, and the optional cache file override.
//! It also owns the presentation cap on autocomplete output.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Maximum number of completions printed for a single lookup
pub const MAX_SHOWN_COMPLETIONS: usize = 5;

/// Postcheck - validate and autocomplete UK postcodes
#[derive(Parser, Debug)]
#[command(name = "postcheck")]
#[command(about = "Validate and autocomplete UK postcodes")]
#[command(version)]
pub struct Cli {
    /// Postcode to validate, or postcode prefix to complete
    ///
    /// Examples:
    ///   postcheck "SW1A 1AA" --mode validate
    ///   postcheck SW1A -m complete
    pub postcode: String,

    /// Lookup to perform
    #[arg(long, short, value_enum)]
    pub mode: Mode,

    /// Use FILE as the cache document instead of the default location
    #[arg(long, value_name = "FILE")]
    pub cache_file: Option<PathBuf>,
}

/// The two lookups the CLI can perform
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Check whether the postcode is a valid UK postcode
    Validate,
    /// List postcodes starting with the given prefix
    Complete,
}

/// Caps an autocomplete answer to the slice the CLI prints
///
/// The lookup layer returns and caches the remote's full answer; only the
/// printed view is truncated.
pub fn visible_completions(completions: &[String]) -> &[String] {
    &completions[..completions.len().min(MAX_SHOWN_COMPLETIONS)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate_mode() {
        let cli = Cli::parse_from(["postcheck", "SW1A 1AA", "--mode", "validate"]);
        assert_eq!(cli.postcode, "SW1A 1AA");
        assert_eq!(cli.mode, Mode::Validate);
        assert!(cli.cache_file.is_none());
    }

    #[test]
    fn test_parse_complete_mode_short_flag() {
        let cli = Cli::parse_from(["postcheck", "SW1A", "-m", "complete"]);
        assert_eq!(cli.postcode, "SW1A");
        assert_eq!(cli.mode, Mode::Complete);
    }

    #[test]
    fn test_mode_is_required() {
        let result = Cli::try_parse_from(["postcheck", "SW1A 1AA"]);
        assert!(result.is_err(), "Omitting --mode should be a parse error");
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let result = Cli::try_parse_from(["postcheck", "SW1A 1AA", "--mode", "lookup"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_cache_file_override() {
        let cli = Cli::parse_from([
            "postcheck",
            "SW1A 1AA",
            "-m",
            "validate",
            "--cache-file",
            "/tmp/pc.json",
        ]);
        assert_eq!(cli.cache_file, Some(PathBuf::from("/tmp/pc.json")));
    }

    #[test]
    fn test_visible_completions_caps_at_five() {
        let completions: Vec<String> = (0..12).map(|i| format!("SW1A {}AA", i)).collect();
        let shown = visible_completions(&completions);
        assert_eq!(shown.len(), 5);
        assert_eq!(shown, &completions[..5], "The first five results are kept");
    }

    #[test]
    fn test_visible_completions_short_answer_unchanged() {
        let completions = vec!["SW1A 1AA".to_string(), "SW1A 2AA".to_string()];
        assert_eq!(visible_completions(&completions), completions.as_slice());
    }

    #[test]
    fn test_visible_completions_empty() {
        let completions: Vec<String> = Vec::new();
        assert!(visible_completions(&completions).is_empty());
    }
}
