//! Logging utilities for CLI output
//!
//! User-facing progress goes to stdout through [`log`]; diagnostics go through
//! `tracing` and are filtered by the subscriber installed in `main`.

use tracing::level_filters::LevelFilter;

/// Log level for CLI output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Suppress all output
    Quiet,
    /// Normal output level
    Normal,
    /// Verbose output with additional details
    Verbose,
}

impl LogLevel {
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            LogLevel::Quiet
        } else if verbose {
            LogLevel::Verbose
        } else {
            LogLevel::Normal
        }
    }

    /// Default `tracing` filter for this output level
    pub fn tracing_filter(self) -> LevelFilter {
        match self {
            LogLevel::Quiet => LevelFilter::ERROR,
            LogLevel::Normal => LevelFilter::WARN,
            LogLevel::Verbose => LevelFilter::DEBUG,
        }
    }
}

/// Log a message if the current level permits it
pub fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags_quiet_wins() {
        assert_eq!(LogLevel::from_flags(true, true), LogLevel::Quiet);
        assert_eq!(LogLevel::from_flags(false, true), LogLevel::Verbose);
        assert_eq!(LogLevel::from_flags(false, false), LogLevel::Normal);
    }

    #[test]
    fn test_tracing_filter() {
        assert_eq!(LogLevel::Quiet.tracing_filter(), LevelFilter::ERROR);
        assert_eq!(LogLevel::Normal.tracing_filter(), LevelFilter::WARN);
        assert_eq!(LogLevel::Verbose.tracing_filter(), LevelFilter::DEBUG);
    }
}
