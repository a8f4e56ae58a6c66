//! Environment-driven settings for binaries built on cmdbind.

use std::path::PathBuf;

use clap::ValueEnum;

/// Log file path. Unset means logs go to stderr.
pub const LOG_FILE_ENV: &str = "CMDBIND_LOG";
/// Default tracing filter when `RUST_LOG` is unset.
pub const LOG_LEVEL_ENV: &str = "CMDBIND_LOG_LEVEL";
/// `text` or `json`.
pub const OUTPUT_ENV: &str = "CMDBIND_OUTPUT";
pub const NO_COLOR_ENV: &str = "NO_COLOR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub output: OutputFormat,
    pub no_color: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let output = match lookup(OUTPUT_ENV) {
            Some(raw) => OutputFormat::from_str(raw.trim(), true).unwrap_or_else(|_| {
                eprintln!("Warning: ignoring {}={}, expected text or json", OUTPUT_ENV, raw);
                OutputFormat::Text
            }),
            None => OutputFormat::Text,
        };

        Self {
            log_file: lookup(LOG_FILE_ENV)
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            log_level: lookup(LOG_LEVEL_ENV).filter(|level| !level.is_empty()),
            output,
            no_color: lookup(NO_COLOR_ENV).is_some(),
        }
    }

    /// Filter used when neither `RUST_LOG` nor `CMDBIND_LOG_LEVEL` is set.
    /// Stderr stays quiet by default so presented errors are not duplicated;
    /// a log file records warnings and up.
    pub fn default_log_level(&self) -> &str {
        match (&self.log_level, &self.log_file) {
            (Some(level), _) => level,
            (None, Some(_)) => "warn",
            (None, None) => "off",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]);
        assert_eq!(s.output, OutputFormat::Text);
        assert_eq!(s.log_file, None);
        assert!(!s.no_color);
        assert_eq!(s.default_log_level(), "off");
    }

    #[test]
    fn test_output_is_case_insensitive() {
        assert_eq!(settings(&[(OUTPUT_ENV, "JSON")]).output, OutputFormat::Json);
        assert_eq!(settings(&[(OUTPUT_ENV, "yaml")]).output, OutputFormat::Text);
    }

    #[test]
    fn test_log_file_raises_default_level() {
        let s = settings(&[(LOG_FILE_ENV, "/tmp/cmdbind.log")]);
        assert_eq!(s.log_file, Some(PathBuf::from("/tmp/cmdbind.log")));
        assert_eq!(s.default_log_level(), "warn");

        let s = settings(&[(LOG_FILE_ENV, "/tmp/x.log"), (LOG_LEVEL_ENV, "debug")]);
        assert_eq!(s.default_log_level(), "debug");
    }

    #[test]
    fn test_no_color_presence() {
        assert!(settings(&[(NO_COLOR_ENV, "")]).no_color);
    }
}
