//! File configuration merged with command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use highs::ScanConfig;
use highs_report::DEFAULT_FILE_PREFIX;
use serde::Deserialize;

use crate::cli::{Cli, OutputFormat};

/// Everything the binary reads from `--config`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) scan: ScanConfig,
    pub(crate) output: OutputConfig,
    pub(crate) email: EmailSection,
    pub(crate) logging: LoggingConfig,
    pub(crate) universe_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct OutputConfig {
    pub(crate) format: OutputFormat,
    pub(crate) dir: PathBuf,
    pub(crate) file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::None,
            dir: PathBuf::from("."),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct EmailSection {
    pub(crate) to: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct LoggingConfig {
    pub(crate) level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `path` if given, otherwise returns the defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub(crate) fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Applies flags on top of the file values and validates the result.
    pub(crate) fn apply(mut self, cli: &Cli) -> Result<Self> {
        let scan = &mut self.scan;
        if let Some(weeks_back) = cli.weeks_back {
            scan.weeks_back = weeks_back;
        }
        if let Some(week) = cli.week {
            scan.week = week.into();
        }
        if let Some(strategy) = cli.strategy {
            scan.strategy = strategy.into();
        }
        if let Some(tolerance) = cli.tolerance {
            scan.detector.tolerance = tolerance;
        }
        if let Some(min_history) = cli.min_history {
            scan.detector.min_history = min_history;
        }
        if let Some(threshold) = cli.threshold {
            scan.near_high.threshold_percent = threshold;
        }
        if let Some(format) = cli.output {
            self.output.format = format;
        }
        if let Some(dir) = &cli.output_dir {
            self.output.dir.clone_from(dir);
        }
        if let Some(to) = &cli.email {
            self.email.to = Some(to.clone());
        }
        if let Some(file) = &cli.universe_file {
            self.universe_file = Some(file.clone());
        }
        if cli.verbose {
            self.logging.level = "debug".to_string();
        }

        self.scan.validate().context("invalid scan configuration")?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use highs::{DetectionStrategy, WeekVariant};
    use std::io::Write;

    const FILE: &str = r#"
universe_file = "banks.txt"

[scan]
weeks_back = 1
week = "calendar"
strategy = "all-matches"
batch_size = 20

[scan.detector]
tolerance = 0.002

[output]
format = "csv"
dir = "reports"

[email]
to = "desk@example.com"
"#;

    #[test]
    fn test_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.scan, ScanConfig::default());
        assert_eq!(config.output.format, OutputFormat::None);
        assert_eq!(config.output.file_prefix, "nifty100_52w_highs");
        assert_eq!(config.logging.level, "info");
        assert!(config.email.to.is_none());
    }

    #[test]
    fn test_parse_file() {
        let config = AppConfig::parse(FILE).unwrap();
        assert_eq!(config.scan.weeks_back, 1);
        assert_eq!(config.scan.week, WeekVariant::Calendar);
        assert_eq!(config.scan.strategy, DetectionStrategy::AllMatches);
        assert_eq!(config.scan.detector.tolerance, 0.002);
        assert_eq!(config.scan.detector.min_history, 200);
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.output.dir, PathBuf::from("reports"));
        assert_eq!(config.email.to.as_deref(), Some("desk@example.com"));
        assert_eq!(config.universe_file, Some(PathBuf::from("banks.txt")));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FILE.as_bytes()).unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.scan.batch_size, 20);
    }

    #[test]
    fn test_bad_file_is_reported() {
        assert!(AppConfig::parse("[scan]\nweeks_back = \"soon\"").is_err());
        assert!(AppConfig::load(Some(Path::new("/nonexistent/highs.toml"))).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let cli = Cli::try_parse_from([
            "weekly-highs",
            "--weeks-back",
            "0",
            "--strategy",
            "week-aggregate",
            "--output",
            "excel",
            "--threshold",
            "2.5",
            "-v",
        ])
        .unwrap();
        let config = AppConfig::parse(FILE).unwrap().apply(&cli).unwrap();

        assert_eq!(config.scan.weeks_back, 0);
        assert_eq!(config.scan.strategy, DetectionStrategy::WeekAggregate);
        assert_eq!(config.scan.week, WeekVariant::Calendar);
        assert_eq!(config.scan.near_high.threshold_percent, 2.5);
        assert_eq!(config.output.format, OutputFormat::Excel);
        assert_eq!(config.output.dir, PathBuf::from("reports"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli = Cli::try_parse_from(["weekly-highs", "--tolerance", "1.5"]).unwrap();
        assert!(AppConfig::default().apply(&cli).is_err());

        let cli = Cli::try_parse_from(["weekly-highs", "--weeks-back", "4294967295"]).unwrap();
        assert!(AppConfig::default().apply(&cli).is_err());
    }
}
