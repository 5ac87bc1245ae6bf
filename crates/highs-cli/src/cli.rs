//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use highs::{DetectionStrategy, WeekVariant};
use serde::{Deserialize, Serialize};

/// Scan the Nifty 100 for stocks that made a new 52-week high in a given week.
///
/// Flags override values from `--config`; anything left unset falls back to
/// the file and then to built-in defaults.
#[derive(Debug, Parser)]
#[command(name = "weekly-highs", version, about = "Nifty 100 weekly 52-week high detector")]
pub(crate) struct Cli {
    /// Number of weeks back to check (0 = current week).
    #[arg(long, value_name = "N")]
    pub(crate) weeks_back: Option<u32>,

    /// Save results to file.
    #[arg(long, value_enum)]
    pub(crate) output: Option<OutputFormat>,

    /// Email address to send the report to.
    #[arg(long, value_name = "ADDR")]
    pub(crate) email: Option<String>,

    /// Also list stocks trading near their 52-week high.
    #[arg(long)]
    pub(crate) near_high: bool,

    /// Threshold percentage for the near-high list [default: 5].
    #[arg(long, value_name = "F")]
    pub(crate) threshold: Option<f64>,

    /// Week definition.
    #[arg(long, value_enum)]
    pub(crate) week: Option<WeekArg>,

    /// Detection rule.
    #[arg(long, value_enum)]
    pub(crate) strategy: Option<StrategyArg>,

    /// Treat this date as today (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub(crate) as_of: Option<NaiveDate>,

    /// TOML configuration file.
    #[arg(long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Scan the symbols in FILE (one per line) instead of the Nifty 100.
    #[arg(long, value_name = "FILE")]
    pub(crate) universe_file: Option<PathBuf>,

    /// Directory for CSV and Excel files.
    #[arg(long, value_name = "DIR")]
    pub(crate) output_dir: Option<PathBuf>,

    /// Fraction below the prior high that still counts as a high.
    #[arg(long, value_name = "F")]
    pub(crate) tolerance: Option<f64>,

    /// Bars required in the 365-day baseline.
    #[arg(long, value_name = "N")]
    pub(crate) min_history: Option<usize>,

    /// Debug logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

/// Which result files to write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// Console only.
    #[default]
    None,
    /// CSV file.
    Csv,
    /// Excel workbook.
    Excel,
    /// CSV and Excel.
    Both,
}

impl OutputFormat {
    pub(crate) const fn csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }

    pub(crate) const fn excel(self) -> bool {
        matches!(self, Self::Excel | Self::Both)
    }
}

/// Week definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum WeekArg {
    /// Monday to Friday.
    Trading,
    /// Monday to Sunday.
    Calendar,
}

impl From<WeekArg> for WeekVariant {
    fn from(arg: WeekArg) -> Self {
        match arg {
            WeekArg::Trading => Self::Trading,
            WeekArg::Calendar => Self::Calendar,
        }
    }
}

/// Detection rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum StrategyArg {
    /// First qualifying day per stock.
    FirstMatch,
    /// Every qualifying day per stock.
    AllMatches,
    /// The week's peak against the year before the week.
    WeekAggregate,
}

impl From<StrategyArg> for DetectionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::FirstMatch => Self::FirstMatch,
            StrategyArg::AllMatches => Self::AllMatches,
            StrategyArg::WeekAggregate => Self::WeekAggregate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_leave_everything_unset() {
        let cli = Cli::try_parse_from(["weekly-highs"]).unwrap();
        assert!(cli.weeks_back.is_none());
        assert!(cli.output.is_none());
        assert!(!cli.near_high);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "weekly-highs",
            "--weeks-back",
            "2",
            "--output",
            "both",
            "--email",
            "desk@example.com",
            "--near-high",
            "--threshold",
            "3.5",
            "--week",
            "calendar",
            "--strategy",
            "week-aggregate",
            "--as-of",
            "2025-09-26",
            "--tolerance",
            "0.002",
            "--min-history",
            "150",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.weeks_back, Some(2));
        assert_eq!(cli.output, Some(OutputFormat::Both));
        assert_eq!(cli.email.as_deref(), Some("desk@example.com"));
        assert!(cli.near_high);
        assert_eq!(cli.threshold, Some(3.5));
        assert_eq!(cli.week, Some(WeekArg::Calendar));
        assert_eq!(cli.strategy, Some(StrategyArg::WeekAggregate));
        assert_eq!(cli.as_of, NaiveDate::from_ymd_opt(2025, 9, 26));
        assert_eq!(cli.min_history, Some(150));
        assert!(cli.verbose);
    }

    #[test]
    fn test_rejects_unknown_output() {
        assert!(Cli::try_parse_from(["weekly-highs", "--output", "pdf"]).is_err());
    }

    #[test]
    fn test_output_format_flags() {
        assert!(OutputFormat::Both.csv() && OutputFormat::Both.excel());
        assert!(OutputFormat::Csv.csv() && !OutputFormat::Csv.excel());
        assert!(!OutputFormat::None.csv() && !OutputFormat::None.excel());
    }
}
