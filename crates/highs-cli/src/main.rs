//! `weekly-highs`: finds Nifty 100 stocks that made a 52-week high in a given week.

mod cli;
mod config;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use highs::{
    DataProviderRegistry, NSE_SUFFIX, ScanReport, TracingObserver, Universe, near_high, scan,
};
use highs_report::writer::{CSV_EXTENSION, EXCEL_EXTENSION};
use highs_report::{EmailConfig, ReportTable, email, report_path, write_csv, write_excel};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::{AppConfig, OutputConfig};

const RULE_WIDTH: usize = 80;
const EXCEL_SHEET: &str = "52W Highs";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?.apply(&cli)?;
    init_tracing(&config.logging.level);

    let universe = match &config.universe_file {
        Some(path) => Universe::from_file(path, Some(NSE_SUFFIX))
            .with_context(|| format!("failed to read universe file {}", path.display()))?,
        None => Universe::nifty100(),
    };
    let today = cli.as_of.unwrap_or_else(|| Local::now().date_naive());
    let registry = DataProviderRegistry::new()
        .with_timeout(config.scan.fetch_timeout())
        .with_yahoo();
    anyhow::ensure!(!registry.is_empty(), "no price provider configured");

    let report = scan(&universe, &registry, &config.scan, today, &TracingObserver).await?;
    let table = ReportTable::highs(&report.results);
    print_highs(&table);
    write_outputs(&config.output, &report, &table)?;

    if cli.near_high {
        let threshold = config.scan.near_high.threshold_percent;
        let near = near_high(&universe, &registry, today, threshold, &config.scan, &TracingObserver).await?;
        if near.records.is_empty() {
            println!("\nNo stocks within {threshold}% of their 52-week high.");
        } else {
            rule(&format!("STOCKS NEAR 52-WEEK HIGH (within {threshold}%)"));
            print!("{}", ReportTable::near_high(&near.records));
        }
    }

    if let Some(to) = &config.email.to {
        send_email(to, &report, &table).await;
    }

    Ok(())
}

fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn rule(title: &str) {
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!(" {title}");
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn print_highs(table: &ReportTable) {
    if table.is_empty() {
        println!("\nNo stocks hit 52-week highs during the scanned period.");
    } else {
        rule("STOCKS THAT HIT 52-WEEK HIGHS");
        print!("{table}");
    }
}

/// Writes the requested files; an empty result writes nothing.
fn write_outputs(output: &OutputConfig, report: &ScanReport, table: &ReportTable) -> Result<()> {
    if table.is_empty() {
        return Ok(());
    }
    if output.format.csv() {
        let path = report_path(&output.dir, &output.file_prefix, &report.window, CSV_EXTENSION);
        write_csv(table, &path).with_context(|| format!("failed to write {}", path.display()))?;
    }
    if output.format.excel() {
        let path = report_path(&output.dir, &output.file_prefix, &report.window, EXCEL_EXTENSION);
        write_excel(table, &path, EXCEL_SHEET).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Mails the report; failures are logged and never abort the run.
async fn send_email(to: &str, report: &ScanReport, table: &ReportTable) {
    let config = match EmailConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Error sending email: {e}");
            return;
        }
    };

    let now = Local::now().naive_local();
    let subject = email::subject(now.date());
    let body = email::body(&report.window, table, now);
    info!(to = to, server = %config.smtp_server, "Sending email report");
    if let Err(e) = email::send(&config, to, &subject, body).await {
        error!("Error sending email: {e}");
    }
}
