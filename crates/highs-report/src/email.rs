//! Plain-text email reports over SMTP.

use std::env;

use chrono::{NaiveDate, NaiveDateTime};
use highs::WeekWindow;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::error::{ReportError, Result};
use crate::table::ReportTable;

/// Default SMTP relay.
pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";

/// Default SMTP submission port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP connection settings.
#[derive(Clone)]
pub struct EmailConfig {
    /// Relay host name.
    pub smtp_server: String,
    /// Relay port.
    pub smtp_port: u16,
    /// Login user.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Sender address; defaults to `username`.
    pub from: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

impl EmailConfig {
    /// Reads `SMTP_SERVER`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD` and
    /// `SMTP_FROM` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::EmailConfig`] if the credentials are missing or
    /// the port is not a number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let username = lookup("SMTP_USERNAME")
            .ok_or_else(|| ReportError::EmailConfig("SMTP_USERNAME is not set".to_string()))?;
        let password = lookup("SMTP_PASSWORD")
            .ok_or_else(|| ReportError::EmailConfig("SMTP_PASSWORD is not set".to_string()))?;
        let smtp_port = match lookup("SMTP_PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| ReportError::EmailConfig(format!("SMTP_PORT is not a port number: {port}")))?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            smtp_server: lookup("SMTP_SERVER").unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
            smtp_port,
            from: lookup("SMTP_FROM").unwrap_or_else(|| username.clone()),
            username,
            password,
        })
    }
}

/// `Nifty 100 Weekly 52-Week Highs Report - {date}`.
#[must_use]
pub fn subject(date: NaiveDate) -> String {
    format!("Nifty 100 Weekly 52-Week Highs Report - {}", date.format("%Y-%m-%d"))
}

/// Plain-text body for a scan of `window`.
#[must_use]
pub fn body(window: &WeekWindow, table: &ReportTable, generated_at: NaiveDateTime) -> String {
    let mut out = String::from("Weekly 52-Week High Report\n==========================\n\n");
    out.push_str(&format!("Week: {window}\n\n"));
    if table.is_empty() {
        out.push_str("No stocks hit 52-week highs during the scanned period.\n\n");
    } else {
        out.push_str(&format!(
            "Found {} stocks that hit 52-week highs this week:\n\n{table}\n",
            table.len()
        ));
    }
    out.push_str(&format!("Generated on: {}\n", generated_at.format("%Y-%m-%d %H:%M:%S")));
    out
}

fn mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|e| ReportError::Email(format!("invalid address {address}: {e}")))
}

/// Builds the message without sending it.
pub fn build_message(config: &EmailConfig, to: &str, subject: &str, body: String) -> Result<Message> {
    Message::builder()
        .from(mailbox(&config.from)?)
        .to(mailbox(to)?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|e| ReportError::Email(e.to_string()))
}

/// Sends a plain-text report through an authenticated STARTTLS relay.
pub async fn send(config: &EmailConfig, to: &str, subject: &str, body: String) -> Result<()> {
    let message = build_message(config, to, subject, body)?;

    let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
        .map_err(|e| ReportError::Email(e.to_string()))?
        .port(config.smtp_port)
        .credentials(Credentials::new(config.username.clone(), config.password.clone()))
        .build();

    transport
        .send(message)
        .await
        .map_err(|e| ReportError::Email(e.to_string()))?;

    info!(to = to, "Email sent to {}", to);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_events;
    use std::collections::HashMap;

    fn window() -> WeekWindow {
        WeekWindow {
            start: NaiveDate::from_ymd_opt(2025, 9, 22).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 9, 26).unwrap(),
        }
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 27).unwrap().and_hms_opt(18, 30, 5).unwrap()
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_subject() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 27).unwrap();
        assert_eq!(subject(date), "Nifty 100 Weekly 52-Week Highs Report - 2025-09-27");
    }

    #[test]
    fn test_body_with_results() {
        let table = ReportTable::highs(&sample_events());
        let text = body(&window(), &table, generated_at());
        assert!(text.starts_with("Weekly 52-Week High Report\n"));
        assert!(text.contains("Week: 2025-09-22 to 2025-09-26"));
        assert!(text.contains("Found 2 stocks that hit 52-week highs this week:"));
        assert!(text.contains("New_High"));
        assert!(text.ends_with("Generated on: 2025-09-27 18:30:05\n"));
    }

    #[test]
    fn test_body_without_results() {
        let text = body(&window(), &ReportTable::highs(&[]), generated_at());
        assert!(text.contains("No stocks hit 52-week highs during the scanned period."));
        assert!(!text.contains("Found"));
    }

    #[test]
    fn test_config_defaults() {
        let config = EmailConfig::from_lookup(lookup(&[
            ("SMTP_USERNAME", "scanner@example.com"),
            ("SMTP_PASSWORD", "app-password"),
        ]))
        .unwrap();
        assert_eq!(config.smtp_server, DEFAULT_SMTP_SERVER);
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.from, "scanner@example.com");
        assert!(!format!("{config:?}").contains("app-password"));
    }

    #[test]
    fn test_config_errors() {
        let err = EmailConfig::from_lookup(lookup(&[("SMTP_USERNAME", "a@example.com")])).unwrap_err();
        assert!(matches!(err, ReportError::EmailConfig(_)));

        let err = EmailConfig::from_lookup(lookup(&[
            ("SMTP_USERNAME", "a@example.com"),
            ("SMTP_PASSWORD", "x"),
            ("SMTP_PORT", "smtp"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ReportError::EmailConfig(_)));
    }

    #[test]
    fn test_build_message() {
        let config = EmailConfig::from_lookup(lookup(&[
            ("SMTP_USERNAME", "scanner@example.com"),
            ("SMTP_PASSWORD", "x"),
        ]))
        .unwrap();
        assert!(build_message(&config, "desk@example.com", "s", "b".to_string()).is_ok());

        let err = build_message(&config, "not an address", "s", "b".to_string()).unwrap_err();
        assert!(matches!(err, ReportError::Email(_)));
    }
}
