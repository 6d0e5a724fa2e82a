//! CSV export of flat records.

use std::path::Path;

use anyhow::Result;
use chrono::{Local, TimeZone};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    earnings::calculate_session_earnings,
    state::entities::{AppSettings, Transaction, WorkSession},
};

/// Serializes `rows` as CSV with a header built from the field names. Fields containing a comma,
/// a quote, a newline or a carriage return are quoted with inner quotes doubled. Rows are joined
/// by `\n` without a trailing newline. Returns `None` when there is nothing to export.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<Option<String>> {
    if rows.is_empty() {
        return Ok(None);
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(vec![]);
    for row in rows {
        writer.serialize(row)?;
    }

    let buffer = writer.into_inner().map_err(|e| e.into_error())?;
    let mut content = String::from_utf8(buffer)?;
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(Some(content))
}

/// Writes `rows` as CSV into `path`. Nothing is written when `rows` is empty.
pub fn export_to_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<bool> {
    let Some(content) = to_csv(rows)? else {
        warn!("Nothing to export into {path:?}");
        return Ok(false);
    };
    std::fs::write(path, content)?;
    info!("Exported {} rows into {path:?}", rows.len());
    Ok(true)
}

#[derive(Debug, Serialize)]
pub struct SessionRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Start")]
    pub start: String,
    #[serde(rename = "End")]
    pub end: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Type")]
    pub work_type: String,
    #[serde(rename = "Earnings")]
    pub earnings: String,
}

impl SessionRow {
    pub fn new<Tz: TimeZone>(session: &WorkSession, settings: &AppSettings, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let start = session.start_time.with_timezone(tz);
        Self {
            date: start.format("%Y-%m-%d").to_string(),
            start: start.format("%H:%M:%S").to_string(),
            end: session
                .end_time
                .map(|end| end.with_timezone(tz).format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "N/A".into()),
            description: session.description.clone(),
            work_type: session.work_type.to_string(),
            earnings: format!("{:.2}", calculate_session_earnings(session, settings)),
        }
    }
}

/// Sessions in the viewer's local time.
pub fn session_rows(sessions: &[WorkSession], settings: &AppSettings) -> Vec<SessionRow> {
    sessions
        .iter()
        .map(|s| SessionRow::new(s, settings, &Local))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Amount")]
    pub amount: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(transaction: &Transaction) -> Self {
        Self {
            date: transaction
                .date
                .with_timezone(&Local)
                .format("%Y-%m-%d")
                .to_string(),
            kind: transaction.kind.to_string(),
            category: transaction.category.clone(),
            description: transaction.description.clone(),
            amount: format!("{:.2}", transaction.amount),
        }
    }
}
