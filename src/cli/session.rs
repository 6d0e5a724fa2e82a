use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use crate::{
    earnings::calculate_session_earnings,
    state::{
        entities::WorkType,
        persistence::StateStorage,
        store::{ManualSession, Store},
    },
    utils::{format::format_currency, time::at_clock_time},
};

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct ManualSessionCommand {
    description: String,
    #[arg(
        long,
        default_value = "today",
        help = "Day of the session. Examples are \"yesterday\", \"15/03/2025\", \"last friday\""
    )]
    date: String,
    #[arg(long, help = "Start time as HH:MM")]
    start: String,
    #[arg(long, help = "End time as HH:MM")]
    end: String,
    #[arg(long = "break", default_value_t = 0, help = "Break in minutes")]
    break_minutes: u32,
    #[arg(short = 't', long = "type", value_enum, default_value_t = WorkType::Normal)]
    work_type: WorkType,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

pub async fn process_manual_session<S: StateStorage>(
    store: &mut Store<S>,
    command: ManualSessionCommand,
) -> Result<()> {
    let now = store.now().with_timezone(&Local);
    let date = parse_day(&command.date, now, command.date_style)?;
    let start = at_clock_time(&Local, date, &command.start)?;
    let end = at_clock_time(&Local, date, &command.end)?;

    let id = store
        .add_manual_session(ManualSession {
            start_time: start.with_timezone(&Utc),
            end_time: end.with_timezone(&Utc),
            break_duration_minutes: command.break_minutes,
            work_type: command.work_type,
            description: command.description,
        })
        .await?;
    println!("Added session {id}");
    Ok(())
}

/// Accepts anything chrono-english understands and keeps only the calendar day.
pub(crate) fn parse_day(input: &str, now: DateTime<Local>, style: DateStyle) -> Result<NaiveDate> {
    match parse_date_string(input, now, style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {input:?}: {e}"),
            )
            .into()),
    }
}

pub fn process_session_list<S: StateStorage>(store: &Store<S>, limit: Option<usize>) {
    let state = store.state();
    let limit = limit.unwrap_or(usize::MAX);

    for session in state.sessions.iter().take(limit) {
        let start = session.start_time.with_timezone(&Local);
        let end = session
            .end_time
            .map(|v| v.with_timezone(&Local).format("%H:%M").to_string())
            .unwrap_or_else(|| "running".into());
        let earnings = calculate_session_earnings(session, &state.settings);
        println!(
            "{}\t{}\t{}-{}\t{}\t{}\t{}",
            session.id,
            start.format("%x"),
            start.format("%H:%M"),
            end,
            session.work_type,
            format_currency(earnings, &state.settings.currency),
            session.description
        );
    }
}
