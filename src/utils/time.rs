use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};

/// Elapsed time as `HH:MM:SS`. Hours are not wrapped at 24, negative durations show as zero.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}

/// Combines a calendar day with a wall clock time like `09:30` in the given timezone.
pub fn at_clock_time<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: &str) -> Result<DateTime<Tz>> {
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|e| anyhow!("Can't parse {time:?} as HH:MM: {e}"))?;
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| anyhow!("{date} {time} doesn't exist in the local timezone"))
}
