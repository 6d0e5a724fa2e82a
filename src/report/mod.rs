//! Aggregations over the stored sessions and transactions used by the dashboard and report
//! commands.

pub mod summary;

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};

use crate::{
    earnings::{calculate_session_earnings, session_hours},
    state::entities::{AppState, WorkType},
};

/// How many populated days the trend keeps.
pub const TREND_DAYS: usize = 14;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub hours: f64,
    pub earnings: f64,
}

impl DailyBucket {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            hours: 0.,
            earnings: 0.,
        }
    }
}

/// Groups closed sessions by the calendar day they started on in `tz`. Only the last
/// [TREND_DAYS] days that have any activity are returned, oldest first.
pub fn daily_buckets<Tz: TimeZone>(state: &AppState, tz: &Tz) -> Vec<DailyBucket> {
    let mut map = BTreeMap::<NaiveDate, DailyBucket>::new();

    for session in state.sessions.iter().filter(|s| !s.is_open()) {
        let date = session.start_time.with_timezone(tz).date_naive();
        let bucket = map.entry(date).or_insert_with(|| DailyBucket::new(date));
        bucket.hours += session_hours(session);
        bucket.earnings += calculate_session_earnings(session, &state.settings);
    }

    let skip = map.len().saturating_sub(TREND_DAYS);
    map.into_values().skip(skip).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkTypeUsage {
    pub work_type: WorkType,
    pub hours: f64,
    pub earnings: f64,
}

/// Returns time and money per work type for closed sessions. Types that were never used are
/// left out.
pub fn work_type_distribution(state: &AppState) -> Vec<WorkTypeUsage> {
    let mut map = BTreeMap::<WorkType, WorkTypeUsage>::new();

    for session in state.sessions.iter().filter(|s| !s.is_open()) {
        let usage = map
            .entry(session.work_type)
            .or_insert_with(|| WorkTypeUsage {
                work_type: session.work_type,
                hours: 0.,
                earnings: 0.,
            });
        usage.hours += session_hours(session);
        usage.earnings += calculate_session_earnings(session, &state.settings);
    }

    map.into_values().collect()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

    use crate::state::entities::{AppState, WorkSession, WorkType};

    use super::{daily_buckets, work_type_distribution, TREND_DAYS};

    fn closed(start: DateTime<Utc>, hours: i64, rate: f64, work_type: WorkType) -> WorkSession {
        WorkSession {
            id: format!("{start}"),
            start_time: start,
            end_time: Some(start + Duration::hours(hours)),
            break_duration_minutes: 0,
            work_type,
            hourly_rate_snapshot: Some(rate),
            description: "work".into(),
        }
    }

    #[test]
    fn test_same_day_sessions_share_a_bucket() {
        let morning = Utc.with_ymd_and_hms(2024, 4, 10, 8, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 4, 10, 18, 0, 0).unwrap();
        let state = AppState {
            sessions: vec![
                closed(evening, 1, 30., WorkType::Normal),
                closed(morning, 1, 50., WorkType::Normal),
            ],
            ..Default::default()
        };

        let buckets = daily_buckets(&state, &Utc);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].date, morning.date_naive());
        assert_eq!(buckets[0].earnings, 80.);
        assert_eq!(buckets[0].hours, 2.);
    }

    #[test]
    fn test_buckets_follow_the_viewers_calendar() {
        // 23:30 UTC is already the next day three hours east.
        let late = Utc.with_ymd_and_hms(2024, 4, 10, 23, 30, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 4, 10, 1, 0, 0).unwrap();
        let state = AppState {
            sessions: vec![
                closed(late, 1, 10., WorkType::Normal),
                closed(early, 1, 10., WorkType::Normal),
            ],
            ..Default::default()
        };

        assert_eq!(daily_buckets(&state, &Utc).len(), 1);
        let east = FixedOffset::east_opt(3 * 3600).unwrap();
        assert_eq!(daily_buckets(&state, &east).len(), 2);
    }

    #[test]
    fn test_only_last_days_are_kept_oldest_first() {
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let mut sessions = (0..20)
            .map(|day| closed(first + Duration::days(day * 2), 1, 10., WorkType::Normal))
            .collect::<Vec<_>>();
        sessions.reverse();
        let mut open = closed(first + Duration::days(60), 1, 10., WorkType::Normal);
        open.end_time = None;
        sessions.insert(0, open);
        let state = AppState {
            sessions,
            ..Default::default()
        };

        let buckets = daily_buckets(&state, &Utc);
        assert_eq!(buckets.len(), TREND_DAYS);
        assert_eq!(buckets[0].date, (first + Duration::days(12)).date_naive());
        assert_eq!(
            buckets.last().unwrap().date,
            (first + Duration::days(38)).date_naive()
        );
        assert!(buckets.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_work_type_distribution() {
        let start = Utc.with_ymd_and_hms(2024, 4, 10, 8, 0, 0).unwrap();
        let mut running = closed(start, 3, 10., WorkType::Holiday);
        running.end_time = None;
        let state = AppState {
            sessions: vec![
                closed(start, 2, 10., WorkType::Extra),
                closed(start + Duration::days(1), 1, 10., WorkType::Normal),
                closed(start + Duration::days(2), 3, 10., WorkType::Extra),
                running,
            ],
            ..Default::default()
        };

        let usage = work_type_distribution(&state);
        assert_eq!(usage.len(), 2);
        assert_eq!(usage[0].work_type, WorkType::Normal);
        assert_eq!(usage[0].hours, 1.);
        assert_eq!(usage[1].work_type, WorkType::Extra);
        assert_eq!(usage[1].hours, 5.);
        assert_eq!(usage[1].earnings, 75.);
    }
}
