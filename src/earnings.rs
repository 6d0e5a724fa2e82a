//! Money derived from tracked time.

use chrono::Duration;

use crate::state::entities::{AppSettings, WorkSession};

const SECONDS_IN_HOUR: f64 = 3600.;

/// Calculates how much a session earned. Running sessions earn nothing until they are stopped.
/// The value is not rounded, presentation is responsible for that.
pub fn calculate_session_earnings(session: &WorkSession, settings: &AppSettings) -> f64 {
    let Some(end) = session.end_time else {
        return 0.;
    };

    let net = (end - session.start_time)
        - Duration::minutes(session.break_duration_minutes as i64);
    let net_hours = f64::max(0., net.num_milliseconds() as f64 / 1000. / SECONDS_IN_HOUR);

    net_hours * effective_rate(session, settings) * effective_multiplier(session, settings)
}

/// Snapshot wins unless it's missing or zero, in which case the current rate is used.
pub fn effective_rate(session: &WorkSession, settings: &AppSettings) -> f64 {
    match session.hourly_rate_snapshot {
        Some(rate) if rate != 0. && rate.is_finite() => rate,
        _ => settings.hourly_rate,
    }
}

fn effective_multiplier(session: &WorkSession, settings: &AppSettings) -> f64 {
    let multiplier = settings.multipliers.get(session.work_type);
    if multiplier == 0. || !multiplier.is_finite() {
        1.
    } else {
        multiplier
    }
}

/// Gross length of a closed session in hours, break included. Zero for running sessions.
pub fn session_hours(session: &WorkSession) -> f64 {
    session
        .end_time
        .map(|end| (end - session.start_time).num_milliseconds() as f64 / 1000. / SECONDS_IN_HOUR)
        .unwrap_or(0.)
}
