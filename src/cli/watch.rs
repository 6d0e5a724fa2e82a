use std::{io::Write, time::Duration};

use anyhow::Result;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    earnings::calculate_session_earnings,
    state::entities::{AppState, WorkSession},
    utils::{clock::Clock, format::format_currency, time::format_duration},
};

const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Cancels `cancellation` on Ctrl-C.
pub async fn detect_shutdown(cancellation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancellation.cancel();
        },
        _ = cancellation.cancelled() => {}
    };
}

/// Shows elapsed time of the running session until Ctrl-C. Only reads the state.
pub async fn watch_active_session(state: &AppState, clock: &impl Clock) -> Result<()> {
    let Some(session) = state.active_session() else {
        println!("No session is running");
        return Ok(());
    };

    let token = CancellationToken::new();
    let (_, result) = tokio::join!(detect_shutdown(token.clone()), async {
        let result = run_timer(session, state, clock, &token, &mut std::io::stdout()).await;
        token.cancel();
        result
    });
    println!();
    result
}

/// Redraws the timer line every [REFRESH_INTERVAL] until `shutdown` is cancelled.
pub async fn run_timer(
    session: &WorkSession,
    state: &AppState,
    clock: &impl Clock,
    shutdown: &CancellationToken,
    out: &mut impl Write,
) -> Result<()> {
    info!("Watching session {}", session.id);
    let mut next_tick = clock.instant();
    loop {
        next_tick += REFRESH_INTERVAL;

        let now = clock.time();
        // Estimate as if the session was stopped right now.
        let mut snapshot = session.clone();
        snapshot.end_time = Some(now);
        let estimate = calculate_session_earnings(&snapshot, &state.settings);
        write!(
            out,
            "\r{}\t{}\t{}",
            format_duration(now - session.start_time),
            format_currency(estimate, &state.settings.currency),
            session.description
        )?;
        out.flush()?;

        select! {
            _ = shutdown.cancelled() => {
                debug!("Timer stopped");
                return Ok(())
            }
            _ = clock.sleep_until(next_tick) => ()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use tokio_util::sync::CancellationToken;

    use crate::{
        state::entities::{AppState, WorkSession, WorkType},
        utils::clock::DefaultClock,
    };

    use super::run_timer;

    #[tokio::test(start_paused = true)]
    async fn test_timer_redraws_until_cancelled() -> Result<()> {
        let session = WorkSession {
            id: "live".into(),
            start_time: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            end_time: None,
            break_duration_minutes: 0,
            work_type: WorkType::Normal,
            hourly_rate_snapshot: Some(10.),
            description: "live work".into(),
        };
        let state = AppState {
            sessions: vec![session.clone()],
            active_session_id: Some("live".into()),
            ..Default::default()
        };
        let token = CancellationToken::new();
        let mut out = Vec::<u8>::new();

        let (result, _) = tokio::join!(
            run_timer(&session, &state, &DefaultClock, &token, &mut out),
            async {
                tokio::time::sleep(Duration::from_millis(3500)).await;
                token.cancel();
            }
        );
        result?;

        let out = String::from_utf8(out)?;
        assert_eq!(out.matches('\r').count(), 4);
        assert!(out.contains("live work"));
        // The stored state is never touched by the timer.
        assert!(state.sessions[0].is_open());
        Ok(())
    }
}
