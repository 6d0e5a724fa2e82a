use chrono::{DateTime, TimeZone, Utc};
use now::DateTimeNow;

use crate::{
    earnings::{calculate_session_earnings, session_hours},
    state::entities::{AppState, TransactionType, WorkSession},
};

/// Figures shown on the dashboard for a single calendar month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySummary {
    pub earnings: f64,
    pub hours: f64,
    pub income: f64,
    pub expense: f64,
}

impl MonthlySummary {
    /// Estimated balance: tracked earnings plus other income, minus expenses.
    pub fn balance(&self) -> f64 {
        self.earnings + self.income - self.expense
    }
}

/// Summarizes the month `now` falls in, using `now`'s timezone for month boundaries.
pub fn monthly_summary<Tz: TimeZone>(state: &AppState, now: &DateTime<Tz>) -> MonthlySummary {
    let start = now.beginning_of_month().with_timezone(&Utc);
    let end = now.end_of_month().with_timezone(&Utc);
    let in_month = |moment: &DateTime<Utc>| *moment >= start && *moment <= end;

    let mut summary = MonthlySummary::default();

    for session in state
        .sessions
        .iter()
        .filter(|s| !s.is_open() && in_month(&s.start_time))
    {
        summary.earnings += calculate_session_earnings(session, &state.settings);
        summary.hours += session_hours(session);
    }

    for transaction in state.transactions.iter().filter(|t| in_month(&t.date)) {
        match transaction.kind {
            TransactionType::Income => summary.income += transaction.amount,
            TransactionType::Expense => summary.expense += transaction.amount,
        }
    }

    summary
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Expense totals per category, in the order the categories first appear.
pub fn expenses_by_category(state: &AppState) -> Vec<CategoryTotal> {
    let mut totals = Vec::<CategoryTotal>::new();
    for transaction in state
        .transactions
        .iter()
        .filter(|t| t.kind == TransactionType::Expense)
    {
        match totals.iter_mut().find(|c| c.category == transaction.category) {
            Some(total) => total.amount += transaction.amount,
            None => totals.push(CategoryTotal {
                category: transaction.category.clone(),
                amount: transaction.amount,
            }),
        }
    }
    totals
}

/// Newest sessions first, at most `count` of them.
pub fn recent_sessions(state: &AppState, count: usize) -> impl Iterator<Item = &WorkSession> {
    state.sessions.iter().take(count)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::state::entities::{AppState, Transaction, TransactionType, WorkSession, WorkType};

    use super::{expenses_by_category, monthly_summary, recent_sessions};

    fn transaction(kind: TransactionType, amount: f64, category: &str, date: DateTime<Utc>) -> Transaction {
        Transaction {
            id: format!("{category}{amount}"),
            kind,
            amount,
            category: category.into(),
            date,
            description: String::new(),
        }
    }

    fn session(start: DateTime<Utc>, hours: i64) -> WorkSession {
        WorkSession {
            id: format!("{start}"),
            start_time: start,
            end_time: Some(start + Duration::hours(hours)),
            break_duration_minutes: 0,
            work_type: WorkType::Normal,
            hourly_rate_snapshot: Some(10.),
            description: "work".into(),
        }
    }

    #[test]
    fn test_monthly_summary_only_counts_current_month() {
        let now = Utc.with_ymd_and_hms(2024, 7, 20, 12, 0, 0).unwrap();
        let july = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap();
        let june = Utc.with_ymd_and_hms(2024, 6, 30, 9, 0, 0).unwrap();
        let mut running = session(july, 1);
        running.end_time = None;

        let state = AppState {
            sessions: vec![running, session(july, 3), session(june, 5)],
            transactions: vec![
                transaction(TransactionType::Income, 100., "Gift", july),
                transaction(TransactionType::Expense, 40., "Food", july),
                transaction(TransactionType::Expense, 999., "Rent", june),
            ],
            ..Default::default()
        };

        let summary = monthly_summary(&state, &now);
        assert_eq!(summary.hours, 3.);
        assert_eq!(summary.earnings, 30.);
        assert_eq!(summary.income, 100.);
        assert_eq!(summary.expense, 40.);
        assert_eq!(summary.balance(), 90.);
    }

    #[test]
    fn test_expenses_grouped_by_category_in_first_seen_order() {
        let date = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap();
        let state = AppState {
            transactions: vec![
                transaction(TransactionType::Expense, 10., "Food", date),
                transaction(TransactionType::Expense, 50., "Rent", date),
                transaction(TransactionType::Income, 70., "Food", date),
                transaction(TransactionType::Expense, 5., "Food", date),
            ],
            ..Default::default()
        };

        let totals = expenses_by_category(&state);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, "Food");
        assert_eq!(totals[0].amount, 15.);
        assert_eq!(totals[1].category, "Rent");
    }

    #[test]
    fn test_recent_sessions_are_newest_first() {
        let start = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap();
        let state = AppState {
            sessions: (0..5).rev().map(|d| session(start + Duration::days(d), 1)).collect(),
            ..Default::default()
        };

        let recent = recent_sessions(&state, 3).collect::<Vec<_>>();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].start_time, start + Duration::days(4));
    }
}
