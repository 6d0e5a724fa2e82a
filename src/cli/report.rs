use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;

use crate::{
    earnings::calculate_session_earnings,
    export::{export_to_csv, session_rows, TransactionRow},
    report::{
        daily_buckets,
        summary::{expenses_by_category, monthly_summary, recent_sessions},
        work_type_distribution,
    },
    state::entities::AppState,
    utils::format::format_currency,
};

use super::paint_amount;

const RECENT_SESSIONS: usize = 3;

pub fn print_dashboard(state: &AppState, now: DateTime<Utc>) {
    let currency = &state.settings.currency;
    let dark_mode = state.settings.dark_mode;
    let summary = monthly_summary(state, &now.with_timezone(&Local));

    let balance = summary.balance();
    println!(
        "Estimated balance (month)\t{}",
        paint_amount(&format_currency(balance, currency), balance >= 0., dark_mode)
    );
    println!(
        "Work earnings\t{}",
        format_currency(summary.earnings, currency)
    );
    println!("Hours worked\t{:.1}h", summary.hours);
    println!(
        "Other income\t{}",
        paint_amount(&format_currency(summary.income, currency), true, dark_mode)
    );
    println!(
        "Expenses\t{}",
        paint_amount(&format_currency(summary.expense, currency), false, dark_mode)
    );

    if let Some(active) = state.active_session() {
        println!();
        println!(
            "Running since {}\t{}",
            active.start_time.with_timezone(&Local).format("%H:%M"),
            active.description
        );
    }

    println!();
    println!("Recent activity");
    for session in recent_sessions(state, RECENT_SESSIONS) {
        println!(
            "{}\t{}\t{}",
            session.start_time.with_timezone(&Local).format("%x"),
            format_currency(calculate_session_earnings(session, &state.settings), currency),
            session.description
        );
    }
}

pub fn print_report(state: &AppState) {
    let currency = &state.settings.currency;

    if state.sessions.is_empty() {
        println!("Not enough data yet. Track some work sessions first.");
        return;
    }

    println!("Earnings trend (last days with activity)");
    for bucket in daily_buckets(state, &Local) {
        println!(
            "{}\t{:.1}h\t{}",
            bucket.date.format("%x"),
            bucket.hours,
            format_currency(bucket.earnings, currency)
        );
    }

    println!();
    println!("Distribution by type");
    for usage in work_type_distribution(state) {
        println!(
            "{}\t{:.1}h\t{}",
            usage.work_type,
            usage.hours,
            format_currency(usage.earnings, currency)
        );
    }

    let expenses = expenses_by_category(state);
    if !expenses.is_empty() {
        println!();
        println!("Expenses by category");
        for total in expenses {
            println!(
                "{}\t{}",
                total.category,
                format_currency(total.amount, currency)
            );
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportTarget {
    Sessions,
    Transactions,
}

#[derive(Debug, clap::Args)]
pub struct ExportCommand {
    #[arg(value_enum, default_value_t = ExportTarget::Sessions)]
    target: ExportTarget,
    #[arg(short, long, help = "Output file. Defaults to relatorio_completo.csv or transactions.csv")]
    output: Option<PathBuf>,
}

pub fn process_export_command(state: &AppState, command: ExportCommand) -> Result<()> {
    let written = match command.target {
        ExportTarget::Sessions => {
            let path = command
                .output
                .unwrap_or_else(|| PathBuf::from("relatorio_completo.csv"));
            let rows = session_rows(&state.sessions, &state.settings);
            export_to_csv(&path, &rows)?.then_some(path)
        }
        ExportTarget::Transactions => {
            let path = command
                .output
                .unwrap_or_else(|| PathBuf::from("transactions.csv"));
            let rows = state
                .transactions
                .iter()
                .map(TransactionRow::from)
                .collect::<Vec<_>>();
            export_to_csv(&path, &rows)?.then_some(path)
        }
    };

    match written {
        Some(path) => println!("Exported into {}", path.display()),
        None => println!("Nothing to export"),
    }
    Ok(())
}
