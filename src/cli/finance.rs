use anyhow::Result;
use chrono::{Local, NaiveTime, TimeZone, Utc};
use clap::Subcommand;

use crate::{
    state::{
        entities::{TransactionType, DEFAULT_CATEGORY},
        persistence::StateStorage,
        store::{NewTransaction, Store},
    },
    utils::format::format_currency,
};

use super::{
    paint_amount,
    session::{parse_day, DateStyle},
};

#[derive(Debug, Subcommand)]
pub enum TransactionCommand {
    #[command(about = "Record income or an expense")]
    Add {
        #[arg(value_enum)]
        kind: TransactionType,
        amount: f64,
        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(long, default_value = "today")]
        date: String,
        #[arg(long, default_value_t = DateStyle::Uk)]
        date_style: DateStyle,
    },
    #[command(about = "Delete a transaction")]
    Delete { id: String },
    #[command(about = "List transactions, newest first")]
    List {},
}

pub async fn process_transaction_command<S: StateStorage>(
    store: &mut Store<S>,
    command: TransactionCommand,
) -> Result<()> {
    match command {
        TransactionCommand::Add {
            kind,
            amount,
            category,
            description,
            date,
            date_style,
        } => {
            let day = parse_day(&date, store.now().with_timezone(&Local), date_style)?;
            let date = Local
                .from_local_datetime(&day.and_time(NaiveTime::MIN))
                .earliest()
                .map(|v| v.with_timezone(&Utc))
                .unwrap_or_else(|| store.now());
            let id = store
                .add_transaction(NewTransaction {
                    kind,
                    amount,
                    category,
                    date,
                    description,
                })
                .await?;
            println!("Added transaction {id}");
        }
        TransactionCommand::Delete { id } => {
            if store.delete_transaction(&id).await? {
                println!("Deleted transaction {id}");
            } else {
                println!("No transaction with id {id}");
            }
        }
        TransactionCommand::List {} => {
            let state = store.state();
            for transaction in &state.transactions {
                let amount = format_currency(transaction.amount, &state.settings.currency);
                let amount = paint_amount(
                    &amount,
                    transaction.kind == TransactionType::Income,
                    state.settings.dark_mode,
                );
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    transaction.id,
                    transaction.date.with_timezone(&Local).format("%x"),
                    transaction.kind,
                    amount,
                    transaction.category,
                    transaction.description
                );
            }
        }
    }
    Ok(())
}
