pub mod finance;
pub mod report;
pub mod session;
pub mod settings;
pub mod watch;

use std::path::PathBuf;

use ansi_term::{Colour, Style};
use anyhow::Result;
use clap::{Parser, Subcommand};
use finance::{process_transaction_command, TransactionCommand};
use report::{print_dashboard, print_report, process_export_command, ExportCommand};
use session::{process_manual_session, process_session_list, ManualSessionCommand};
use settings::{process_settings_command, SettingsCommand};
use tracing::{info, level_filters::LevelFilter};

use crate::{
    state::{entities::WorkType, persistence::JsonFileStorage, store::Store},
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, create_dir},
        logging::enable_logging,
    },
};

#[derive(Parser, Debug)]
#[command(name = "freeflow", version, long_about = None)]
#[command(about = "Track work sessions, earnings and personal finances", long_about = None)]
pub(crate) struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging to the console")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Start tracking a work session")]
    Start {
        description: String,
        #[arg(short = 't', long = "type", value_enum, default_value_t = WorkType::Normal)]
        work_type: WorkType,
    },
    #[command(about = "Stop the running work session")]
    Stop {},
    #[command(about = "Add a finished work session by hand")]
    Add {
        #[command(flatten)]
        command: ManualSessionCommand,
    },
    #[command(about = "List tracked work sessions")]
    Sessions {
        #[arg(short = 'n', long, help = "Show only the newest n sessions")]
        limit: Option<usize>,
    },
    #[command(about = "Delete a work session")]
    DeleteSession { id: String },
    #[command(about = "Income and expense bookkeeping", subcommand)]
    Tx(TransactionCommand),
    #[command(about = "Show or change settings", subcommand)]
    Settings(SettingsCommand),
    #[command(about = "Overview of the current month")]
    Dashboard {},
    #[command(about = "Earnings trend and work type distribution")]
    Report {},
    #[command(about = "Export data as csv")]
    Export {
        #[command(flatten)]
        command: ExportCommand,
    },
    #[command(about = "Display the running session timer until interrupted")]
    Watch {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let dir = match args.dir {
        Some(dir) => create_dir(dir)?,
        None => create_application_default_path()?,
    };

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&dir, logging_level, args.log)?;

    let storage = JsonFileStorage::new(dir)?;
    info!("Using state file {:?}", storage.path());
    let mut store = Store::open(storage, Box::new(DefaultClock)).await;

    match args.commands {
        Commands::Start {
            description,
            work_type,
        } => {
            let id = store.start_session(&description, work_type).await?;
            println!("Started session {id} ({work_type})");
            Ok(())
        }
        Commands::Stop {} => {
            match store.stop_session().await? {
                Some(id) => println!("Stopped session {id}"),
                None => println!("No session is running"),
            }
            Ok(())
        }
        Commands::Add { command } => process_manual_session(&mut store, command).await,
        Commands::Sessions { limit } => {
            process_session_list(&store, limit);
            Ok(())
        }
        Commands::DeleteSession { id } => {
            if store.delete_session(&id).await? {
                println!("Deleted session {id}");
            } else {
                println!("No session with id {id}");
            }
            Ok(())
        }
        Commands::Tx(command) => process_transaction_command(&mut store, command).await,
        Commands::Settings(command) => process_settings_command(&mut store, command).await,
        Commands::Dashboard {} => {
            print_dashboard(store.state(), store.now());
            Ok(())
        }
        Commands::Report {} => {
            print_report(store.state());
            Ok(())
        }
        Commands::Export { command } => process_export_command(store.state(), command),
        Commands::Watch {} => watch::watch_active_session(store.state(), &DefaultClock).await,
    }
}

/// Colours money green or red. Dark mode swaps in the brighter variants.
pub(crate) fn paint_amount(text: &str, positive: bool, dark_mode: bool) -> String {
    let colour = match (positive, dark_mode) {
        (true, false) => Colour::Green,
        (false, false) => Colour::Red,
        (true, true) => Colour::Fixed(10),
        (false, true) => Colour::Fixed(9),
    };
    Style::new().fg(colour).paint(text).to_string()
}
