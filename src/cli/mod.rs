pub mod goals;
pub mod insights;
pub mod output;
pub mod sessions;
pub mod settings;
pub mod tasks;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    data::records::Workspace,
    store::{
        bridge::FileBridge,
        memory::MemoryStore,
        service::{StateStore, StoreService},
    },
    utils::{
        clock::DefaultClock,
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "TimeFlow", version, long_about = None)]
#[command(about = "Local-first productivity tracker", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        help = "Data directory. By default saves into the OS data directory, e.g. $XDG_DATA_HOME or $HOME/.local/share"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Manage tasks")]
    Task {
        #[command(subcommand)]
        command: tasks::TaskCommand,
    },
    #[command(about = "Record and list timer sessions")]
    Session {
        #[command(subcommand)]
        command: sessions::SessionCommand,
    },
    #[command(about = "Manage goals")]
    Goal {
        #[command(subcommand)]
        command: goals::GoalCommand,
    },
    #[command(about = "Show productivity insights")]
    Insights {
        #[command(flatten)]
        command: insights::InsightsCommand,
    },
    #[command(about = "Show or change settings")]
    Settings {
        #[command(subcommand)]
        command: settings::SettingsCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let Args { commands, log, dir } = Args::parse();

    let logging_level = if log { Some(LevelFilter::TRACE) } else { None };

    let data_dir = match dir.map(ensure_dir).unwrap_or_else(create_application_default_path) {
        Ok(dir) => Some(dir),
        Err(e) => {
            eprintln!("No usable data directory ({e:#}), changes will not be saved");
            None
        }
    };

    if let Some(dir) = &data_dir {
        enable_logging(CLI_PREFIX, dir, logging_level, log)?;
    }

    // Without a data directory the commands still run, they just operate on
    // the key-scoped in-memory fallback.
    let store: Arc<dyn StateStore> = match &data_dir {
        Some(dir) => Arc::new(StoreService::new(FileBridge::new(dir))),
        None => Arc::new(MemoryStore::new()),
    };

    let mut workspace = Workspace::open(store, Box::new(DefaultClock)).await?;

    match commands {
        Commands::Task { command } => tasks::process_task_command(&mut workspace, command).await,
        Commands::Session { command } => {
            sessions::process_session_command(&mut workspace, command).await
        }
        Commands::Goal { command } => goals::process_goal_command(&mut workspace, command).await,
        Commands::Insights { command } => insights::process_insights_command(&workspace, command),
        Commands::Settings { command } => {
            settings::process_settings_command(&mut workspace, command).await
        }
    }
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf> {
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
