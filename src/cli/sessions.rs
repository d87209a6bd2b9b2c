use std::fmt::Display;

use anyhow::Result;
use chrono::Local;
use clap::{Subcommand, ValueEnum};

use crate::data::{entities::SessionKind, records::Workspace};

use super::output::format_minutes;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SessionKindArg {
    Focus,
    Break,
}

impl From<SessionKindArg> for SessionKind {
    fn from(value: SessionKindArg) -> Self {
        match value {
            SessionKindArg::Focus => SessionKind::Focus,
            SessionKindArg::Break => SessionKind::Break,
        }
    }
}

impl Display for SessionKindArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionKindArg::Focus => write!(f, "focus"),
            SessionKindArg::Break => write!(f, "break"),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    #[command(about = "Record a finished session")]
    Log {
        minutes: u32,
        #[arg(long, default_value_t = SessionKindArg::Focus)]
        kind: SessionKindArg,
    },
    #[command(about = "List recorded sessions, newest first")]
    List {
        #[arg(long, default_value_t = 10, help = "How many sessions to show")]
        limit: usize,
    },
}

pub async fn process_session_command(
    workspace: &mut Workspace,
    command: SessionCommand,
) -> Result<()> {
    match command {
        SessionCommand::Log { minutes, kind } => {
            if workspace.log_session(minutes, kind.into()).await? {
                println!("Recorded a {} {kind} session", format_minutes(minutes));
            } else {
                println!("Sessions shorter than one minute are not recorded");
            }
            Ok(())
        }
        SessionCommand::List { limit } => {
            if workspace.sessions().is_empty() {
                println!("No sessions recorded yet");
                return Ok(());
            }
            for session in workspace.sessions().iter().take(limit) {
                let kind = match session.kind {
                    SessionKind::Focus => "focus",
                    SessionKind::Break => "break",
                };
                println!(
                    "{}\t{}\t{}",
                    session.created_at.with_timezone(&Local).format("%x %H:%M"),
                    kind,
                    format_minutes(session.minutes)
                );
            }
            Ok(())
        }
    }
}
