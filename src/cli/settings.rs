use anyhow::Result;
use clap::{CommandFactory, Subcommand};

use crate::data::records::Workspace;

use super::{output::format_minutes, Args};

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    #[command(about = "Show current settings")]
    Show,
    #[command(about = "Change one or more settings")]
    Set {
        #[arg(long, help = "Default focus session length in minutes")]
        focus_minutes: Option<u32>,
        #[arg(long, help = "Default break length in minutes")]
        break_minutes: Option<u32>,
        #[arg(long, help = "Daily focus goal in minutes")]
        daily_goal_minutes: Option<u32>,
    },
}

pub async fn process_settings_command(
    workspace: &mut Workspace,
    command: SettingsCommand,
) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            print_settings(workspace);
            Ok(())
        }
        SettingsCommand::Set {
            focus_minutes,
            break_minutes,
            daily_goal_minutes,
        } => {
            if focus_minutes.is_none() && break_minutes.is_none() && daily_goal_minutes.is_none() {
                return Err(Args::command()
                    .error(
                        clap::error::ErrorKind::ValueValidation,
                        "Provide at least one of --focus-minutes, --break-minutes, --daily-goal-minutes",
                    )
                    .into());
            }

            workspace
                .update_settings(|settings| {
                    if let Some(v) = focus_minutes {
                        settings.focus_minutes = v;
                    }
                    if let Some(v) = break_minutes {
                        settings.break_minutes = v;
                    }
                    if let Some(v) = daily_goal_minutes {
                        settings.daily_goal_minutes = v;
                    }
                })
                .await?;
            print_settings(workspace);
            Ok(())
        }
    }
}

fn print_settings(workspace: &Workspace) {
    let settings = workspace.settings();
    println!("Focus session: {}", format_minutes(settings.focus_minutes));
    println!("Break: {}", format_minutes(settings.break_minutes));
    println!("Daily goal: {}", format_minutes(settings.daily_goal_minutes));
}
