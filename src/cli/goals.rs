use std::fmt::Display;

use ansi_term::Style;
use anyhow::Result;
use chrono::Local;
use clap::{Subcommand, ValueEnum};
use now::DateTimeNow;

use crate::{
    data::{
        entities::{GoalCadence, GoalEntity},
        records::Workspace,
    },
    utils::time::{next_day_start, week_start},
};

use super::output::{analysis::focus_minutes_between, format_minutes, progress_bar};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CadenceArg {
    Daily,
    Weekly,
}

impl From<CadenceArg> for GoalCadence {
    fn from(value: CadenceArg) -> Self {
        match value {
            CadenceArg::Daily => GoalCadence::Daily,
            CadenceArg::Weekly => GoalCadence::Weekly,
        }
    }
}

impl Display for CadenceArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CadenceArg::Daily => write!(f, "daily"),
            CadenceArg::Weekly => write!(f, "weekly"),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum GoalCommand {
    #[command(about = "Add a new goal")]
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = CadenceArg::Weekly)]
        cadence: CadenceArg,
        #[arg(long, default_value_t = 240)]
        target_minutes: u32,
    },
    #[command(about = "List goals with their current progress")]
    List,
}

pub async fn process_goal_command(workspace: &mut Workspace, command: GoalCommand) -> Result<()> {
    match command {
        GoalCommand::Add {
            title,
            description,
            cadence,
            target_minutes,
        } => {
            workspace
                .add_goal(title.into(), description.into(), cadence.into(), target_minutes)
                .await?;
            println!("Added goal");
            Ok(())
        }
        GoalCommand::List => {
            let active = workspace.goals().iter().filter(|g| g.active);
            let mut any = false;
            for goal in active {
                any = true;
                print_goal(workspace, goal);
            }
            if !any {
                println!("No goals defined yet");
            }
            Ok(())
        }
    }
}

fn print_goal(workspace: &Workspace, goal: &GoalEntity) {
    let now = Local::now();
    let start = match goal.cadence {
        GoalCadence::Daily => now.beginning_of_day(),
        GoalCadence::Weekly => week_start(now),
    };
    let end = next_day_start(now);

    let reached = focus_minutes_between(workspace.sessions(), &start, &end);
    let percent = if goal.target_minutes == 0 {
        100.
    } else {
        (reached as f64 / goal.target_minutes as f64 * 100.).min(100.)
    };

    println!(
        "{} ({})",
        Style::new().bold().paint(&*goal.title),
        cadence_label(goal.cadence)
    );
    if !goal.description.is_empty() {
        println!("  {}", &*goal.description);
    }
    println!(
        "  {} {} of {}",
        progress_bar(percent, 20),
        format_minutes(reached),
        format_minutes(goal.target_minutes)
    );
}

fn cadence_label(cadence: GoalCadence) -> &'static str {
    match cadence {
        GoalCadence::Daily => "daily",
        GoalCadence::Weekly => "weekly",
    }
}
