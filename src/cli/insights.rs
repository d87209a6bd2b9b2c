use std::fmt::Display;

use ansi_term::Style;
use anyhow::Result;
use chrono::{DateTime, Local};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};
use now::DateTimeNow;

use crate::{data::records::Workspace, utils::time::{next_day_start, week_start}};

use super::{
    output::{
        analysis::{focus_minutes_between, task_stats, today_stats, weekly_stats},
        format_minutes, progress_bar,
    },
    Args,
};

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct InsightsCommand {
    #[arg(
        long = "start",
        short,
        help = "Start of an extra range summary. Examples are \"yesterday\", \"1 week ago\", \"15/03/2025\""
    )]
    start_date: Option<String>,
    #[arg(
        long = "end",
        short,
        help = "End of the extra range summary. Defaults to today"
    )]
    end_date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Prints today's progress, the weekly breakdown and task counts. With
/// `--start`/`--end` an extra focus total over that range is appended, the
/// range is always widened to whole days.
pub fn process_insights_command(workspace: &Workspace, command: InsightsCommand) -> Result<()> {
    let now = Local::now();
    let settings = workspace.settings();

    let today = today_stats(workspace.sessions(), settings, now);
    println!("{}", Style::new().bold().paint("Today"));
    println!(
        "  Focus {} of {} ({:.0}%)",
        format_minutes(today.total_minutes),
        format_minutes(settings.daily_goal_minutes),
        today.progress_percent
    );
    println!("  Sessions completed: {}", today.session_count);
    println!();

    let weekly = weekly_stats(workspace.sessions(), now);
    println!("{}", Style::new().bold().paint("This week"));
    for (index, label) in WEEKDAY_LABELS.iter().enumerate() {
        let minutes = weekly.per_day[index];
        let percent = if settings.daily_goal_minutes == 0 {
            100.
        } else {
            (minutes as f64 / settings.daily_goal_minutes as f64 * 100.).min(100.)
        };
        println!(
            "  {label} {} {}",
            progress_bar(percent, 20),
            format_minutes(minutes)
        );
    }
    println!("  Total {}", format_minutes(weekly.total_minutes));
    println!();

    let tasks = task_stats(workspace.tasks());
    println!("{}", Style::new().bold().paint("Tasks"));
    println!(
        "  Completed {} | Pending {}",
        tasks.completed, tasks.pending
    );

    if command.start_date.is_some() || command.end_date.is_some() {
        let (start_day, end_day) = parse_range(&command, now)?;
        let minutes =
            focus_minutes_between(workspace.sessions(), &start_day, &next_day_start(end_day));
        println!();
        println!(
            "Focus from {} to {}: {}",
            start_day.format("%x"),
            end_day.format("%x"),
            format_minutes(minutes)
        );
    }

    Ok(())
}

/// Also provides sensible defaults: the range starts at the current week and
/// ends today.
fn parse_range(
    command: &InsightsCommand,
    now: DateTime<Local>,
) -> Result<(DateTime<Local>, DateTime<Local>)> {
    let dialect: chrono_english::Dialect = command.date_style.into();

    let start = match command
        .start_date
        .as_deref()
        .map(|s| parse_date_string(s, now, dialect))
    {
        Some(Ok(v)) => v.with_timezone(&Local),
        Some(Err(e)) => {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate start date {e}"),
                )
                .into());
        }
        None => week_start(now),
    };
    let end = match command
        .end_date
        .as_deref()
        .map(|s| parse_date_string(s, now, dialect))
    {
        Some(Ok(v)) => v.with_timezone(&Local),
        Some(Err(e)) => {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate end date {e}"),
                )
                .into());
        }
        None => now,
    };

    Ok((start.beginning_of_day(), end.beginning_of_day()))
}
