use std::fmt::Display;

use ansi_term::{Colour, Style};
use anyhow::Result;
use clap::{Subcommand, ValueEnum};

use crate::data::{
    entities::{Priority, Quadrant, TaskEntity, TaskStatus},
    records::Workspace,
};

use super::output::{analysis::quadrant_tasks, priority_badge};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

impl Display for PriorityArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityArg::Low => write!(f, "low"),
            PriorityArg::Medium => write!(f, "medium"),
            PriorityArg::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TaskFilter {
    All,
    Pending,
    Done,
}

impl Display for TaskFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskFilter::All => write!(f, "all"),
            TaskFilter::Pending => write!(f, "pending"),
            TaskFilter::Done => write!(f, "done"),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    #[command(about = "Add a new task")]
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,
        #[arg(long, help = "Mark the task as urgent")]
        urgent: bool,
    },
    #[command(about = "List tasks, flat or grouped into the Eisenhower matrix")]
    List {
        #[arg(long, default_value_t = TaskFilter::All)]
        filter: TaskFilter,
        #[arg(long, help = "Group tasks into the four Eisenhower quadrants")]
        matrix: bool,
    },
    #[command(about = "Toggle a task between pending and done")]
    Done { id: u64 },
    #[command(about = "Remove a task")]
    Rm { id: u64 },
}

pub async fn process_task_command(workspace: &mut Workspace, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::Add {
            title,
            description,
            priority,
            urgent,
        } => {
            let id = workspace
                .add_task(title.into(), description.into(), priority.into(), urgent)
                .await?;
            println!("Added task {id}");
            Ok(())
        }
        TaskCommand::List { filter, matrix } => {
            if matrix {
                print_matrix(workspace.tasks());
            } else {
                print_list(workspace.tasks(), filter);
            }
            Ok(())
        }
        TaskCommand::Done { id } => {
            match workspace.toggle_task(id).await? {
                TaskStatus::Done => println!("Task {id} completed"),
                TaskStatus::Pending => println!("Task {id} is pending again"),
            }
            Ok(())
        }
        TaskCommand::Rm { id } => {
            workspace.remove_task(id).await?;
            println!("Removed task {id}");
            Ok(())
        }
    }
}

fn print_list(tasks: &[TaskEntity], filter: TaskFilter) {
    let mut any = false;
    for task in tasks.iter().filter(|t| match filter {
        TaskFilter::All => true,
        TaskFilter::Pending => !t.is_done(),
        TaskFilter::Done => t.is_done(),
    }) {
        any = true;
        print_task(task);
    }
    if !any {
        println!("No tasks");
    }
}

fn print_task(task: &TaskEntity) {
    let checkbox = if task.is_done() { "[x]" } else { "[ ]" };
    let urgent = if task.urgent {
        format!(" {}", Colour::Red.paint("urgent"))
    } else {
        String::new()
    };
    println!(
        "{} {}\t{}\t{}{}",
        checkbox,
        task.id,
        priority_badge(task.priority),
        task.title,
        urgent
    );
    if !task.description.is_empty() {
        println!("      {}", Colour::Fixed(245).paint(&*task.description));
    }
}

fn print_matrix(tasks: &[TaskEntity]) {
    for quadrant in Quadrant::ALL {
        println!("{}", Style::new().bold().paint(quadrant.label()));
        let bucket = quadrant_tasks(tasks, quadrant);
        if bucket.is_empty() {
            println!("  -");
        } else {
            for task in bucket {
                print_task(task);
            }
        }
        println!();
    }
}
