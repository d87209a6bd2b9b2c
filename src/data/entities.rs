use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Done,
}

/// A single actionable item. Urgency and priority are independent axes, the
/// pair places a task on the Eisenhower matrix.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
pub struct TaskEntity {
    pub id: u64,
    pub title: Arc<str>,
    #[serde(default)]
    pub description: Arc<str>,
    pub priority: Priority,
    #[serde(default)]
    pub urgent: bool,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskEntity {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    pub fn quadrant(&self) -> Quadrant {
        Quadrant::classify(self.urgent, self.priority == Priority::High)
    }
}

/// The four Eisenhower buckets.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Quadrant {
    DoFirst,
    Schedule,
    Delegate,
    Eliminate,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::DoFirst,
        Quadrant::Schedule,
        Quadrant::Delegate,
        Quadrant::Eliminate,
    ];

    pub fn classify(urgent: bool, important: bool) -> Self {
        match (urgent, important) {
            (true, true) => Quadrant::DoFirst,
            (false, true) => Quadrant::Schedule,
            (true, false) => Quadrant::Delegate,
            (false, false) => Quadrant::Eliminate,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::DoFirst => "Urgent + Important",
            Quadrant::Schedule => "Important + Not Urgent",
            Quadrant::Delegate => "Urgent + Not Important",
            Quadrant::Eliminate => "Not Urgent + Not Important",
        }
    }
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Focus,
    Break,
}

/// A finished timer session. Only whole minutes are recorded.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
pub struct SessionEntity {
    pub minutes: u32,
    pub kind: SessionKind,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum GoalCadence {
    Daily,
    Weekly,
}

#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
pub struct GoalEntity {
    pub title: Arc<str>,
    #[serde(default)]
    pub description: Arc<str>,
    pub cadence: GoalCadence,
    pub target_minutes: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// User-tunable knobs. The serialized field names keep the layout of
/// existing timeflow-data.json files, so old data keeps loading.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    #[serde(rename = "tempo_foco_padrao", default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(rename = "tempo_pausa_padrao", default = "default_break_minutes")]
    pub break_minutes: u32,
    #[serde(rename = "meta_diaria_minutos", default = "default_daily_goal_minutes")]
    pub daily_goal_minutes: u32,
}

fn default_focus_minutes() -> u32 {
    25
}

fn default_break_minutes() -> u32 {
    5
}

fn default_daily_goal_minutes() -> u32 {
    240
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
            daily_goal_minutes: default_daily_goal_minutes(),
        }
    }
}
