use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::info;

use crate::{
    store::{service::StateStore, state::KeyedState},
    utils::clock::Clock,
};

use super::entities::{
    GoalCadence, GoalEntity, Priority, SessionEntity, SessionKind, Settings, TaskEntity,
    TaskStatus,
};

pub const TASKS_KEY: &str = "tasks";
pub const SESSIONS_KEY: &str = "sessions";
pub const GOALS_KEY: &str = "goals";
pub const SETTINGS_KEY: &str = "settings";

/// All collections the commands operate on, each mirroring one key of the
/// store. Opening a workspace hydrates every container up front, so by the
/// time a command runs its mutations always persist.
pub struct Workspace {
    tasks: KeyedState<Vec<TaskEntity>>,
    sessions: KeyedState<Vec<SessionEntity>>,
    goals: KeyedState<Vec<GoalEntity>>,
    settings: KeyedState<Settings>,
    clock: Box<dyn Clock>,
}

impl Workspace {
    pub async fn open(store: Arc<dyn StateStore>, clock: Box<dyn Clock>) -> Result<Self> {
        let mut tasks = KeyedState::new(store.clone(), TASKS_KEY, Vec::new());
        tasks.hydrate().await?;
        let mut sessions = KeyedState::new(store.clone(), SESSIONS_KEY, Vec::new());
        sessions.hydrate().await?;
        let mut goals = KeyedState::new(store.clone(), GOALS_KEY, Vec::new());
        goals.hydrate().await?;
        let mut settings = KeyedState::new(store, SETTINGS_KEY, Settings::default());
        settings.hydrate().await?;

        Ok(Self {
            tasks,
            sessions,
            goals,
            settings,
            clock,
        })
    }

    pub fn tasks(&self) -> &[TaskEntity] {
        self.tasks.get()
    }

    pub fn sessions(&self) -> &[SessionEntity] {
        self.sessions.get()
    }

    pub fn goals(&self) -> &[GoalEntity] {
        self.goals.get()
    }

    pub fn settings(&self) -> &Settings {
        self.settings.get()
    }

    pub async fn add_task(
        &mut self,
        title: Arc<str>,
        description: Arc<str>,
        priority: Priority,
        urgent: bool,
    ) -> Result<u64> {
        let id = self
            .tasks
            .get()
            .iter()
            .map(|t| t.id)
            .max()
            .map_or(1, |v| v + 1);
        let task = TaskEntity {
            id,
            title,
            description,
            priority,
            urgent,
            status: TaskStatus::Pending,
            created_at: self.clock.time(),
            completed_at: None,
        };

        // Newest first, the same order the lists are shown in.
        self.tasks.mutate(|tasks| tasks.insert(0, task)).await?;
        info!("Added task {id}");
        Ok(id)
    }

    /// Flips a task between pending and done, stamping or clearing the
    /// completion time accordingly.
    pub async fn toggle_task(&mut self, id: u64) -> Result<TaskStatus> {
        if !self.tasks.get().iter().any(|t| t.id == id) {
            return Err(anyhow!("No task with id {id}"));
        }

        let now = self.clock.time();
        let mut toggled = TaskStatus::Pending;
        self.tasks
            .mutate(|tasks| {
                let task = tasks
                    .iter_mut()
                    .find(|t| t.id == id)
                    .expect("Presence checked above");
                task.status = match task.status {
                    TaskStatus::Pending => TaskStatus::Done,
                    TaskStatus::Done => TaskStatus::Pending,
                };
                task.completed_at = (task.status == TaskStatus::Done).then_some(now);
                toggled = task.status;
            })
            .await?;
        Ok(toggled)
    }

    pub async fn remove_task(&mut self, id: u64) -> Result<()> {
        if !self.tasks.get().iter().any(|t| t.id == id) {
            return Err(anyhow!("No task with id {id}"));
        }

        self.tasks.mutate(|tasks| tasks.retain(|t| t.id != id)).await?;
        info!("Removed task {id}");
        Ok(())
    }

    /// Records a finished session. Sessions shorter than one minute are never
    /// recorded. Returns whether the session was kept.
    pub async fn log_session(&mut self, minutes: u32, kind: SessionKind) -> Result<bool> {
        if minutes < 1 {
            return Ok(false);
        }

        let session = SessionEntity {
            minutes,
            kind,
            completed: true,
            created_at: self.clock.time(),
        };
        self.sessions
            .mutate(|sessions| sessions.insert(0, session))
            .await?;
        info!("Logged a {minutes} minute session");
        Ok(true)
    }

    pub async fn add_goal(
        &mut self,
        title: Arc<str>,
        description: Arc<str>,
        cadence: GoalCadence,
        target_minutes: u32,
    ) -> Result<()> {
        let goal = GoalEntity {
            title,
            description,
            cadence,
            target_minutes,
            active: true,
            created_at: self.clock.time(),
        };
        self.goals.mutate(|goals| goals.insert(0, goal)).await?;
        Ok(())
    }

    pub async fn update_settings(&mut self, apply: impl FnOnce(&mut Settings)) -> Result<()> {
        self.settings.mutate(apply).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
    use tempfile::tempdir;

    use crate::{
        data::entities::{Priority, SessionKind, TaskStatus},
        store::{bridge::FileBridge, service::StoreService},
        utils::clock::Clock,
    };

    use super::Workspace;

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn time(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn test_clock() -> Box<FixedClock> {
        Box::new(FixedClock(Utc.from_utc_datetime(&TEST_START_DATE)))
    }

    async fn open_workspace(dir: &std::path::Path) -> Result<Workspace> {
        let store = Arc::new(StoreService::new(FileBridge::new(dir)));
        Workspace::open(store, test_clock()).await
    }

    #[tokio::test]
    async fn test_task_lifecycle() -> Result<()> {
        let dir = tempdir()?;
        let mut workspace = open_workspace(dir.path()).await?;

        let first = workspace
            .add_task("write report".into(), "".into(), Priority::High, true)
            .await?;
        let second = workspace
            .add_task("water plants".into(), "".into(), Priority::Low, false)
            .await?;

        assert_eq!(workspace.tasks().len(), 2);
        // Newest first.
        assert_eq!(workspace.tasks()[0].id, second);

        let status = workspace.toggle_task(first).await?;
        assert_eq!(status, TaskStatus::Done);
        let done = workspace
            .tasks()
            .iter()
            .find(|t| t.id == first)
            .unwrap()
            .clone();
        assert!(done.completed_at.is_some());

        let status = workspace.toggle_task(first).await?;
        assert_eq!(status, TaskStatus::Pending);
        let pending = workspace.tasks().iter().find(|t| t.id == first).unwrap();
        assert!(pending.completed_at.is_none());

        workspace.remove_task(second).await?;
        assert_eq!(workspace.tasks().len(), 1);

        assert!(workspace.toggle_task(999).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_changes_survive_reopening() -> Result<()> {
        let dir = tempdir()?;

        {
            let mut workspace = open_workspace(dir.path()).await?;
            workspace
                .add_task("persisted".into(), "".into(), Priority::Medium, false)
                .await?;
            workspace.log_session(25, SessionKind::Focus).await?;
            workspace
                .update_settings(|s| s.daily_goal_minutes = 300)
                .await?;
        }

        let workspace = open_workspace(dir.path()).await?;
        assert_eq!(workspace.tasks().len(), 1);
        assert_eq!(&*workspace.tasks()[0].title, "persisted");
        assert_eq!(workspace.sessions().len(), 1);
        assert_eq!(workspace.settings().daily_goal_minutes, 300);
        Ok(())
    }

    #[tokio::test]
    async fn test_short_sessions_are_dropped() -> Result<()> {
        let dir = tempdir()?;
        let mut workspace = open_workspace(dir.path()).await?;

        assert!(!workspace.log_session(0, SessionKind::Focus).await?);
        assert!(workspace.log_session(1, SessionKind::Focus).await?);
        assert_eq!(workspace.sessions().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_task_ids_grow_past_removals() -> Result<()> {
        let dir = tempdir()?;
        let mut workspace = open_workspace(dir.path()).await?;

        let first = workspace
            .add_task("a".into(), "".into(), Priority::Medium, false)
            .await?;
        let second = workspace
            .add_task("b".into(), "".into(), Priority::Medium, false)
            .await?;
        workspace.remove_task(first).await?;
        let third = workspace
            .add_task("c".into(), "".into(), Priority::Medium, false)
            .await?;

        assert!(third > second);
        Ok(())
    }
}
