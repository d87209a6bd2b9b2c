use chrono::{DateTime, TimeZone};
use now::DateTimeNow;

use crate::{
    data::entities::{Quadrant, SessionEntity, SessionKind, Settings, TaskEntity},
    utils::time::{next_day_start, week_start},
};

#[derive(Debug, PartialEq)]
pub struct TodayStats {
    pub total_minutes: u32,
    pub session_count: usize,
    /// Share of the daily goal reached, capped at 100.
    pub progress_percent: f64,
}

/// Focus totals for the day containing `now`, measured against the daily
/// goal. The timezone of `now` decides where days begin.
pub fn today_stats<Tz: TimeZone>(
    sessions: &[SessionEntity],
    settings: &Settings,
    now: DateTime<Tz>,
) -> TodayStats {
    let start = now.beginning_of_day();
    let end = next_day_start(now);

    let mut total_minutes = 0u32;
    let mut session_count = 0usize;
    for session in focus_between(sessions, &start, &end) {
        total_minutes += session.minutes;
        session_count += 1;
    }

    let progress_percent = if settings.daily_goal_minutes == 0 {
        100.
    } else {
        (total_minutes as f64 / settings.daily_goal_minutes as f64 * 100.).min(100.)
    };

    TodayStats {
        total_minutes,
        session_count,
        progress_percent,
    }
}

#[derive(Debug, PartialEq)]
pub struct WeeklyStats {
    /// Focus minutes per weekday of the current week, Sunday first.
    pub per_day: [u32; 7],
    pub total_minutes: u32,
}

pub fn weekly_stats<Tz: TimeZone>(sessions: &[SessionEntity], now: DateTime<Tz>) -> WeeklyStats {
    let start = week_start(now);

    let mut per_day = [0u32; 7];
    for session in sessions.iter().filter(|s| s.kind == SessionKind::Focus) {
        let moment = session.created_at.with_timezone(&start.timezone());
        if moment < start {
            continue;
        }
        let offset = (moment - start.clone()).num_days();
        if (0..7).contains(&offset) {
            per_day[offset as usize] += session.minutes;
        }
    }

    WeeklyStats {
        per_day,
        total_minutes: per_day.iter().sum(),
    }
}

/// Total focus minutes recorded in [start, end).
pub fn focus_minutes_between<Tz: TimeZone>(
    sessions: &[SessionEntity],
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
) -> u32 {
    focus_between(sessions, start, end).map(|s| s.minutes).sum()
}

fn focus_between<'a, Tz: TimeZone>(
    sessions: &'a [SessionEntity],
    start: &'a DateTime<Tz>,
    end: &'a DateTime<Tz>,
) -> impl Iterator<Item = &'a SessionEntity> {
    sessions.iter().filter(move |s| {
        s.kind == SessionKind::Focus
            && s.created_at.with_timezone(&start.timezone()) >= *start
            && s.created_at.with_timezone(&start.timezone()) < *end
    })
}

#[derive(Debug, PartialEq)]
pub struct TaskStats {
    pub completed: usize,
    pub pending: usize,
}

pub fn task_stats(tasks: &[TaskEntity]) -> TaskStats {
    let completed = tasks.iter().filter(|t| t.is_done()).count();
    TaskStats {
        completed,
        pending: tasks.len() - completed,
    }
}

pub fn quadrant_tasks<'a>(tasks: &'a [TaskEntity], quadrant: Quadrant) -> Vec<&'a TaskEntity> {
    tasks.iter().filter(|t| t.quadrant() == quadrant).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

    use crate::data::entities::{
        Priority, Quadrant, SessionEntity, SessionKind, Settings, TaskEntity, TaskStatus,
    };

    use super::{quadrant_tasks, task_stats, today_stats, weekly_stats};

    // A Wednesday.
    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    fn noon() -> DateTime<Utc> {
        Utc.from_utc_datetime(&TEST_START_DATE) + Duration::hours(12)
    }

    fn session(minutes: u32, kind: SessionKind, at: DateTime<Utc>) -> SessionEntity {
        SessionEntity {
            minutes,
            kind,
            completed: true,
            created_at: at,
        }
    }

    fn task(id: u64, priority: Priority, urgent: bool, status: TaskStatus) -> TaskEntity {
        TaskEntity {
            id,
            title: "task".into(),
            description: "".into(),
            priority,
            urgent,
            status,
            created_at: noon(),
            completed_at: None,
        }
    }

    #[test]
    fn test_today_stats_filters_day_and_kind() {
        let sessions = vec![
            session(25, SessionKind::Focus, noon()),
            session(50, SessionKind::Focus, noon() + Duration::hours(2)),
            // Breaks don't count toward the goal.
            session(10, SessionKind::Break, noon()),
            // Yesterday and tomorrow don't count either.
            session(25, SessionKind::Focus, noon() - Duration::days(1)),
            session(25, SessionKind::Focus, noon() + Duration::days(1)),
        ];

        let stats = today_stats(&sessions, &Settings::default(), noon());
        assert_eq!(stats.total_minutes, 75);
        assert_eq!(stats.session_count, 2);
        assert!((stats.progress_percent - 31.25).abs() < 1e-9);
    }

    #[test]
    fn test_today_progress_is_capped() {
        let sessions = vec![session(500, SessionKind::Focus, noon())];

        let stats = today_stats(&sessions, &Settings::default(), noon());
        assert_eq!(stats.progress_percent, 100.);
    }

    #[test]
    fn test_weekly_stats_buckets_by_weekday() {
        // The week of 2018-07-04 started on Sunday the 1st.
        let sunday_noon = noon() - Duration::days(3);
        let sessions = vec![
            session(30, SessionKind::Focus, sunday_noon),
            session(15, SessionKind::Focus, noon()),
            session(45, SessionKind::Focus, noon()),
            session(20, SessionKind::Break, noon()),
            // Previous week.
            session(90, SessionKind::Focus, sunday_noon - Duration::days(1)),
        ];

        let stats = weekly_stats(&sessions, noon());
        assert_eq!(stats.per_day, [30, 0, 0, 60, 0, 0, 0]);
        assert_eq!(stats.total_minutes, 90);
    }

    #[test]
    fn test_task_stats() {
        let tasks = vec![
            task(1, Priority::High, true, TaskStatus::Done),
            task(2, Priority::Low, false, TaskStatus::Pending),
            task(3, Priority::Low, false, TaskStatus::Pending),
        ];

        let stats = task_stats(&tasks);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
    }

    #[test]
    fn test_quadrants_partition_tasks() {
        let tasks = vec![
            task(1, Priority::High, true, TaskStatus::Pending),
            task(2, Priority::High, false, TaskStatus::Pending),
            task(3, Priority::Medium, true, TaskStatus::Pending),
            task(4, Priority::Low, false, TaskStatus::Pending),
        ];

        let ids = |quadrant| {
            quadrant_tasks(&tasks, quadrant)
                .iter()
                .map(|t| t.id)
                .collect::<Vec<_>>()
        };

        assert_eq!(ids(Quadrant::DoFirst), vec![1]);
        assert_eq!(ids(Quadrant::Schedule), vec![2]);
        assert_eq!(ids(Quadrant::Delegate), vec![3]);
        assert_eq!(ids(Quadrant::Eliminate), vec![4]);

        let total: usize = Quadrant::ALL.iter().map(|q| ids(*q).len()).sum();
        assert_eq!(total, tasks.len());
    }
}
