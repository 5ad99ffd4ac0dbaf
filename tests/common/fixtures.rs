#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use taskboard::model::{Task, TaskId};
use uuid::Uuid;

/// Fixed base time so ordering and snapshots are deterministic.
pub fn base_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_735_689_600, 0).unwrap() // 2025-01-01 00:00:00 UTC
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .unwrap()
}

/// An open task created `minutes` after the base time.
pub fn task(title: &str, minutes: i64) -> Task {
    Task::new(title, "", base_time() + Duration::minutes(minutes))
}

pub fn task_with_description(title: &str, description: &str, minutes: i64) -> Task {
    Task::new(title, description, base_time() + Duration::minutes(minutes))
}

/// A completed task created `minutes` after the base time and completed
/// an hour later.
pub fn completed_task(title: &str, minutes: i64) -> Task {
    let mut task = task(title, minutes);
    let done_at = task.created_at + Duration::hours(1);
    task.apply_completion(true, done_at);
    task
}

pub fn task_created_at(title: &str, created_at: DateTime<Utc>) -> Task {
    Task::new(title, "", created_at)
}

/// A task with a fixed id, for wire-shape snapshots.
pub fn pinned_task(uuid: &str, title: &str, description: &str) -> Task {
    let mut task = Task::new(title, description, base_time());
    task.id = TaskId::from_uuid(Uuid::parse_str(uuid).unwrap());
    task
}

/// `count` open tasks, one minute apart, titled `task-00`, `task-01`, ...
pub fn numbered_tasks(count: usize) -> Vec<Task> {
    (0..count)
        .map(|i| task(&format!("task-{i:02}"), i64::try_from(i).unwrap()))
        .collect()
}
