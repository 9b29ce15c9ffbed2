use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

pub type TaskId = i64;
pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Status after a completion toggle: done reopens as todo, anything else completes.
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Done => TaskStatus::Todo,
            TaskStatus::Todo | TaskStatus::InProgress => TaskStatus::Done,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Todo => "Todo",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Done => "Done",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn next(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Priority::Low => Priority::High,
            Priority::Medium => Priority::Low,
            Priority::High => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        f.write_str(label)
    }
}

/// A task as returned by the task service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub parent_id: Option<TaskId>,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub due_date: Option<OffsetDateTime>,
    pub status: TaskStatus,
    pub completed: bool,
    pub priority: Priority,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Set status and keep the completion flag in step with it.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.completed = status == TaskStatus::Done;
    }
}

/// Fields for a task that does not exist yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub parent_id: Option<TaskId>,
    pub title: String,
    pub description: String,
    pub due_date: Option<OffsetDateTime>,
    pub priority: Priority,
}

/// Editable fields of an existing task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpdate {
    pub title: String,
    pub description: String,
    pub due_date: Option<OffsetDateTime>,
    pub priority: Priority,
}
