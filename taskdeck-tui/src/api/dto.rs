use crate::types::{NewTask, Priority, TaskId, TaskStatus, TaskUpdate, UserId};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest<'a> {
    pub user_id: UserId,
    pub parent_id: Option<TaskId>,
    pub title: &'a str,
    pub description: &'a str,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub priority: Priority,
}

impl<'a> CreateTaskRequest<'a> {
    pub fn new(user_id: UserId, task: &'a NewTask) -> Self {
        Self {
            user_id,
            parent_id: task.parent_id,
            title: &task.title,
            description: &task.description,
            due_date: task.due_date,
            priority: task.priority,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest<'a> {
    pub title: &'a str,
    pub description: &'a str,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub priority: Priority,
}

impl<'a> From<&'a TaskUpdate> for UpdateTaskRequest<'a> {
    fn from(update: &'a TaskUpdate) -> Self {
        Self {
            title: &update.title,
            description: &update.description,
            due_date: update.due_date,
            priority: update.priority,
        }
    }
}

#[derive(Serialize)]
pub struct ChangeStatusRequest {
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn create_request_uses_camel_case() {
        let task = NewTask {
            parent_id: Some(3),
            title: "Pay rent".to_string(),
            description: String::new(),
            due_date: Some(datetime!(2024-06-01 00:00 UTC)),
            priority: Priority::High,
        };
        let json = serde_json::to_value(CreateTaskRequest::new(7, &task)).unwrap();
        assert_eq!(json["userId"], 7);
        assert_eq!(json["parentId"], 3);
        assert_eq!(json["dueDate"], "2024-06-01T00:00:00Z");
        assert_eq!(json["priority"], "high");
    }

    #[test]
    fn status_request_is_snake_case() {
        let json = serde_json::to_value(ChangeStatusRequest {
            status: TaskStatus::InProgress,
        })
        .unwrap();
        assert_eq!(json["status"], "in_progress");
    }
}
