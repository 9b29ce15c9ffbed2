use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

use super::TaskService;
use crate::types::{NewTask, Priority, Task, TaskId, TaskStatus, TaskUpdate, UserId};

/// In-memory task service used by `taskdeck dev`.
#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<DevStore>>,
}

#[derive(Debug)]
struct DevStore {
    tasks: Vec<Task>,
    // Ids are handed out once and never reused.
    next_id: TaskId,
}

impl DevStore {
    fn find_mut(&mut self, task_id: TaskId) -> Result<&mut Task> {
        match self.tasks.iter_mut().find(|task| task.id == task_id) {
            Some(task) => Ok(task),
            None => bail!("task {task_id} not found"),
        }
    }
}

impl Default for DevBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DevBackend {
    pub fn new() -> Self {
        Self::with_tasks(seed_dev_tasks(OffsetDateTime::now_utc()))
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1;
        Self {
            store: Arc::new(Mutex::new(DevStore { tasks, next_id })),
        }
    }
}

#[async_trait]
impl TaskService for DevBackend {
    async fn list(&self, _user_id: UserId) -> Result<Vec<Task>> {
        Ok(self.store.lock().await.tasks.clone())
    }

    async fn create(&self, _user_id: UserId, new_task: &NewTask) -> Result<Task> {
        let mut store = self.store.lock().await;
        if let Some(parent_id) = new_task.parent_id {
            if !store.tasks.iter().any(|task| task.id == parent_id) {
                bail!("parent task {parent_id} not found");
            }
        }
        let now = OffsetDateTime::now_utc();
        let task = Task {
            id: store.next_id,
            parent_id: new_task.parent_id,
            title: new_task.title.clone(),
            description: non_empty(&new_task.description),
            due_date: new_task.due_date,
            status: TaskStatus::Todo,
            completed: false,
            priority: new_task.priority,
            created_at: now,
            updated_at: now,
        };
        store.next_id += 1;
        store.tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&self, task_id: TaskId, update: &TaskUpdate) -> Result<Task> {
        let mut store = self.store.lock().await;
        let task = store.find_mut(task_id)?;
        task.title = update.title.clone();
        task.description = non_empty(&update.description);
        task.due_date = update.due_date;
        task.priority = update.priority;
        task.updated_at = OffsetDateTime::now_utc();
        Ok(task.clone())
    }

    async fn delete(&self, task_id: TaskId) -> Result<()> {
        let mut store = self.store.lock().await;
        let before = store.tasks.len();
        // Subtasks go with their parent.
        store
            .tasks
            .retain(|task| task.id != task_id && task.parent_id != Some(task_id));
        if store.tasks.len() == before {
            bail!("task {task_id} not found");
        }
        Ok(())
    }

    async fn change_status(&self, task_id: TaskId, status: TaskStatus) -> Result<Task> {
        let mut store = self.store.lock().await;
        let task = store.find_mut(task_id)?;
        task.set_status(status);
        task.updated_at = OffsetDateTime::now_utc();
        Ok(task.clone())
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn seed_dev_tasks(now: OffsetDateTime) -> Vec<Task> {
    let seeds: [(Option<TaskId>, &str, Option<i64>, TaskStatus, Priority); 9] = [
        (None, "Renew passport", Some(-2), TaskStatus::Todo, Priority::High),
        (None, "Plan team offsite", Some(0), TaskStatus::InProgress, Priority::Medium),
        (Some(2), "Book venue", Some(0), TaskStatus::Todo, Priority::High),
        (Some(2), "Send invites", Some(3), TaskStatus::Todo, Priority::Medium),
        (Some(2), "Collect dietary preferences", None, TaskStatus::Done, Priority::Low),
        (None, "Water the plants", Some(1), TaskStatus::Todo, Priority::Low),
        (None, "Read release notes", None, TaskStatus::Todo, Priority::Medium),
        (None, "File expense report", Some(-5), TaskStatus::Done, Priority::Medium),
        (None, "Call the dentist", Some(7), TaskStatus::Todo, Priority::Low),
    ];

    seeds
        .into_iter()
        .zip(1..)
        .map(|((parent_id, title, due_in_days, status, priority), id)| {
            let created_at = now - Duration::days(14 - id);
            Task {
                id,
                parent_id,
                title: title.to_string(),
                description: Some(format!("Demo task #{id}.")),
                due_date: due_in_days.map(|days| now + Duration::days(days)),
                status,
                completed: status == TaskStatus::Done,
                priority,
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}
