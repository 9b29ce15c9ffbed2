//! Mock task service for testing.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use super::TaskService;
use crate::types::{NewTask, Task, TaskId, TaskStatus, TaskUpdate, UserId};

/// Mock task service backed by an in-memory list.
///
/// Calls are recorded by name so tests can assert what reached the service.
/// `failing` makes every call return an error.
#[derive(Clone, Default)]
pub struct MockTaskService {
    tasks: Arc<RwLock<Vec<Task>>>,
    calls: Arc<RwLock<Vec<String>>>,
    fail: Arc<RwLock<Option<String>>>,
}

#[allow(dead_code)]
impl MockTaskService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add initial tasks to the service.
    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        *self.tasks.write().unwrap() = tasks;
        self
    }

    /// Make every call fail with the given message.
    pub fn failing(self, message: &str) -> Self {
        self.set_failure(Some(message));
        self
    }

    pub fn set_failure(&self, message: Option<&str>) {
        *self.fail.write().unwrap() = message.map(str::to_string);
    }

    /// Names of the calls made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.read().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.write().unwrap().push(call);
        match self.fail.read().unwrap().as_ref() {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(()),
        }
    }

    fn with_task(&self, task_id: TaskId, f: impl FnOnce(&mut Task)) -> Result<Task> {
        let mut tasks = self.tasks.write().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| anyhow!("task {task_id} not found"))?;
        f(task);
        Ok(task.clone())
    }
}

#[async_trait]
impl TaskService for MockTaskService {
    async fn list(&self, user_id: UserId) -> Result<Vec<Task>> {
        self.record(format!("list {user_id}"))?;
        Ok(self.tasks())
    }

    async fn create(&self, _user_id: UserId, new_task: &NewTask) -> Result<Task> {
        self.record(format!("create {}", new_task.title))?;
        let mut tasks = self.tasks.write().unwrap();
        let id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let mut task = crate::app::classify::tests::task(id, TaskStatus::Todo, new_task.parent_id);
        task.title = new_task.title.clone();
        task.due_date = new_task.due_date;
        task.priority = new_task.priority;
        tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&self, task_id: TaskId, update: &TaskUpdate) -> Result<Task> {
        self.record(format!("update {task_id}"))?;
        self.with_task(task_id, |task| {
            task.title = update.title.clone();
            task.due_date = update.due_date;
            task.priority = update.priority;
        })
    }

    async fn delete(&self, task_id: TaskId) -> Result<()> {
        self.record(format!("delete {task_id}"))?;
        self.tasks.write().unwrap().retain(|t| t.id != task_id);
        Ok(())
    }

    async fn change_status(&self, task_id: TaskId, status: TaskStatus) -> Result<Task> {
        self.record(format!("change_status {task_id} {}", status.as_str()))?;
        self.with_task(task_id, |task| task.set_status(status))
    }
}
