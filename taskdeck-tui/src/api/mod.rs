pub mod client;
pub mod dev_backend;
pub mod dto;
#[cfg(test)]
pub mod mock;

use crate::types::{NewTask, Task, TaskId, TaskStatus, TaskUpdate, UserId};
use anyhow::Result;
use async_trait::async_trait;

pub use client::ApiClient;
pub use dev_backend::DevBackend;

/// Remote task store. Every call may fail; callers reconcile by refreshing.
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list(&self, user_id: UserId) -> Result<Vec<Task>>;

    async fn create(&self, user_id: UserId, task: &NewTask) -> Result<Task>;

    async fn update(&self, task_id: TaskId, update: &TaskUpdate) -> Result<Task>;

    async fn delete(&self, task_id: TaskId) -> Result<()>;

    async fn change_status(&self, task_id: TaskId, status: TaskStatus) -> Result<Task>;
}
