use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::dto::{ChangeStatusRequest, CreateTaskRequest, UpdateTaskRequest};
use super::TaskService;
use crate::types::{NewTask, Task, TaskId, TaskStatus, TaskUpdate, UserId};

/// HTTP client for the task service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid API URL: {}", base_url))?;
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Failed to build URL for path {}", path))
    }

    async fn send(&self, request: RequestBuilder, call_name: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to call {}", call_name))?;

        if response.status() == StatusCode::NOT_FOUND {
            anyhow::bail!("{call_name}: task not found");
        }

        response
            .error_for_status_ref()
            .with_context(|| format!("{} returned error", call_name))?;

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<T> {
        let response = self.send(request, call_name).await?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse {} response", call_name))
    }

    async fn send_without_body(&self, request: RequestBuilder, call_name: &str) -> Result<()> {
        self.send(request, call_name).await?;
        Ok(())
    }
}

#[async_trait]
impl TaskService for ApiClient {
    async fn list(&self, user_id: UserId) -> Result<Vec<Task>> {
        self.get_json(
            self.client
                .get(self.endpoint("/tasks")?)
                .query(&[("userId", user_id)]),
            "GET /tasks",
        )
        .await
    }

    async fn create(&self, user_id: UserId, task: &NewTask) -> Result<Task> {
        self.get_json(
            self.client
                .post(self.endpoint("/tasks")?)
                .json(&CreateTaskRequest::new(user_id, task)),
            "POST /tasks",
        )
        .await
    }

    async fn update(&self, task_id: TaskId, update: &TaskUpdate) -> Result<Task> {
        self.get_json(
            self.client
                .put(self.endpoint(&format!("/tasks/{task_id}"))?)
                .json(&UpdateTaskRequest::from(update)),
            "PUT /tasks/{id}",
        )
        .await
    }

    async fn delete(&self, task_id: TaskId) -> Result<()> {
        self.send_without_body(
            self.client
                .delete(self.endpoint(&format!("/tasks/{task_id}"))?),
            "DELETE /tasks/{id}",
        )
        .await
    }

    async fn change_status(&self, task_id: TaskId, status: TaskStatus) -> Result<Task> {
        self.get_json(
            self.client
                .put(self.endpoint(&format!("/tasks/{task_id}/status"))?)
                .json(&ChangeStatusRequest { status }),
            "PUT /tasks/{id}/status",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_onto_base_url() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(
            client.endpoint("/tasks/4/status").unwrap().as_str(),
            "http://localhost:8080/tasks/4/status"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(ApiClient::new("not a url").is_err());
    }

    /// Serve one canned HTTP response on a local port.
    async fn serve_once(response: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn delete_succeeds_on_empty_response() {
        let url = serve_once("HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n").await;
        let client = ApiClient::new(&url).unwrap();
        client.delete(3).await.unwrap();
    }

    #[tokio::test]
    async fn delete_of_missing_task_names_the_call() {
        let url = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let client = ApiClient::new(&url).unwrap();
        let err = client.delete(3).await.unwrap_err();
        assert_eq!(err.to_string(), "DELETE /tasks/{id}: task not found");
    }
}
