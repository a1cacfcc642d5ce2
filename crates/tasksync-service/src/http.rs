use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tasksync_core::api::Envelope;
use tasksync_core::task::{CreateTask, Task};

use crate::{ServiceError, TaskService};

/// Async HTTP client implementation of TaskService.
/// Connects to a running tasksync-server.
pub struct HttpService {
    base_url: String,
    client: Client,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Internal(format!("build http client: {e}")))?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the server is reachable.
    pub async fn health_check(&self) -> Result<(), ServiceError> {
        let resp = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ServiceError::Internal(format!(
                "health check failed: {}",
                resp.status()
            )))
        }
    }

    /// `/api/tasks/<id>` with the id as a single escaped path segment.
    fn task_url(&self, id: &str) -> Result<Url, ServiceError> {
        let mut url = Url::parse(&format!("{}/api/tasks", self.base_url))
            .map_err(|e| ServiceError::Internal(format!("invalid server url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ServiceError::Internal(format!("invalid server url: {}", self.base_url)))?
            .push(id);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn put_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T, ServiceError> {
        let resp = self
            .client
            .put(url)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn delete_req(&self, url: Url) -> Result<(), ServiceError> {
        let resp = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(parse_error(resp).await)
        }
    }
}

/// Unwrap the `data` of a success envelope.
async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ServiceError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error_with_status(status, resp).await);
    }
    let envelope = resp
        .json::<Envelope<T>>()
        .await
        .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))?;
    if !envelope.is_success() {
        return Err(ServiceError::Internal(envelope.message));
    }
    envelope
        .data
        .ok_or_else(|| ServiceError::Internal("response envelope has no data".into()))
}

async fn parse_error(resp: reqwest::Response) -> ServiceError {
    let status = resp.status();
    parse_error_with_status(status, resp).await
}

async fn parse_error_with_status(status: StatusCode, resp: reqwest::Response) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let msg = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
        .map(|env| env.message)
        .unwrap_or(body);

    if status == StatusCode::NOT_FOUND {
        ServiceError::NotFound(msg)
    } else if status == StatusCode::BAD_REQUEST {
        ServiceError::InvalidInput(msg)
    } else {
        ServiceError::Internal(msg)
    }
}

#[async_trait]
impl TaskService for HttpService {
    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        self.get_json("/api/tasks").await
    }

    async fn create_task(&self, input: &CreateTask) -> Result<Task, ServiceError> {
        self.post_json("/api/tasks", input).await
    }

    async fn toggle_task(&self, id: &str) -> Result<Task, ServiceError> {
        self.put_empty(self.task_url(id)?).await
    }

    async fn delete_task(&self, id: &str) -> Result<(), ServiceError> {
        self.delete_req(self.task_url(id)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let svc = HttpService::new("http://localhost:5000/");
        assert_eq!(svc.base_url(), "http://localhost:5000");
    }

    #[test]
    fn task_url_escapes_the_id() {
        let svc = HttpService::new("http://localhost:5000/");
        let url = svc.task_url("abc?x=1#frag").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/tasks/abc%3Fx=1%23frag");

        let url = svc.task_url("a/b").unwrap();
        assert_eq!(url.path(), "/api/tasks/a%2Fb");
    }

    #[tokio::test]
    async fn unreachable_server_is_an_internal_error() {
        // Port 1 is reserved and nothing listens there.
        let svc = HttpService::with_timeout("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        assert!(matches!(
            svc.list_tasks().await,
            Err(ServiceError::Internal(_))
        ));
        assert!(svc.health_check().await.is_err());
    }
}
