// HTTP client for the workforce API. The API owns all business rules and
// persistence; this client wraps its endpoints and turns error bodies into
// typed rejections carrying the `detail` message the UI shows in toasts.

use std::time::Duration;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::WorkforceApiConfig;
use crate::errors::ApiClientError;
use crate::models::{
    Foreman, ForemanCreate, ForemanUpdate, Task, TaskCreate, TaskStatusUpdate, TaskUpdate,
    Technician, TechnicianCreate, TechnicianUpdate,
};

/// Client for the workforce API. Cheap to clone; clones share one
/// connection pool.
#[derive(Debug, Clone)]
pub struct WorkforceClient {
    client: Client,
    base_url: String,
}

impl WorkforceClient {
    pub fn new(config: &WorkforceApiConfig) -> Result<Self, ApiClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                ApiClientError::RequestFailed(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiClientError> {
        let request = self.client.request(Method::GET, self.url(path));
        Self::dispatch(path, request).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiClientError> {
        let request = self.client.request(method, self.url(path)).json(body);
        Self::dispatch(path, request).await
    }

    async fn dispatch<T: DeserializeOwned>(
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiClientError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiClientError::Timeout(e.to_string())
            } else {
                ApiClientError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            tracing::warn!(path = %path, status = %status, detail = %detail, "API rejected request");
            return Err(ApiClientError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiClientError::InvalidBody(e.to_string()))
    }

    // ------------------------------------------------------------------
    // Foremen
    // ------------------------------------------------------------------

    #[tracing::instrument(skip(self))]
    pub async fn list_foremen(&self) -> Result<Vec<Foreman>, ApiClientError> {
        self.get_json("/foremen").await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_foreman(&self, id: i64) -> Result<Foreman, ApiClientError> {
        self.get_json(&format!("/foremen/{}", id)).await
    }

    #[tracing::instrument(skip(self, dto))]
    pub async fn create_foreman(&self, dto: &ForemanCreate) -> Result<Foreman, ApiClientError> {
        self.send_json(Method::POST, "/foremen", dto).await
    }

    #[tracing::instrument(skip(self, dto))]
    pub async fn update_foreman(
        &self,
        id: i64,
        dto: &ForemanUpdate,
    ) -> Result<Foreman, ApiClientError> {
        self.send_json(Method::PUT, &format!("/foremen/{}", id), dto)
            .await
    }

    // ------------------------------------------------------------------
    // Technicians
    // ------------------------------------------------------------------

    #[tracing::instrument(skip(self))]
    pub async fn list_technicians(&self) -> Result<Vec<Technician>, ApiClientError> {
        self.get_json("/technicians").await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_technician(&self, id: i64) -> Result<Technician, ApiClientError> {
        self.get_json(&format!("/technicians/{}", id)).await
    }

    #[tracing::instrument(skip(self, dto))]
    pub async fn create_technician(
        &self,
        dto: &TechnicianCreate,
    ) -> Result<Technician, ApiClientError> {
        self.send_json(Method::POST, "/technicians", dto).await
    }

    #[tracing::instrument(skip(self, dto))]
    pub async fn update_technician(
        &self,
        id: i64,
        dto: &TechnicianUpdate,
    ) -> Result<Technician, ApiClientError> {
        self.send_json(Method::PUT, &format!("/technicians/{}", id), dto)
            .await
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    #[tracing::instrument(skip(self))]
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiClientError> {
        self.get_json("/technician-tasks").await
    }

    /// Tasks of one technician, the fetch the self-service view uses
    #[tracing::instrument(skip(self))]
    pub async fn list_technician_tasks(
        &self,
        technician_id: i64,
    ) -> Result<Vec<Task>, ApiClientError> {
        self.get_json(&format!("/technicians/{}/tasks", technician_id))
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_task(&self, id: i64) -> Result<Task, ApiClientError> {
        self.get_json(&format!("/technician-tasks/{}", id)).await
    }

    #[tracing::instrument(skip(self, dto))]
    pub async fn create_task(&self, dto: &TaskCreate) -> Result<Task, ApiClientError> {
        self.send_json(Method::POST, "/technician-tasks", dto).await
    }

    #[tracing::instrument(skip(self, dto))]
    pub async fn update_task(&self, id: i64, dto: &TaskUpdate) -> Result<Task, ApiClientError> {
        self.send_json(Method::PUT, &format!("/technician-tasks/{}", id), dto)
            .await
    }

    #[tracing::instrument(skip(self, dto))]
    pub async fn update_task_status(
        &self,
        dto: &TaskStatusUpdate,
    ) -> Result<Task, ApiClientError> {
        self.send_json(Method::POST, "/technician-tasks/status", dto)
            .await
    }
}

/// Pull the `detail` field out of an API error body, if it is JSON at all
fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("detail")?
        .as_str()
        .map(|s| s.to_string())
}
