use super::{execute, fetch};
use crate::error::Result;
use crate::transport::{ApiRequest, Transport};
use nasctl_common::jobs::{CronValidation, ExecutionPage, ScheduledTask, TaskPage, TaskRequest};
use serde_json::json;
use std::sync::Arc;

/// `/tasks`
#[derive(Clone)]
pub struct TasksApi {
    transport: Arc<dyn Transport>,
}

impl TasksApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// First page of tasks, backend default page size
    pub async fn list(&self) -> Result<Vec<ScheduledTask>> {
        let page: TaskPage = fetch(&*self.transport, ApiRequest::get("/tasks")).await?;
        Ok(page.tasks)
    }

    pub async fn list_page(&self, offset: u32, limit: u32) -> Result<TaskPage> {
        let request = ApiRequest::get("/tasks")
            .query("offset", offset.to_string())
            .query("limit", limit.to_string());
        fetch(&*self.transport, request).await
    }

    pub async fn get(&self, id: u64) -> Result<ScheduledTask> {
        fetch(&*self.transport, ApiRequest::get(format!("/tasks/{}", id))).await
    }

    pub async fn create(&self, req: &TaskRequest) -> Result<ScheduledTask> {
        fetch(&*self.transport, ApiRequest::post("/tasks").json(req)?).await
    }

    pub async fn update(&self, id: u64, req: &TaskRequest) -> Result<ScheduledTask> {
        let request = ApiRequest::put(format!("/tasks/{}", id)).json(req)?;
        fetch(&*self.transport, request).await
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        execute(&*self.transport, ApiRequest::delete(format!("/tasks/{}", id))).await
    }

    pub async fn run_now(&self, id: u64) -> Result<()> {
        execute(&*self.transport, ApiRequest::post(format!("/tasks/{}/run", id))).await
    }

    pub async fn executions(&self, id: u64, limit: u32) -> Result<ExecutionPage> {
        let request = ApiRequest::get(format!("/tasks/{}/executions", id))
            .query("limit", limit.to_string());
        fetch(&*self.transport, request).await
    }

    pub async fn validate_cron(&self, expression: &str) -> Result<CronValidation> {
        let request = ApiRequest::post("/tasks/validate-cron").json(&json!({ "expression": expression }))?;
        fetch(&*self.transport, request).await
    }
}
