use super::{execute, fetch, fetch_list};
use crate::error::Result;
use crate::transport::{segment, ApiRequest, Transport};
use nasctl_common::jobs::{BackupHistory, BackupJob, BackupJobRequest};
use std::sync::Arc;

/// `/backups`
#[derive(Clone)]
pub struct BackupApi {
    transport: Arc<dyn Transport>,
}

impl BackupApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list_jobs(&self) -> Result<Vec<BackupJob>> {
        fetch_list(&*self.transport, ApiRequest::get("/backups/jobs")).await
    }

    pub async fn get_job(&self, id: &str) -> Result<BackupJob> {
        let path = format!("/backups/jobs/{}", segment(id));
        fetch(&*self.transport, ApiRequest::get(path)).await
    }

    pub async fn create_job(&self, req: &BackupJobRequest) -> Result<BackupJob> {
        fetch(&*self.transport, ApiRequest::post("/backups/jobs").json(req)?).await
    }

    pub async fn update_job(&self, id: &str, req: &BackupJobRequest) -> Result<()> {
        let path = format!("/backups/jobs/{}", segment(id));
        execute(&*self.transport, ApiRequest::put(path).json(req)?).await
    }

    pub async fn delete_job(&self, id: &str) -> Result<()> {
        let path = format!("/backups/jobs/{}", segment(id));
        execute(&*self.transport, ApiRequest::delete(path)).await
    }

    /// Start a job now; the reply is the new history entry
    pub async fn run_job(&self, id: &str) -> Result<BackupHistory> {
        let path = format!("/backups/jobs/{}/run", segment(id));
        fetch(&*self.transport, ApiRequest::post(path)).await
    }

    pub async fn history(&self) -> Result<Vec<BackupHistory>> {
        fetch_list(&*self.transport, ApiRequest::get("/backups/history")).await
    }
}
