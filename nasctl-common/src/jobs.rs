//! Backup jobs and scheduled tasks

use crate::de::null_as_default;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Backup strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackupType {
    #[default]
    Full,
    Incremental,
    Differential,
    #[serde(other)]
    Other,
}

impl fmt::Display for BackupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Incremental => write!(f, "incremental"),
            Self::Differential => write!(f, "differential"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for BackupType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "incremental" | "incr" => Ok(Self::Incremental),
            "differential" | "diff" => Ok(Self::Differential),
            other => Err(crate::Error::Validation(format!("unknown backup type: {}", other))),
        }
    }
}

/// Run state shared by backup jobs, task runs and their history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Idle,
    Running,
    Success,
    Failed,
    Timeout,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Backup job definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupJob {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub source: String,
    pub destination: String,
    #[serde(default, rename = "type")]
    pub backup_type: BackupType,
    /// Cron expression
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub enabled: bool,
    /// Days to keep backups
    #[serde(default)]
    pub retention: u32,
    #[serde(default)]
    pub compression: bool,
    #[serde(default)]
    pub encryption: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<HashMap<String, String>>,
}

/// Body of `POST /backups/jobs` and `PUT /backups/jobs/{id}`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupJobRequest {
    pub name: String,
    pub description: String,
    pub source: String,
    pub destination: String,
    #[serde(rename = "type")]
    pub backup_type: BackupType,
    pub schedule: String,
    pub enabled: bool,
    pub retention: u32,
    pub compression: bool,
    pub encryption: bool,
}

impl From<&BackupJob> for BackupJobRequest {
    fn from(job: &BackupJob) -> Self {
        Self {
            name: job.name.clone(),
            description: job.description.clone(),
            source: job.source.clone(),
            destination: job.destination.clone(),
            backup_type: job.backup_type,
            schedule: job.schedule.clone(),
            enabled: job.enabled,
            retention: job.retention,
            compression: job.compression,
            encryption: job.encryption,
        }
    }
}

/// One finished or running backup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupHistory {
    pub id: String,
    pub job_id: String,
    #[serde(default)]
    pub job_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub bytes_backup: i64,
    #[serde(default)]
    pub files_backup: i64,
    /// Seconds
    #[serde(default)]
    pub duration: i64,
}

/// Cron-driven maintenance task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// cleanup, backup, maintenance, custom
    #[serde(default)]
    pub task_type: String,
    pub cron_expression: String,
    #[serde(default)]
    pub enabled: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_error: String,
    #[serde(default)]
    pub run_count: u64,
    /// Task-specific JSON, kept as the raw string
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub config: String,
    #[serde(default)]
    pub timeout_seconds: u32,
    #[serde(default)]
    pub retry_on_failure: bool,
    #[serde(default)]
    pub max_retries: u32,
}

/// One page of `GET /tasks`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<ScheduledTask>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub limit: u32,
}

/// Body of `POST /tasks` and `PUT /tasks/{id}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub name: String,
    pub description: String,
    pub task_type: String,
    pub cron_expression: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub config: String,
    pub timeout_seconds: u32,
    pub retry_on_failure: bool,
    pub max_retries: u32,
}

impl Default for TaskRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            task_type: "custom".to_string(),
            cron_expression: String::new(),
            enabled: true,
            config: String::new(),
            timeout_seconds: 300,
            retry_on_failure: false,
            max_retries: 3,
        }
    }
}

impl From<&ScheduledTask> for TaskRequest {
    fn from(task: &ScheduledTask) -> Self {
        Self {
            name: task.name.clone(),
            description: task.description.clone(),
            task_type: task.task_type.clone(),
            cron_expression: task.cron_expression.clone(),
            enabled: task.enabled,
            config: task.config.clone(),
            timeout_seconds: task.timeout_seconds,
            retry_on_failure: task.retry_on_failure,
            max_retries: task.max_retries,
        }
    }
}

/// One run of a scheduled task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskExecution {
    pub id: u64,
    pub task_id: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Milliseconds
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    /// scheduler, manual, api
    #[serde(default)]
    pub triggered_by: String,
    #[serde(default)]
    pub retry_count: u32,
}

/// One page of `GET /tasks/{id}/executions`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub executions: Vec<TaskExecution>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub limit: u32,
}

/// Reply to `POST /tasks/validate-cron`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Next five run times, local `YYYY-MM-DD HH:MM:SS`
    #[serde(default)]
    pub next_runs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_job_from_backend_json() {
        let json = r#"{
            "id": "job-1",
            "name": "nightly",
            "description": "",
            "source": "/srv/data",
            "destination": "/mnt/backup",
            "type": "incremental",
            "schedule": "0 2 * * *",
            "enabled": true,
            "retention": 14,
            "compression": true,
            "encryption": false,
            "status": "idle",
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T10:00:00Z"
        }"#;

        let job: BackupJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.backup_type, BackupType::Incremental);
        assert_eq!(job.status, JobStatus::Idle);
        assert!(job.last_run.is_none());

        let req = BackupJobRequest::from(&job);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["type"], "incremental");
        assert_eq!(body["retention"], 14);
    }

    #[test]
    fn test_task_execution_statuses() {
        let json = r#"{
            "id": 9,
            "taskId": 2,
            "startedAt": "2024-03-01T10:00:00Z",
            "duration": 1500,
            "status": "timeout",
            "triggeredBy": "manual"
        }"#;
        let exec: TaskExecution = serde_json::from_str(json).unwrap();
        assert_eq!(exec.status, JobStatus::Timeout);
        assert!(exec.completed_at.is_none());

        let exec: TaskExecution = serde_json::from_str(
            r#"{"id":1,"taskId":1,"startedAt":"2024-03-01T10:00:00Z","status":"queued"}"#,
        )
        .unwrap();
        assert_eq!(exec.status, JobStatus::Unknown);
    }

    #[test]
    fn test_cron_validation() {
        let invalid: CronValidation =
            serde_json::from_str(r#"{"valid":false,"error":"expected 5 fields"}"#).unwrap();
        assert!(!invalid.valid);
        assert!(invalid.next_runs.is_empty());

        let valid: CronValidation = serde_json::from_str(
            r#"{"valid":true,"nextRuns":["2024-03-02 02:00:00","2024-03-03 02:00:00"]}"#,
        )
        .unwrap();
        assert_eq!(valid.next_runs.len(), 2);
    }

    #[test]
    fn test_task_request_defaults() {
        let req = TaskRequest::default();
        assert_eq!(req.task_type, "custom");
        assert_eq!(req.timeout_seconds, 300);
        assert!(req.enabled);
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("config").is_none());
        assert_eq!(json["cronExpression"], "");
    }

    #[test]
    fn test_task_page_with_null_list() {
        let page: TaskPage =
            serde_json::from_str(r#"{"tasks":null,"total":0,"offset":0,"limit":50}"#).unwrap();
        assert!(page.tasks.is_empty());
        assert_eq!(page.limit, 50);
    }

    #[test]
    fn test_backup_type_parse() {
        assert_eq!("diff".parse::<BackupType>().unwrap(), BackupType::Differential);
        assert!("mirror".parse::<BackupType>().is_err());
    }
}
