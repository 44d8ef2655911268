//! Scheduled task commands

use super::{require_item, submit, Context};
use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use nasctl_common::jobs::{ScheduledTask, TaskExecution, TaskRequest};
use nasctl_console::resources::ScheduledTasks;
use nasctl_console::{FormDialog, ListPanel};
use std::sync::Arc;
use tabled::Tabled;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List scheduled tasks
    List {
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    /// Show one task
    Show { id: u64 },
    /// Create a task
    Create {
        name: String,
        /// Cron expression, e.g. "0 3 * * *"
        #[arg(short, long)]
        cron: String,
        /// cleanup, backup, maintenance or custom
        #[arg(short = 't', long = "type", default_value = "custom")]
        task_type: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Task-specific JSON
        #[arg(long, default_value = "")]
        config: String,
        #[arg(long, default_value_t = 300)]
        timeout: u32,
        #[arg(long)]
        disabled: bool,
    },
    /// Update a task
    Update {
        id: u64,
        #[arg(short, long)]
        cron: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        enabled: Option<bool>,
    },
    /// Delete a task
    Delete { id: u64 },
    /// Run a task now
    Run { id: u64 },
    /// Show a task's execution history
    History {
        id: u64,
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// Check a cron expression and show its next runs
    ValidateCron { expression: String },
}

#[derive(Tabled)]
struct TaskRow {
    id: u64,
    name: String,
    #[tabled(rename = "type")]
    task_type: String,
    schedule: String,
    enabled: String,
    last_run: String,
    last_status: String,
    runs: u64,
}

impl From<&ScheduledTask> for TaskRow {
    fn from(task: &ScheduledTask) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
            task_type: output::or_dash(&task.task_type),
            schedule: task.cron_expression.clone(),
            enabled: output::yes_no(task.enabled).to_string(),
            last_run: output::format_time(task.last_run.as_ref()),
            last_status: task
                .last_status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            runs: task.run_count,
        }
    }
}

#[derive(Tabled)]
struct ExecutionRow {
    id: u64,
    started: String,
    duration: String,
    status: String,
    trigger: String,
    error: String,
}

impl From<&TaskExecution> for ExecutionRow {
    fn from(exec: &TaskExecution) -> Self {
        Self {
            id: exec.id,
            started: output::format_time(Some(&exec.started_at)),
            duration: output::format_duration(exec.duration.max(0) as u64),
            status: exec.status.to_string(),
            trigger: output::or_dash(&exec.triggered_by),
            error: output::truncate(&output::or_dash(&exec.error), 40),
        }
    }
}

pub async fn handle_task_command(command: TaskCommands, ctx: &Context) -> Result<()> {
    let tasks = &ctx.api.tasks;
    let service = || ScheduledTasks::new(tasks.clone());

    match command {
        TaskCommands::List { offset, limit } => {
            let page = ctx
                .with_spinner("Loading tasks...", tasks.list_page(offset, limit))
                .await?;
            output::print_records::<_, TaskRow>(&page.tasks, ctx.format)?;
            if !ctx.format.is_machine() && page.total > page.tasks.len() as u64 {
                output::print_info(&format!(
                    "Showing {}-{} of {}",
                    page.offset as u64 + 1,
                    page.offset as u64 + page.tasks.len() as u64,
                    page.total
                ));
            }
        }

        TaskCommands::Show { id } => {
            let task = tasks.get(id).await?;
            match ctx.format {
                OutputFormat::Table => {
                    println!("Task:");
                    println!("  ID: {}", task.id);
                    println!("  Name: {}", task.name);
                    println!("  Description: {}", output::or_dash(&task.description));
                    println!("  Type: {}", task.task_type);
                    println!("  Schedule: {}", task.cron_expression);
                    println!("  Enabled: {}", output::yes_no(task.enabled));
                    println!("  Last run: {}", output::format_time(task.last_run.as_ref()));
                    println!("  Next run: {}", output::format_time(task.next_run.as_ref()));
                    println!("  Timeout: {}", output::format_duration(task.timeout_seconds as u64));
                    if !task.last_error.is_empty() {
                        println!("  Last error: {}", task.last_error.red());
                    }
                }
                format => output::print_single(&task, format)?,
            }
        }

        TaskCommands::Create {
            name,
            cron,
            task_type,
            description,
            config,
            timeout,
            disabled,
        } => {
            let service = Arc::new(service());
            let mut panel = ListPanel::new(service.clone());
            let mut dialog = FormDialog::new(service);
            dialog.open_create();
            *dialog.draft_mut() = TaskRequest {
                name: name.clone(),
                description,
                task_type,
                cron_expression: cron,
                enabled: !disabled,
                config,
                timeout_seconds: timeout,
                ..Default::default()
            };

            submit(&mut dialog, &mut panel).await?;
            output::print_created("Task", &name);
        }

        TaskCommands::Update {
            id,
            cron,
            description,
            enabled,
        } => {
            let mut panel = ctx.mount(service()).await?;
            let existing = require_item(&panel, &id)?.clone();

            let mut dialog = FormDialog::new(panel.service().clone());
            dialog.open_edit(&existing);
            {
                let draft = dialog.draft_mut();
                if let Some(cron) = cron {
                    draft.cron_expression = cron;
                }
                if let Some(description) = description {
                    draft.description = description;
                }
                if let Some(enabled) = enabled {
                    draft.enabled = enabled;
                }
            }

            submit(&mut dialog, &mut panel).await?;
            output::print_updated("Task", &existing.name);
        }

        TaskCommands::Delete { id } => {
            if !ctx.confirm(&format!("Delete task {}?", id))? {
                output::print_info("Deletion aborted");
                return Ok(());
            }
            let mut panel = ListPanel::new(Arc::new(service()));
            panel.delete(id).await?;
            output::print_deleted("Task", &id.to_string());
        }

        TaskCommands::Run { id } => {
            let mut panel = ListPanel::new(Arc::new(service()));
            panel.run_now(id).await?;
            output::print_success(&format!("Task {} started", id));
        }

        TaskCommands::History { id, limit } => {
            let page = tasks.executions(id, limit).await?;
            output::print_records::<_, ExecutionRow>(&page.executions, ctx.format)?;
        }

        TaskCommands::ValidateCron { expression } => {
            let result = tasks.validate_cron(&expression).await?;
            if ctx.format.is_machine() {
                output::print_single(&result, ctx.format)?;
                return Ok(());
            }
            if !result.valid {
                bail!(result
                    .error
                    .unwrap_or_else(|| format!("Invalid cron expression '{}'", expression)));
            }
            output::print_success(&format!("'{}' is valid", expression));
            for run in &result.next_runs {
                println!("  {}", run);
            }
        }
    }

    Ok(())
}
