//! Backup job commands

use super::{require_item, submit, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Subcommand;
use nasctl_common::jobs::{BackupHistory, BackupJob, BackupJobRequest, BackupType};
use nasctl_console::resources::BackupJobs;
use nasctl_console::{FormDialog, ListPanel};
use std::sync::Arc;
use tabled::Tabled;

#[derive(Subcommand)]
pub enum BackupCommands {
    /// List backup jobs
    List,
    /// Show one job
    Show { id: String },
    /// Create a backup job
    Create {
        name: String,
        #[arg(short, long)]
        source: String,
        #[arg(short, long)]
        destination: String,
        /// full, incremental or differential
        #[arg(short = 't', long = "type", default_value = "full")]
        backup_type: BackupType,
        /// Cron expression
        #[arg(long, default_value = "")]
        schedule: String,
        /// Backups to keep
        #[arg(short, long, default_value_t = 7)]
        retention: u32,
        #[arg(long)]
        compress: bool,
        #[arg(long)]
        encrypt: bool,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Update a backup job
    Update {
        id: String,
        #[arg(long)]
        schedule: Option<String>,
        #[arg(short, long)]
        retention: Option<u32>,
        #[arg(long)]
        enabled: Option<bool>,
    },
    /// Delete a backup job
    Delete { id: String },
    /// Run a job now
    Run { id: String },
    /// Show backup history
    History,
}

#[derive(Tabled)]
struct JobRow {
    id: String,
    name: String,
    #[tabled(rename = "type")]
    backup_type: String,
    source: String,
    destination: String,
    schedule: String,
    enabled: String,
    status: String,
    last_run: String,
}

impl From<&BackupJob> for JobRow {
    fn from(job: &BackupJob) -> Self {
        Self {
            id: job.id.clone(),
            name: job.name.clone(),
            backup_type: job.backup_type.to_string(),
            source: output::truncate(&job.source, 30),
            destination: output::truncate(&job.destination, 30),
            schedule: output::or_dash(&job.schedule),
            enabled: output::yes_no(job.enabled).to_string(),
            status: job.status.to_string(),
            last_run: output::format_time(job.last_run.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct HistoryRow {
    job: String,
    started: String,
    duration: String,
    status: String,
    size: String,
    files: i64,
}

impl From<&BackupHistory> for HistoryRow {
    fn from(run: &BackupHistory) -> Self {
        Self {
            job: if run.job_name.is_empty() {
                run.job_id.clone()
            } else {
                run.job_name.clone()
            },
            started: output::format_time(Some(&run.start_time)),
            duration: output::format_duration(run.duration.max(0) as u64),
            status: run.status.to_string(),
            size: output::format_bytes(run.bytes_backup.max(0) as u64),
            files: run.files_backup,
        }
    }
}

pub async fn handle_backup_command(command: BackupCommands, ctx: &Context) -> Result<()> {
    let backup = &ctx.api.backup;
    let service = || BackupJobs::new(backup.clone());

    match command {
        BackupCommands::List => {
            let panel = ctx.mount(service()).await?;
            output::print_records::<_, JobRow>(panel.items(), ctx.format)?;
        }

        BackupCommands::Show { id } => {
            let job = backup.get_job(&id).await?;
            match ctx.format {
                OutputFormat::Table => {
                    println!("Backup Job:");
                    println!("  ID: {}", job.id);
                    println!("  Name: {}", job.name);
                    println!("  Type: {}", job.backup_type);
                    println!("  Source: {}", job.source);
                    println!("  Destination: {}", job.destination);
                    println!("  Schedule: {}", output::or_dash(&job.schedule));
                    println!("  Retention: {}", job.retention);
                    println!("  Compression: {}", output::yes_no(job.compression));
                    println!("  Encryption: {}", output::yes_no(job.encryption));
                    println!("  Status: {}", job.status);
                    println!("  Next run: {}", output::format_time(job.next_run.as_ref()));
                }
                format => output::print_single(&job, format)?,
            }
        }

        BackupCommands::Create {
            name,
            source,
            destination,
            backup_type,
            schedule,
            retention,
            compress,
            encrypt,
            description,
        } => {
            let service = Arc::new(service());
            let mut panel = ListPanel::new(service.clone());
            let mut dialog = FormDialog::new(service);
            dialog.open_create();
            *dialog.draft_mut() = BackupJobRequest {
                name: name.clone(),
                description,
                source,
                destination,
                backup_type,
                schedule,
                enabled: true,
                retention,
                compression: compress,
                encryption: encrypt,
            };

            submit(&mut dialog, &mut panel).await?;
            output::print_created("Backup job", &name);
        }

        BackupCommands::Update {
            id,
            schedule,
            retention,
            enabled,
        } => {
            let mut panel = ctx.mount(service()).await?;
            let existing = require_item(&panel, &id)?.clone();

            let mut dialog = FormDialog::new(panel.service().clone());
            dialog.open_edit(&existing);
            {
                let draft = dialog.draft_mut();
                if let Some(schedule) = schedule {
                    draft.schedule = schedule;
                }
                if let Some(retention) = retention {
                    draft.retention = retention;
                }
                if let Some(enabled) = enabled {
                    draft.enabled = enabled;
                }
            }

            submit(&mut dialog, &mut panel).await?;
            output::print_updated("Backup job", &existing.name);
        }

        BackupCommands::Delete { id } => {
            if !ctx.confirm(&format!("Delete backup job {}?", id))? {
                output::print_info("Deletion aborted");
                return Ok(());
            }
            let mut panel = ListPanel::new(Arc::new(service()));
            panel.delete(&id).await?;
            output::print_deleted("Backup job", &id);
        }

        BackupCommands::Run { id } => {
            let mut panel = ListPanel::new(Arc::new(service()));
            ctx.with_spinner("Starting backup...", panel.run_now(&id))
                .await?;
            output::print_success(&format!("Backup job {} started", id));
        }

        BackupCommands::History => {
            let history = ctx
                .with_spinner("Loading history...", backup.history())
                .await?;
            output::print_records::<_, HistoryRow>(&history, ctx.format)?;
        }
    }

    Ok(())
}
