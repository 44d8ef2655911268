//! Samba share commands

use super::{require_item, submit, Context};
use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use nasctl_common::SambaShare;
use nasctl_console::resources::SambaShares;
use nasctl_console::{FormDialog, ListPanel, SambaDraft};
use std::sync::Arc;
use tabled::Tabled;

#[derive(Subcommand)]
pub enum SmbCommands {
    /// List Samba shares
    List,
    /// Show one share with its smb.conf section
    Show { name: String },
    /// Create a share
    Create {
        name: String,
        #[arg(short, long)]
        path: String,
        #[command(flatten)]
        flags: ShareFlags,
        /// Print the smb.conf section instead of creating
        #[arg(long)]
        dry_run: bool,
    },
    /// Edit a share
    Edit {
        name: String,
        #[arg(short, long)]
        path: Option<String>,
        #[command(flatten)]
        flags: ShareFlags,
        #[arg(long = "remove-user")]
        remove_users: Vec<String>,
        #[arg(long = "remove-group")]
        remove_groups: Vec<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete a share
    Delete { name: String },
    /// Show smbd service state
    Status,
    /// Restart smbd
    Restart,
}

/// Share settings shared by create and edit
#[derive(Args)]
pub struct ShareFlags {
    #[arg(long)]
    comment: Option<String>,
    /// Allowed user (repeatable)
    #[arg(short, long = "user")]
    users: Vec<String>,
    /// Allowed group, with or without @ (repeatable)
    #[arg(short, long = "group")]
    groups: Vec<String>,
    #[arg(long)]
    read_only: Option<bool>,
    #[arg(long)]
    browseable: Option<bool>,
    #[arg(long)]
    guest_ok: Option<bool>,
    #[arg(long)]
    recycle_bin: Option<bool>,
}

impl ShareFlags {
    fn apply(&self, draft: &mut SambaDraft) {
        if let Some(ref comment) = self.comment {
            draft.comment = comment.clone();
        }
        for user in &self.users {
            draft.add_user(user);
        }
        for group in &self.groups {
            draft.add_group(group);
        }
        if let Some(v) = self.read_only {
            draft.read_only = v;
        }
        if let Some(v) = self.browseable {
            draft.browseable = v;
        }
        if let Some(v) = self.guest_ok {
            draft.guest_ok = v;
        }
        if let Some(v) = self.recycle_bin {
            draft.recycle_bin = v;
        }
    }
}

#[derive(Tabled)]
struct ShareRow {
    name: String,
    path: String,
    comment: String,
    access: String,
    browseable: String,
    guest: String,
    valid_users: String,
}

impl From<&SambaShare> for ShareRow {
    fn from(share: &SambaShare) -> Self {
        Self {
            name: share.name.clone(),
            path: share.path.clone(),
            comment: output::truncate(share.comment.as_deref().unwrap_or("-"), 30),
            access: if share.read_only { "ro" } else { "rw" }.to_string(),
            browseable: output::yes_no(share.browseable).to_string(),
            guest: output::yes_no(share.guest_ok).to_string(),
            valid_users: output::or_dash(&share.valid_user_entries().join(" ")),
        }
    }
}

pub async fn handle_smb_command(command: SmbCommands, ctx: &Context) -> Result<()> {
    let service = || SambaShares::new(ctx.api.syslib.clone());

    match command {
        SmbCommands::List => {
            let panel = ctx.mount(service()).await?;
            output::print_records::<_, ShareRow>(panel.items(), ctx.format)?;
        }

        SmbCommands::Show { name } => {
            let panel = ctx.mount(service()).await?;
            let share = require_item(&panel, &name)?;
            match ctx.format {
                OutputFormat::Table => print!("{}", share.smb_section()),
                format => output::print_single(share, format)?,
            }
        }

        SmbCommands::Create {
            name,
            path,
            flags,
            dry_run,
        } => {
            let mut draft = SambaDraft {
                name: name.clone(),
                path,
                ..Default::default()
            };
            flags.apply(&mut draft);

            if dry_run {
                return preview(&draft);
            }

            let service = Arc::new(service());
            let mut panel = ListPanel::new(service.clone());
            let mut dialog = FormDialog::new(service);
            dialog.open_create();
            *dialog.draft_mut() = draft;

            ctx.with_spinner("Creating share...", submit(&mut dialog, &mut panel))
                .await?;
            output::print_created("Samba share", &name);
        }

        SmbCommands::Edit {
            name,
            path,
            flags,
            remove_users,
            remove_groups,
            dry_run,
        } => {
            let mut panel = ctx.mount(service()).await?;
            let existing = require_item(&panel, &name)?.clone();

            let mut dialog = FormDialog::new(panel.service().clone());
            dialog.open_edit(&existing);
            {
                let draft = dialog.draft_mut();
                if let Some(path) = path {
                    draft.path = path;
                }
                flags.apply(draft);
                for user in &remove_users {
                    draft.remove_user(user);
                }
                for group in &remove_groups {
                    draft.remove_group(group);
                }
            }

            if dry_run {
                return preview(dialog.draft());
            }

            ctx.with_spinner("Updating share...", submit(&mut dialog, &mut panel))
                .await?;
            output::print_updated("Samba share", &name);
        }

        SmbCommands::Delete { name } => {
            if !ctx.confirm(&format!("Delete Samba share '{}'?", name))? {
                output::print_info("Deletion aborted");
                return Ok(());
            }

            let mut panel = ListPanel::new(Arc::new(service()));
            panel.delete(&name).await?;
            output::print_deleted("Samba share", &name);
        }

        SmbCommands::Status => {
            let status = ctx.api.syslib.samba_status().await?;
            match ctx.format {
                OutputFormat::Table => {
                    println!("Samba:");
                    println!("  Active: {}", output::yes_no(status.active));
                    println!("  Enabled: {}", output::yes_no(status.enabled));
                }
                format => output::print_single(&status, format)?,
            }
        }

        SmbCommands::Restart => {
            let mut panel = ListPanel::new(Arc::new(service()));
            ctx.with_spinner("Restarting Samba...", panel.restart_service())
                .await?;
            output::print_success("Samba restarted");
        }
    }

    Ok(())
}

fn preview(draft: &SambaDraft) -> Result<()> {
    if let Err(message) = draft.validate() {
        bail!(message);
    }
    print!("{}", draft.to_share().smb_section());
    Ok(())
}
