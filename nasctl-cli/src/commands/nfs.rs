//! NFS export commands

use super::{require_item, submit, Context};
use crate::output::{self, OutputFormat};
use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use nasctl_common::{check_token, ExportOptions, NfsExport, EXCLUSION_GROUPS};
use nasctl_console::resources::NfsExports;
use nasctl_console::{FormDialog, FormMode, ListPanel, NfsDraft};
use std::sync::Arc;
use tabled::Tabled;

#[derive(Subcommand)]
pub enum NfsCommands {
    /// List NFS exports
    List,
    /// Show one export
    Show { path: String },
    /// Create an export
    Create {
        /// Exported directory
        path: String,
        /// Allowed client: IP, CIDR, hostname or * (repeatable)
        #[arg(short, long = "client", required = true)]
        clients: Vec<String>,
        /// Replace the default options (comma separated)
        #[arg(long)]
        options: Option<ExportOptions>,
        /// Toggle an option on top of the defaults (repeatable)
        #[arg(short = 't', long = "toggle", value_parser = option_token)]
        toggles: Vec<String>,
        /// Print the /etc/exports line instead of creating
        #[arg(long)]
        dry_run: bool,
    },
    /// Edit an export. The backend replaces it wholesale.
    Edit {
        path: String,
        #[arg(long = "add-client")]
        add_clients: Vec<String>,
        #[arg(long = "remove-client")]
        remove_clients: Vec<String>,
        /// Toggle an option (repeatable)
        #[arg(short = 't', long = "toggle", value_parser = option_token)]
        toggles: Vec<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete an export
    Delete { path: String },
    /// Restart the NFS server
    Restart,
    /// Show the mutually exclusive option groups
    Options,
}

#[derive(Tabled)]
struct ExportRow {
    path: String,
    clients: String,
    options: String,
    access: String,
}

impl From<&NfsExport> for ExportRow {
    fn from(export: &NfsExport) -> Self {
        Self {
            path: export.path.clone(),
            clients: output::or_dash(&export.clients.join(", ")),
            options: output::or_dash(&export.options.to_string()),
            access: if export.read_only() { "ro" } else { "rw" }.to_string(),
        }
    }
}

#[derive(Tabled)]
struct GroupRow {
    group: usize,
    options: String,
}

pub async fn handle_nfs_command(command: NfsCommands, ctx: &Context) -> Result<()> {
    let service = || NfsExports::new(ctx.api.syslib.clone());

    match command {
        NfsCommands::List => {
            let panel = ctx.mount(service()).await?;
            output::print_records::<_, ExportRow>(panel.items(), ctx.format)?;
        }

        NfsCommands::Show { path } => {
            let panel = ctx.mount(service()).await?;
            let export = require_item(&panel, &path)?;
            match ctx.format {
                OutputFormat::Table => {
                    println!("NFS Export:");
                    println!("  Path: {}", export.path);
                    println!("  Clients: {}", output::or_dash(&export.clients.join(", ")));
                    println!("  Options: {}", export.options);
                    println!("  Line: {}", export.export_line());
                }
                format => output::print_single(export, format)?,
            }
        }

        NfsCommands::Create {
            path,
            clients,
            options,
            toggles,
            dry_run,
        } => {
            let mut draft = NfsDraft {
                path,
                ..Default::default()
            };
            if let Some(options) = options {
                draft.options = options;
            }
            for client in &clients {
                draft.add_client(client);
            }
            for option in &toggles {
                draft.toggle_option(option).map_err(|e| anyhow!(e))?;
            }

            if dry_run {
                preview(&draft)?;
                return Ok(());
            }

            let path = draft.path.clone();
            let service = Arc::new(service());
            let mut panel = ListPanel::new(service.clone());
            let mut dialog = FormDialog::new(service);
            dialog.open_create();
            *dialog.draft_mut() = draft;

            ctx.with_spinner("Creating export...", submit(&mut dialog, &mut panel))
                .await?;
            output::print_created("NFS export", &path);
        }

        NfsCommands::Edit {
            path,
            add_clients,
            remove_clients,
            toggles,
            dry_run,
        } => {
            let mut panel = ctx.mount(service()).await?;
            let existing = require_item(&panel, &path)?.clone();

            let mut dialog = FormDialog::new(panel.service().clone());
            dialog.open_edit(&existing);
            {
                let draft = dialog.draft_mut();
                for client in &add_clients {
                    draft.add_client(client);
                }
                for client in &remove_clients {
                    if !draft.remove_client(client) {
                        output::print_warning(&format!("'{}' is not a client of {}", client, path));
                    }
                }
                for option in &toggles {
                    draft.toggle_option(option).map_err(|e| anyhow!(e))?;
                }
            }

            if dry_run {
                preview(dialog.draft())?;
                return Ok(());
            }

            let result = ctx
                .with_spinner("Replacing export...", submit(&mut dialog, &mut panel))
                .await;
            if result.is_err() && dialog.mode() == Some(&FormMode::Create) {
                let export = dialog.draft().to_export();
                output::print_warning(&format!(
                    "{} was removed but not re-created. Restore it with: nasctl nfs create {} {} --options {}",
                    path,
                    export.path,
                    export
                        .clients
                        .iter()
                        .map(|c| format!("-c {}", c))
                        .collect::<Vec<_>>()
                        .join(" "),
                    export.options
                ));
            }
            result?;
            output::print_updated("NFS export", &path);
        }

        NfsCommands::Delete { path } => {
            if !ctx.confirm(&format!("Delete NFS export {}?", path))? {
                output::print_info("Deletion aborted");
                return Ok(());
            }

            let mut panel = ListPanel::new(Arc::new(service()));
            panel.delete(&path).await?;
            output::print_deleted("NFS export", &path);
        }

        NfsCommands::Restart => {
            let mut panel = ListPanel::new(Arc::new(service()));
            ctx.with_spinner("Restarting NFS server...", panel.restart_service())
                .await?;
            output::print_success("NFS server restarted");
        }

        NfsCommands::Options => {
            let rows: Vec<GroupRow> = EXCLUSION_GROUPS
                .iter()
                .enumerate()
                .map(|(i, group)| GroupRow {
                    group: i + 1,
                    options: group.join(" | "),
                })
                .collect();
            match ctx.format {
                OutputFormat::Table => output::print_table(rows),
                format => output::print_single(&EXCLUSION_GROUPS, format)?,
            }
        }
    }

    Ok(())
}

/// One option per `--toggle`, checked before anything is sent
fn option_token(value: &str) -> std::result::Result<String, String> {
    check_token(value)
        .map(str::to_string)
        .map_err(|e| format!("{} (pass one option per --toggle)", e))
}

fn preview(draft: &NfsDraft) -> Result<()> {
    if let Err(message) = draft.validate() {
        bail!(message);
    }
    println!("{}", draft.to_export().export_line());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_token() {
        assert_eq!(option_token(" ro ").unwrap(), "ro");
        assert!(option_token("ro,async").is_err());
        assert!(option_token("rw(").is_err());
        assert!(option_token("").is_err());
    }

    #[test]
    fn test_preview_rejects_conflicting_options() {
        let draft = NfsDraft {
            path: "/srv/media".to_string(),
            clients: vec!["*".to_string()],
            options: ExportOptions::from(vec!["rw".to_string(), "ro x".to_string()]),
        };
        assert!(preview(&draft).is_err());
    }
}
