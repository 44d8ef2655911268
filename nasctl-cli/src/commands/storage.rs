//! Disk, volume and managed share commands

use super::{require_item, split_list, submit, Context};
use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use nasctl_common::storage::{
    CreateShareRequest, CreateVolumeRequest, Disk, FormatDiskRequest, Share, ShareType, Volume,
    VolumeType,
};
use nasctl_console::loaders;
use nasctl_console::resources::{Disks, ManagedShares, Volumes};
use nasctl_console::{FormDialog, ListPanel};
use std::sync::Arc;
use tabled::Tabled;

#[derive(Subcommand)]
pub enum DiskCommands {
    /// List disks
    List,
    /// Show one disk with partitions
    Show { name: String },
    /// Capacity and health summary
    Stats,
    /// Set a disk's label
    Label { name: String, label: String },
    /// Format a disk
    Format {
        name: String,
        #[arg(short, long, default_value = "ext4")]
        filesystem: String,
        #[arg(short, long, default_value = "")]
        label: String,
        /// Format even if the disk holds partitions
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum VolumeCommands {
    /// List volumes
    List,
    /// Show one volume
    Show { id: String },
    /// Create a volume
    Create {
        name: String,
        /// single, raid0, raid1, raid5, raid6, raid10, lvm, zfs, btrfs
        #[arg(short = 't', long = "type")]
        volume_type: VolumeType,
        /// Member disks (comma separated)
        #[arg(short, long)]
        disks: String,
        #[arg(short, long, default_value = "ext4")]
        filesystem: String,
        #[arg(short, long)]
        mount_point: Option<String>,
    },
    /// Delete a volume
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ShareCommands {
    /// List managed shares
    List,
    /// Create a managed share
    Create {
        name: String,
        /// smb, nfs or ftp
        #[arg(short = 't', long = "type")]
        share_type: ShareType,
        #[arg(short, long)]
        path: Option<String>,
        #[arg(long)]
        volume: Option<String>,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(long)]
        read_only: bool,
        #[arg(long)]
        guest_ok: bool,
        /// Allowed users (comma separated)
        #[arg(short, long)]
        users: Option<String>,
    },
    /// Enable a share
    Enable { id: String },
    /// Disable a share
    Disable { id: String },
    /// Delete a share
    Delete { id: String },
}

#[derive(Tabled)]
struct DiskRow {
    name: String,
    model: String,
    #[tabled(rename = "type")]
    disk_type: String,
    size: String,
    status: String,
    temp: String,
    system: String,
}

impl From<&Disk> for DiskRow {
    fn from(disk: &Disk) -> Self {
        Self {
            name: disk.display_name().to_string(),
            model: output::or_dash(&disk.model),
            disk_type: format!("{:?}", disk.disk_type).to_lowercase(),
            size: output::format_bytes(disk.size),
            status: format!("{:?}", disk.status).to_lowercase(),
            temp: if disk.temperature > 0 {
                format!("{}°C", disk.temperature)
            } else {
                "-".to_string()
            },
            system: output::yes_no(disk.is_system).to_string(),
        }
    }
}

#[derive(Tabled)]
struct VolumeRow {
    id: String,
    name: String,
    #[tabled(rename = "type")]
    volume_type: String,
    status: String,
    size: String,
    used: String,
    mount_point: String,
}

impl From<&Volume> for VolumeRow {
    fn from(vol: &Volume) -> Self {
        Self {
            id: vol.id.clone(),
            name: vol.name.clone(),
            volume_type: format!("{:?}", vol.volume_type).to_lowercase(),
            status: format!("{:?}", vol.status).to_lowercase(),
            size: output::format_bytes(vol.size),
            used: output::format_bytes(vol.used),
            mount_point: output::or_dash(&vol.mount_point),
        }
    }
}

#[derive(Tabled)]
struct ManagedShareRow {
    id: String,
    name: String,
    #[tabled(rename = "type")]
    share_type: String,
    path: String,
    enabled: String,
    access: String,
}

impl From<&Share> for ManagedShareRow {
    fn from(share: &Share) -> Self {
        Self {
            id: share.id.clone(),
            name: share.name.clone(),
            share_type: share.share_type.to_string(),
            path: share.path.clone(),
            enabled: output::yes_no(share.enabled).to_string(),
            access: if share.read_only { "ro" } else { "rw" }.to_string(),
        }
    }
}

pub async fn handle_disk_command(command: DiskCommands, ctx: &Context) -> Result<()> {
    let storage = &ctx.api.storage;

    match command {
        DiskCommands::List => {
            let panel = ctx.mount(Disks::new(storage.clone())).await?;
            output::print_records::<_, DiskRow>(panel.items(), ctx.format)?;
        }

        DiskCommands::Show { name } => {
            let disk = storage.get_disk(&name).await?;
            match ctx.format {
                OutputFormat::Table => {
                    println!("Disk:");
                    println!("  Name: {}", disk.name);
                    println!("  Path: {}", disk.path);
                    println!("  Label: {}", output::or_dash(&disk.label));
                    println!("  Model: {}", output::or_dash(&disk.model));
                    println!("  Serial: {}", output::or_dash(&disk.serial));
                    println!("  Size: {}", output::format_bytes(disk.size));
                    println!("  Status: {:?}", disk.status);
                    if let Some(ref smart) = disk.smart {
                        let health = if smart.healthy { "healthy".green() } else { "failing".red() };
                        println!("  SMART: {} ({}h powered on)", health, smart.power_on_hours);
                    }
                    if !disk.partitions.is_empty() {
                        println!("  Partitions:");
                        for part in &disk.partitions {
                            println!(
                                "    {} {} {} {}",
                                part.name,
                                output::format_bytes(part.size),
                                output::or_dash(&part.filesystem),
                                output::or_dash(&part.mount_point)
                            );
                        }
                    }
                }
                format => output::print_single(&disk, format)?,
            }
        }

        DiskCommands::Stats => {
            let stats = loaders::load_storage_stats(storage)
                .await
                .map_err(anyhow::Error::msg)?;
            match ctx.format {
                OutputFormat::Table => {
                    println!("Storage:");
                    println!(
                        "  Capacity: {} used of {} ({:.1}%)",
                        output::format_bytes(stats.used_capacity),
                        output::format_bytes(stats.total_capacity),
                        stats.used_percent()
                    );
                    println!(
                        "  Disks: {} ({} healthy, {} warning, {} critical)",
                        stats.total_disks, stats.healthy_disks, stats.warning_disks, stats.critical_disks
                    );
                    println!("  Volumes: {}", stats.total_volumes);
                    println!("  Shares: {}", stats.total_shares);
                }
                format => output::print_single(&stats, format)?,
            }
        }

        DiskCommands::Label { name, label } => {
            let mut panel = ListPanel::new(Arc::new(Disks::new(storage.clone())));
            panel.set_label(&name, &label).await?;
            output::print_success(&format!("Disk '{}' labelled '{}'", name, label));
        }

        DiskCommands::Format {
            name,
            filesystem,
            label,
            force,
        } => {
            if !ctx.confirm(&format!("Format {} as {}? All data will be lost.", name, filesystem))? {
                output::print_info("Format aborted");
                return Ok(());
            }
            let req = FormatDiskRequest {
                disk: name.clone(),
                filesystem,
                label,
                force,
            };
            ctx.with_spinner("Formatting...", storage.format_disk(&req))
                .await?;
            output::print_success(&format!("Disk '{}' formatted", name));
        }
    }

    Ok(())
}

pub async fn handle_volume_command(command: VolumeCommands, ctx: &Context) -> Result<()> {
    let storage = &ctx.api.storage;

    match command {
        VolumeCommands::List => {
            let panel = ctx.mount(Volumes::new(storage.clone())).await?;
            output::print_records::<_, VolumeRow>(panel.items(), ctx.format)?;
        }

        VolumeCommands::Show { id } => {
            let panel = ctx.mount(Volumes::new(storage.clone())).await?;
            let volume = require_item(&panel, &id)?;
            output::print_single(volume, ctx.format)?;
        }

        VolumeCommands::Create {
            name,
            volume_type,
            disks,
            filesystem,
            mount_point,
        } => {
            let disks = split_list(&disks);
            if disks.is_empty() {
                bail!("At least one disk is required");
            }
            let req = CreateVolumeRequest {
                name: name.clone(),
                volume_type,
                disks,
                filesystem,
                mount_point,
                raid_level: None,
            };
            let volume = ctx
                .with_spinner("Creating volume...", storage.create_volume(&req))
                .await?;
            output::print_created("Volume", &format!("{} ({})", volume.name, volume.id));
        }

        VolumeCommands::Delete { id } => {
            if !ctx.confirm(&format!("Delete volume {}?", id))? {
                output::print_info("Deletion aborted");
                return Ok(());
            }
            let mut panel = ListPanel::new(Arc::new(Volumes::new(storage.clone())));
            panel.delete(&id).await?;
            output::print_deleted("Volume", &id);
        }
    }

    Ok(())
}

pub async fn handle_share_command(command: ShareCommands, ctx: &Context) -> Result<()> {
    let service = || ManagedShares::new(ctx.api.storage.clone());

    match command {
        ShareCommands::List => {
            let panel = ctx.mount(service()).await?;
            output::print_records::<_, ManagedShareRow>(panel.items(), ctx.format)?;
        }

        ShareCommands::Create {
            name,
            share_type,
            path,
            volume,
            description,
            read_only,
            guest_ok,
            users,
        } => {
            let service = Arc::new(service());
            let mut panel = ListPanel::new(service.clone());
            let mut dialog = FormDialog::new(service);
            dialog.open_create();
            *dialog.draft_mut() = CreateShareRequest {
                name: name.clone(),
                volume_id: volume,
                path,
                share_type: Some(share_type),
                description,
                read_only,
                browseable: true,
                guest_ok,
                valid_users: users.as_deref().map(split_list).unwrap_or_default(),
                valid_groups: Vec::new(),
            };

            submit(&mut dialog, &mut panel).await?;
            output::print_created("Share", &name);
        }

        ShareCommands::Enable { id } => {
            let mut panel = ListPanel::new(Arc::new(service()));
            panel.set_enabled(&id, true).await?;
            output::print_success(&format!("Share {} enabled", id));
        }

        ShareCommands::Disable { id } => {
            let mut panel = ListPanel::new(Arc::new(service()));
            panel.set_enabled(&id, false).await?;
            output::print_success(&format!("Share {} disabled", id));
        }

        ShareCommands::Delete { id } => {
            if !ctx.confirm(&format!("Delete share {}?", id))? {
                output::print_info("Deletion aborted");
                return Ok(());
            }
            let mut panel = ListPanel::new(Arc::new(service()));
            panel.delete(&id).await?;
            output::print_deleted("Share", &id);
        }
    }

    Ok(())
}
