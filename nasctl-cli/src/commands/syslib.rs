//! ZFS, RAID and SMART commands

use super::{require_item, split_list, Context};
use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use nasctl_common::syslib::{
    CreateRaidArrayRequest, CreateZfsPoolRequest, RaidArray, SmartAttribute, SmartTestType,
    ZfsDataset, ZfsPool, ZfsSnapshot, ZfsSnapshotRequest,
};
use nasctl_console::loaders;
use nasctl_console::resources::{RaidArrays, ZfsPools};
use nasctl_console::ListPanel;
use std::collections::HashMap;
use std::sync::Arc;
use tabled::Tabled;

#[derive(Subcommand)]
pub enum ZfsCommands {
    /// List pools
    List,
    /// Show one pool
    Show { name: String },
    /// Create a pool
    Create {
        name: String,
        /// stripe, mirror, raidz, raidz2, raidz3
        #[arg(short, long, default_value = "mirror")]
        raid_type: String,
        /// Member devices (comma separated)
        #[arg(short, long)]
        devices: String,
        /// Pool property as key=value (repeatable)
        #[arg(short, long = "option")]
        options: Vec<String>,
    },
    /// Destroy a pool
    Destroy { name: String },
    /// Start a scrub
    Scrub { name: String },
    /// List datasets of a pool
    Datasets { pool: String },
    /// List snapshots of a dataset
    Snapshots { dataset: String },
    /// Snapshot a dataset
    Snapshot {
        dataset: String,
        /// Snapshot name (the part after @)
        name: String,
    },
}

#[derive(Subcommand)]
pub enum RaidCommands {
    /// List md arrays
    List,
    /// Show one array with its member devices
    Show { name: String },
    /// Create an array
    Create {
        /// Array name, e.g. md0
        name: String,
        /// 0, 1, 5, 6 or 10
        #[arg(short, long)]
        level: String,
        /// Member devices (comma separated)
        #[arg(short, long)]
        devices: String,
        /// Spare devices (comma separated)
        #[arg(short, long)]
        spare: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SmartCommands {
    /// Show SMART data for a device
    Show {
        /// Device name, e.g. sda
        device: String,
        /// Include the attribute table
        #[arg(short, long)]
        attributes: bool,
    },
    /// Start a self-test
    Test {
        device: String,
        /// short, long or conveyance
        #[arg(short = 't', long = "type", default_value = "short")]
        test_type: SmartTestType,
    },
}

#[derive(Tabled)]
struct PoolRow {
    name: String,
    health: String,
    size: String,
    allocated: String,
    free: String,
    capacity: String,
    errors: u64,
}

impl From<&ZfsPool> for PoolRow {
    fn from(pool: &ZfsPool) -> Self {
        Self {
            name: pool.name.clone(),
            health: pool.health.clone(),
            size: output::format_bytes(pool.size),
            allocated: output::format_bytes(pool.allocated),
            free: output::format_bytes(pool.free),
            capacity: format!("{:.0}%", pool.capacity),
            errors: pool.error_count(),
        }
    }
}

#[derive(Tabled)]
struct DatasetRow {
    name: String,
    #[tabled(rename = "type")]
    dataset_type: String,
    used: String,
    available: String,
    mountpoint: String,
    compression: String,
}

impl From<&ZfsDataset> for DatasetRow {
    fn from(ds: &ZfsDataset) -> Self {
        Self {
            name: ds.name.clone(),
            dataset_type: ds.dataset_type.clone(),
            used: output::format_bytes(ds.used),
            available: output::format_bytes(ds.available),
            mountpoint: output::or_dash(&ds.mountpoint),
            compression: output::or_dash(&ds.compression),
        }
    }
}

#[derive(Tabled)]
struct SnapshotRow {
    name: String,
    used: String,
    refer: String,
    created: String,
}

impl From<&ZfsSnapshot> for SnapshotRow {
    fn from(snap: &ZfsSnapshot) -> Self {
        Self {
            name: snap.name.clone(),
            used: output::format_bytes(snap.used),
            refer: output::format_bytes(snap.refer),
            created: output::format_time(snap.created.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct ArrayRow {
    name: String,
    level: String,
    state: String,
    size: String,
    devices: String,
    failed: u32,
    spares: u32,
}

impl From<&RaidArray> for ArrayRow {
    fn from(array: &RaidArray) -> Self {
        Self {
            name: array.name.clone(),
            level: array.level.clone(),
            state: array.state.clone(),
            size: output::format_bytes(array.size),
            devices: format!("{}/{}", array.active_devices, array.total_devices),
            failed: array.failed_devices,
            spares: array.spare_devices,
        }
    }
}

#[derive(Tabled)]
struct AttributeRow {
    id: i32,
    name: String,
    value: i32,
    worst: i32,
    threshold: i32,
    raw: u64,
    status: String,
}

impl From<&SmartAttribute> for AttributeRow {
    fn from(attr: &SmartAttribute) -> Self {
        Self {
            id: attr.id,
            name: attr.name.clone(),
            value: attr.value,
            worst: attr.worst,
            threshold: attr.threshold,
            raw: attr.raw,
            status: output::or_dash(&attr.status),
        }
    }
}

/// Parse `key=value` pool properties
fn parse_properties(options: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for option in options {
        match option.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                map.insert(key.trim().to_string(), value.trim().to_string());
            }
            _ => bail!("Invalid pool option '{}', expected key=value", option),
        }
    }
    Ok(map)
}

pub async fn handle_zfs_command(command: ZfsCommands, ctx: &Context) -> Result<()> {
    let syslib = &ctx.api.syslib;

    match command {
        ZfsCommands::List => {
            let panel = ctx.mount(ZfsPools::new(syslib.clone())).await?;
            output::print_records::<_, PoolRow>(panel.items(), ctx.format)?;
        }

        ZfsCommands::Show { name } => {
            let pool = syslib.get_zfs_pool(&name).await?;
            match ctx.format {
                OutputFormat::Table => {
                    let health = if pool.is_healthy() {
                        pool.health.green()
                    } else {
                        pool.health.red()
                    };
                    println!("ZFS Pool:");
                    println!("  Name: {}", pool.name);
                    println!("  Health: {}", health);
                    println!("  Size: {}", output::format_bytes(pool.size));
                    println!("  Allocated: {}", output::format_bytes(pool.allocated));
                    println!("  Free: {}", output::format_bytes(pool.free));
                    println!("  Capacity: {:.1}%", pool.capacity);
                    println!("  Fragmentation: {:.1}%", pool.fragmentation);
                    println!("  Dedup ratio: {:.2}x", pool.dedup);
                    println!(
                        "  Errors: read {} / write {} / checksum {}",
                        pool.read_errors, pool.write_errors, pool.checksum_errors
                    );
                }
                format => output::print_single(&pool, format)?,
            }
        }

        ZfsCommands::Create {
            name,
            raid_type,
            devices,
            options,
        } => {
            let devices = split_list(&devices);
            if devices.is_empty() {
                bail!("At least one device is required");
            }
            let req = CreateZfsPoolRequest {
                name: name.clone(),
                raid_type,
                devices,
                options: parse_properties(&options)?,
            };
            ctx.with_spinner("Creating pool...", syslib.create_zfs_pool(&req))
                .await?;
            output::print_created("ZFS pool", &name);
        }

        ZfsCommands::Destroy { name } => {
            if !ctx.confirm(&format!("Destroy ZFS pool '{}' and all its data?", name))? {
                output::print_info("Destroy aborted");
                return Ok(());
            }
            let mut panel = ListPanel::new(Arc::new(ZfsPools::new(syslib.clone())));
            ctx.with_spinner("Destroying pool...", panel.destroy(&name))
                .await?;
            output::print_deleted("ZFS pool", &name);
        }

        ZfsCommands::Scrub { name } => {
            let mut panel = ListPanel::new(Arc::new(ZfsPools::new(syslib.clone())));
            panel.scrub(&name).await?;
            output::print_success(&format!("Scrub started on '{}'", name));
        }

        ZfsCommands::Datasets { pool } => {
            let datasets = syslib.list_zfs_datasets(&pool).await?;
            output::print_records::<_, DatasetRow>(&datasets, ctx.format)?;
        }

        ZfsCommands::Snapshots { dataset } => {
            let snapshots = syslib.list_zfs_snapshots(&dataset).await?;
            output::print_records::<_, SnapshotRow>(&snapshots, ctx.format)?;
        }

        ZfsCommands::Snapshot { dataset, name } => {
            let req = ZfsSnapshotRequest {
                dataset: dataset.clone(),
                snapshot: name.clone(),
            };
            syslib.create_zfs_snapshot(&req).await?;
            output::print_created("Snapshot", &format!("{}@{}", dataset, name));
        }
    }

    Ok(())
}

pub async fn handle_raid_command(command: RaidCommands, ctx: &Context) -> Result<()> {
    let syslib = &ctx.api.syslib;

    match command {
        RaidCommands::List => {
            let arrays = ctx
                .with_spinner("Loading arrays...", loaders::load_raid_arrays(syslib))
                .await
                .map_err(anyhow::Error::msg)?;
            output::print_records::<_, ArrayRow>(&arrays, ctx.format)?;
        }

        RaidCommands::Show { name } => {
            let panel = ctx.mount(RaidArrays::new(syslib.clone())).await?;
            let array = require_item(&panel, &name)?;
            match ctx.format {
                OutputFormat::Table => {
                    let state = if array.is_degraded() {
                        array.state.red()
                    } else {
                        array.state.green()
                    };
                    println!("RAID Array:");
                    println!("  Name: {}", array.name);
                    println!("  Device: {}", array.device);
                    println!("  Level: {}", array.level);
                    println!("  State: {}", state);
                    println!("  Size: {}", output::format_bytes(array.size));
                    println!("  UUID: {}", output::or_dash(&array.uuid));
                    println!("  Devices:");
                    for dev in &array.devices {
                        println!("    {} [{}] {} {}", dev.device, dev.number, dev.state, dev.role);
                    }
                }
                format => output::print_single(array, format)?,
            }
        }

        RaidCommands::Create {
            name,
            level,
            devices,
            spare,
        } => {
            let req = CreateRaidArrayRequest {
                name: name.clone(),
                level,
                devices: split_list(&devices),
                spare: spare.as_deref().map(split_list).unwrap_or_default(),
            };
            if req.devices.len() < 2 {
                bail!("A RAID array needs at least two devices");
            }
            ctx.with_spinner("Creating array...", syslib.create_raid_array(&req))
                .await?;
            output::print_created("RAID array", &name);
        }
    }

    Ok(())
}

pub async fn handle_smart_command(command: SmartCommands, ctx: &Context) -> Result<()> {
    let syslib = &ctx.api.syslib;

    match command {
        SmartCommands::Show { device, attributes } => {
            let info = loaders::load_smart(syslib, &device)
                .await
                .map_err(anyhow::Error::msg)?;
            match ctx.format {
                OutputFormat::Table => {
                    let status = if info.passed() {
                        info.smart_status.green()
                    } else {
                        info.smart_status.red()
                    };
                    println!("SMART: {}", info.device);
                    println!("  Model: {}", output::or_dash(&info.model));
                    println!("  Serial: {}", output::or_dash(&info.serial_number));
                    println!("  Firmware: {}", output::or_dash(&info.firmware));
                    println!("  Capacity: {}", output::format_bytes(info.capacity));
                    println!("  Status: {}", status);
                    println!("  Health score: {}", info.health_score);
                    println!("  Temperature: {}°C", info.temperature);
                    println!("  Power on: {}h ({} cycles)", info.power_on_hours, info.power_cycle_count);
                    println!(
                        "  Sectors: {} reallocated, {} pending, {} uncorrectable",
                        info.reallocated_sectors, info.pending_sectors, info.uncorrectable_errors
                    );
                    if attributes {
                        output::print_table(
                            info.attributes.iter().map(AttributeRow::from).collect(),
                        );
                    }
                }
                format => output::print_single(&info, format)?,
            }
        }

        SmartCommands::Test { device, test_type } => {
            syslib.run_smart_test(&device, test_type).await?;
            output::print_success(&format!("{} self-test started on {}", test_type, device));
        }
    }

    Ok(())
}
