//! Disks, volumes and managed shares from the `/storage` API

use crate::de::null_as_default;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Physical disk type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiskType {
    Hdd,
    Ssd,
    Nvme,
    Usb,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Disk health status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiskStatus {
    Healthy,
    Warning,
    Critical,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for DiskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
            Self::Failed => write!(f, "failed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Physical disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disk {
    pub name: String, // e.g. "sda", "nvme0n1"
    pub path: String, // e.g. "/dev/sda"
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, rename = "type")]
    pub disk_type: DiskType,
    #[serde(default)]
    pub status: DiskStatus,
    #[serde(default)]
    pub temperature: i32,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub is_removable: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub partitions: Vec<Partition>,
    #[serde(default)]
    pub smart_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart: Option<SmartData>,
}

impl Disk {
    /// Label if the user set one, otherwise the kernel name
    pub fn display_name(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// Disk partition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partition {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub used: u64,
    #[serde(default)]
    pub filesystem: String,
    #[serde(default)]
    pub mount_point: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub is_mounted: bool,
}

/// Summary SMART data attached to a disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartData {
    pub healthy: bool,
    #[serde(default)]
    pub temperature: i32,
    #[serde(default)]
    pub power_on_hours: u64,
    #[serde(default)]
    pub power_cycle_count: u64,
    #[serde(default)]
    pub reallocated_sectors: u64,
    #[serde(default)]
    pub pending_sectors: u64,
    #[serde(default)]
    pub uncorrectable_errors: u64,
    #[serde(default)]
    pub crc_errors: u64,
    #[serde(default)]
    pub percent_life_used: i32, // SSDs only
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Volume layout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VolumeType {
    Single,
    Raid0,
    Raid1,
    Raid5,
    Raid6,
    Raid10,
    Lvm,
    Zfs,
    Btrfs,
}

impl std::str::FromStr for VolumeType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
            .map_err(|_| crate::Error::Validation(format!("unknown volume type: {}", s)))
    }
}

/// Volume status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VolumeStatus {
    Online,
    Degraded,
    Offline,
    Rebuilding,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Storage volume
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub volume_type: VolumeType,
    #[serde(default)]
    pub status: VolumeStatus,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub used: u64,
    #[serde(default)]
    pub available: u64,
    #[serde(default)]
    pub filesystem: String,
    #[serde(default)]
    pub mount_point: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raid_level: Option<String>,
    #[serde(default)]
    pub health: u8, // 0-100
    pub created_at: Option<DateTime<Utc>>,
}

/// Network protocol of a managed share
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShareType {
    Smb,
    Nfs,
    Ftp,
}

impl std::fmt::Display for ShareType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Smb => write!(f, "smb"),
            Self::Nfs => write!(f, "nfs"),
            Self::Ftp => write!(f, "ftp"),
        }
    }
}

impl std::str::FromStr for ShareType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "smb" | "samba" | "cifs" => Ok(Self::Smb),
            "nfs" => Ok(Self::Nfs),
            "ftp" => Ok(Self::Ftp),
            other => Err(crate::Error::Validation(format!("unknown share type: {}", other))),
        }
    }
}

/// Share managed by the storage service (database backed, keyed by id)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_id: Option<String>,
    #[serde(rename = "type")]
    pub share_type: ShareType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub browseable: bool,
    #[serde(default)]
    pub guest_ok: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub valid_users: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub valid_groups: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Aggregate storage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageStats {
    pub total_disks: u32,
    pub total_capacity: u64,
    pub used_capacity: u64,
    pub available_capacity: u64,
    pub total_volumes: u32,
    pub total_shares: u32,
    pub healthy_disks: u32,
    pub warning_disks: u32,
    pub critical_disks: u32,
}

impl StorageStats {
    /// Used capacity in percent, 0 when capacity is unknown
    pub fn used_percent(&self) -> f64 {
        if self.total_capacity == 0 {
            0.0
        } else {
            self.used_capacity as f64 / self.total_capacity as f64 * 100.0
        }
    }
}

/// Body of `POST /storage/volumes`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVolumeRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub volume_type: VolumeType,
    pub disks: Vec<String>,
    pub filesystem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raid_level: Option<String>,
}

/// Body of `POST /storage/shares` and `PUT /storage/shares/{id}`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub share_type: Option<ShareType>,
    pub description: String,
    pub read_only: bool,
    pub browseable: bool,
    pub guest_ok: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub valid_users: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub valid_groups: Vec<String>,
}

/// Body of `POST /storage/disks/format`
#[derive(Debug, Clone, Serialize)]
pub struct FormatDiskRequest {
    pub disk: String,
    pub filesystem: String,
    pub label: String,
    pub force: bool,
}

/// Body of `PUT /storage/disks/{name}/label`
#[derive(Debug, Clone, Serialize)]
pub struct DiskLabelRequest {
    pub label: String,
}
