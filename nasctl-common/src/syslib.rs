//! ZFS, RAID and SMART records from the `/syslib` API

use crate::de::null_as_default;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// ZFS pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZfsPool {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub allocated: u64,
    #[serde(default)]
    pub free: u64,
    /// Percent used
    #[serde(default)]
    pub capacity: f64,
    #[serde(default)]
    pub health: String, // ONLINE, DEGRADED, FAULTED, ...
    #[serde(default)]
    pub dedup: f64,
    #[serde(default)]
    pub fragmentation: f64,
    #[serde(default)]
    pub read_errors: u64,
    #[serde(default)]
    pub write_errors: u64,
    #[serde(default)]
    pub checksum_errors: u64,
}

impl ZfsPool {
    pub fn is_healthy(&self) -> bool {
        self.health.eq_ignore_ascii_case("ONLINE")
    }

    pub fn error_count(&self) -> u64 {
        self.read_errors + self.write_errors + self.checksum_errors
    }
}

/// ZFS dataset (filesystem or volume)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZfsDataset {
    pub name: String,
    #[serde(default, rename = "type")]
    pub dataset_type: String,
    #[serde(default)]
    pub used: u64,
    #[serde(default)]
    pub available: u64,
    #[serde(default)]
    pub refer: u64,
    #[serde(default)]
    pub mountpoint: String,
    #[serde(default)]
    pub compression: String,
    #[serde(default)]
    pub dedup: String,
    #[serde(default)]
    pub quota: u64,
    #[serde(default)]
    pub reservation: u64,
}

/// ZFS snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZfsSnapshot {
    pub name: String,
    #[serde(default)]
    pub dataset: String,
    #[serde(default)]
    pub used: u64,
    #[serde(default)]
    pub refer: u64,
    pub created: Option<DateTime<Utc>>,
}

/// Body of `POST /syslib/zfs/pools`
#[derive(Debug, Clone, Serialize)]
pub struct CreateZfsPoolRequest {
    pub name: String,
    /// `mirror`, `raidz`, `raidz2`, `raidz3`, or empty for a stripe
    pub raid_type: String,
    pub devices: Vec<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub options: HashMap<String, String>,
}

/// Body of `POST /syslib/zfs/snapshots`
#[derive(Debug, Clone, Serialize)]
pub struct ZfsSnapshotRequest {
    pub dataset: String,
    pub snapshot: String,
}

/// Software RAID array (mdadm)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaidArray {
    pub device: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: String,
    /// clean, active, degraded, recovering
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub used_devices: u32,
    #[serde(default)]
    pub total_devices: u32,
    #[serde(default)]
    pub active_devices: u32,
    #[serde(default)]
    pub working_devices: u32,
    #[serde(default)]
    pub failed_devices: u32,
    #[serde(default)]
    pub spare_devices: u32,
    #[serde(default)]
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub devices: Vec<RaidDevice>,
}

impl RaidArray {
    pub fn is_degraded(&self) -> bool {
        self.failed_devices > 0 || self.state.contains("degraded")
    }
}

/// Member device of a RAID array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaidDevice {
    pub device: String,
    #[serde(default)]
    pub number: i32,
    /// active, faulty, spare
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub role: String,
}

/// Body of `POST /syslib/raid/arrays`
#[derive(Debug, Clone, Serialize)]
pub struct CreateRaidArrayRequest {
    pub name: String,
    /// `0`, `1`, `5`, `6` or `10`
    pub level: String,
    pub devices: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub spare: Vec<String>,
}

/// Full SMART report for one device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartInfo {
    pub device: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub firmware: String,
    #[serde(default)]
    pub capacity: u64,
    #[serde(default)]
    pub sector_size: u64,
    #[serde(default)]
    pub rotation_rate: String,
    #[serde(default)]
    pub form_factor: String,
    #[serde(default)]
    pub smart_supported: bool,
    #[serde(default)]
    pub smart_enabled: bool,
    /// PASSED or FAILED
    #[serde(default)]
    pub smart_status: String,
    #[serde(default, rename = "temperature_celsius")]
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
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Vec<SmartAttribute>,
    /// 0-100
    #[serde(default)]
    pub health_score: i32,
}

impl SmartInfo {
    pub fn passed(&self) -> bool {
        self.smart_status.eq_ignore_ascii_case("PASSED")
    }
}

/// One row of the SMART attribute table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartAttribute {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub value: i32,
    #[serde(default)]
    pub worst: i32,
    #[serde(default)]
    pub threshold: i32,
    #[serde(default)]
    pub raw: u64,
    /// OK, WARN, FAIL
    #[serde(default)]
    pub status: String,
}

/// SMART self-test kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmartTestType {
    #[default]
    Short,
    Long,
    Conveyance,
}

impl SmartTestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
            Self::Conveyance => "conveyance",
        }
    }
}

impl fmt::Display for SmartTestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SmartTestType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "long" | "extended" => Ok(Self::Long),
            "conveyance" => Ok(Self::Conveyance),
            other => Err(crate::Error::Validation(format!("unknown SMART test type: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raid_array_from_backend_json() {
        let json = r#"{
            "device": "/dev/md0",
            "name": "md0",
            "level": "raid5",
            "state": "clean, degraded",
            "size": 8000000000000,
            "total_devices": 4,
            "active_devices": 3,
            "failed_devices": 1,
            "devices": null
        }"#;

        let array: RaidArray = serde_json::from_str(json).unwrap();
        assert_eq!(array.level, "raid5");
        assert!(array.devices.is_empty());
        assert!(array.is_degraded());
    }

    #[test]
    fn test_zfs_pool_health() {
        let json = r#"{"name":"tank","size":100,"allocated":40,"free":60,"capacity":40,"health":"ONLINE","read_errors":1}"#;
        let pool: ZfsPool = serde_json::from_str(json).unwrap();
        assert!(pool.is_healthy());
        assert_eq!(pool.error_count(), 1);
    }

    #[test]
    fn test_smart_info_temperature_field() {
        let json = r#"{"device":"/dev/sda","smart_status":"PASSED","temperature_celsius":38,"attributes":null}"#;
        let info: SmartInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.temperature, 38);
        assert!(info.passed());
        assert!(info.attributes.is_empty());
    }

    #[test]
    fn test_smart_test_type_parse() {
        assert_eq!("LONG".parse::<SmartTestType>().unwrap(), SmartTestType::Long);
        assert_eq!("extended".parse::<SmartTestType>().unwrap(), SmartTestType::Long);
        assert!("offline".parse::<SmartTestType>().is_err());
        assert_eq!(SmartTestType::Conveyance.to_string(), "conveyance");
    }

    #[test]
    fn test_create_pool_request_skips_empty_options() {
        let req = CreateZfsPoolRequest {
            name: "tank".to_string(),
            raid_type: "mirror".to_string(),
            devices: vec!["/dev/sdb".to_string(), "/dev/sdc".to_string()],
            options: HashMap::new(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["raid_type"], "mirror");
        assert!(json.get("options").is_none());
    }
}
