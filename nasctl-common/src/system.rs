//! Host information, network, UPS, VPN, Active Directory and monitoring

use crate::de::null_as_default;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Basic host information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub hostname: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub cpu_cores: u32,
    /// Seconds
    #[serde(default)]
    pub uptime: u64,
    /// Unix timestamp
    #[serde(default)]
    pub boot_time: u64,
}

/// Live network interface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,
    #[serde(default)]
    pub hardware_addr: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ip_addresses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ipv6_addresses: Vec<String>,
    #[serde(default)]
    pub mtu: u32,
    /// up, down
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub speed: String,
    #[serde(default)]
    pub duplex: String,
    /// ethernet, wireless, bridge, bond
    #[serde(default, rename = "type")]
    pub interface_type: String,
    #[serde(default)]
    pub master: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slaves: Vec<String>,
}

impl NetworkInterface {
    pub fn is_up(&self) -> bool {
        self.state.eq_ignore_ascii_case("up")
    }
}

/// Resolver configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DnsConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nameservers: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub search: Vec<String>,
    #[serde(default)]
    pub domain: String,
}

/// NUT connection and shutdown policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsConfig {
    #[serde(default)]
    pub enabled: bool,
    pub ups_name: String,
    pub ups_host: String,
    pub ups_port: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ups_username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ups_password: String,
    /// Seconds
    #[serde(default)]
    pub poll_interval: u32,
    #[serde(default)]
    pub low_battery_shutdown: bool,
    /// Battery percent
    #[serde(default)]
    pub low_battery_threshold: u8,
    /// Seconds
    #[serde(default)]
    pub shutdown_delay: u32,
    #[serde(default)]
    pub shutdown_command: String,
    #[serde(default)]
    pub notify_on_power_loss: bool,
    #[serde(default)]
    pub notify_on_battery_low: bool,
    #[serde(default)]
    pub notify_on_power_restored: bool,
}

impl Default for UpsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ups_name: "ups".to_string(),
            ups_host: "localhost".to_string(),
            ups_port: 3493,
            ups_username: String::new(),
            ups_password: String::new(),
            poll_interval: 30,
            low_battery_shutdown: true,
            low_battery_threshold: 20,
            shutdown_delay: 120,
            shutdown_command: "shutdown -h now".to_string(),
            notify_on_power_loss: true,
            notify_on_battery_low: true,
            notify_on_power_restored: true,
        }
    }
}

/// Live UPS readings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsStatus {
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub battery_charge: u8,
    /// Estimated runtime in seconds
    #[serde(default)]
    pub runtime: u64,
    #[serde(default)]
    pub load_percent: u8,
    #[serde(default)]
    pub input_voltage: f64,
    #[serde(default)]
    pub output_voltage: f64,
    #[serde(default)]
    pub temperature: f64,
    /// NUT status flags: OL, OB, LB, ...
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub serial: String,
    pub last_update: Option<DateTime<Utc>>,
}

impl UpsStatus {
    pub fn on_battery(&self) -> bool {
        self.status.split_whitespace().any(|flag| flag == "OB")
    }
}

/// VPN protocols the backend can manage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VpnProtocol {
    Wireguard,
    Openvpn,
    Pptp,
    L2tp,
}

impl VpnProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wireguard => "wireguard",
            Self::Openvpn => "openvpn",
            Self::Pptp => "pptp",
            Self::L2tp => "l2tp",
        }
    }
}

impl fmt::Display for VpnProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VpnProtocol {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "wireguard" | "wg" => Ok(Self::Wireguard),
            "openvpn" => Ok(Self::Openvpn),
            "pptp" => Ok(Self::Pptp),
            "l2tp" => Ok(Self::L2tp),
            other => Err(crate::Error::Validation(format!("unknown VPN protocol: {}", other))),
        }
    }
}

/// Install and run state of one VPN protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VpnProtocolStatus {
    /// Kept as text so unknown protocols still decode
    pub protocol: String,
    #[serde(default)]
    pub installed: bool,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub connections: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// WireGuard peer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireGuardPeer {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub public_key: String,
    /// e.g. `10.8.0.2/32`
    pub allowed_ips: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    #[serde(default)]
    pub persistent_keepalive: u32,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bytes_received: u64,
    #[serde(default)]
    pub bytes_sent: u64,
    pub latest_handshake: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
}

/// Body of `POST /vpn/wireguard/peers`
#[derive(Debug, Clone, Serialize)]
pub struct CreatePeerRequest {
    pub name: String,
    pub allowed_ips: String,
}

/// Active Directory client settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub server: String,
    /// 389, or 636 for LDAPS
    #[serde(default)]
    pub port: u16,
    #[serde(default, rename = "baseDN")]
    pub base_dn: String,
    #[serde(default)]
    pub bind_user: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bind_password: String,
    #[serde(default)]
    pub user_filter: String,
    #[serde(default)]
    pub group_filter: String,
    #[serde(default, rename = "useTLS")]
    pub use_tls: bool,
    #[serde(default)]
    pub skip_verify: bool,
}

/// Active Directory integration state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdStatus {
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub enabled: bool,
}

/// External monitoring integrations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub prometheus_enabled: bool,
    #[serde(default)]
    pub grafana_url: String,
    #[serde(default)]
    pub datadog_enabled: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub datadog_api_key: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            prometheus_enabled: true,
            grafana_url: "http://localhost:3000".to_string(),
            datadog_enabled: false,
            datadog_api_key: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_info() {
        let json = r#"{"hostname":"nas01","platform":"debian","os":"linux","architecture":"x86_64","cpuCores":8,"uptime":3600,"bootTime":1700000000}"#;
        let info: SystemInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.cpu_cores, 8);
        assert_eq!(info.uptime, 3600);
    }

    #[test]
    fn test_interface_with_null_lists() {
        let json = r#"{"name":"eth0","ip_addresses":null,"ipv6_addresses":null,"slaves":null,"state":"UP","type":"ethernet"}"#;
        let iface: NetworkInterface = serde_json::from_str(json).unwrap();
        assert!(iface.ip_addresses.is_empty());
        assert!(iface.is_up());
        assert_eq!(iface.interface_type, "ethernet");
    }

    #[test]
    fn test_ups_status_flags() {
        let json = r#"{"online":false,"battery_charge":64,"runtime":900,"status":"OB LB"}"#;
        let status: UpsStatus = serde_json::from_str(json).unwrap();
        assert!(status.on_battery());
        assert_eq!(status.battery_charge, 64);
    }

    #[test]
    fn test_ups_config_defaults() {
        let config = UpsConfig::default();
        assert_eq!(config.ups_port, 3493);
        assert_eq!(config.low_battery_threshold, 20);
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("ups_password").is_none());
    }

    #[test]
    fn test_ad_config_wire_names() {
        let config = AdConfig {
            base_dn: "dc=example,dc=com".to_string(),
            use_tls: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["baseDN"], "dc=example,dc=com");
        assert_eq!(json["useTLS"], true);
        assert_eq!(json["skipVerify"], false);
    }

    #[test]
    fn test_vpn_protocol_parse() {
        assert_eq!("wg".parse::<VpnProtocol>().unwrap(), VpnProtocol::Wireguard);
        assert_eq!(VpnProtocol::L2tp.to_string(), "l2tp");
        assert!("ipsec".parse::<VpnProtocol>().is_err());
    }

    #[test]
    fn test_vpn_status_list() {
        let json = r#"[{"protocol":"wireguard","installed":true,"enabled":true,"running":true,"connections":2},
                       {"protocol":"sstp","installed":false,"error":"not supported"}]"#;
        let statuses: Vec<VpnProtocolStatus> = serde_json::from_str(json).unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[1].error.as_deref(), Some("not supported"));
    }
}
