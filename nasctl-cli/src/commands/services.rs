//! VPN and UPS commands

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use nasctl_common::system::{CreatePeerRequest, VpnProtocol, VpnProtocolStatus, WireGuardPeer};
use tabled::Tabled;

#[derive(Subcommand)]
pub enum VpnCommands {
    /// Show every protocol's state
    Status,
    /// Install a protocol
    Install { protocol: VpnProtocol },
    /// Enable a protocol
    Enable { protocol: VpnProtocol },
    /// Disable a protocol
    Disable { protocol: VpnProtocol },
    /// List WireGuard peers
    Peers,
    /// Add a WireGuard peer
    AddPeer {
        name: String,
        /// e.g. 10.8.0.2/32
        #[arg(short, long)]
        allowed_ips: String,
    },
    /// Remove a WireGuard peer
    RemovePeer { id: String },
}

#[derive(Subcommand)]
pub enum UpsCommands {
    /// Live readings
    Status,
    /// Show NUT settings
    Config,
    /// Change NUT settings
    Configure {
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        name: Option<String>,
        /// Shut down below this battery percent
        #[arg(long)]
        threshold: Option<u8>,
        /// Seconds to wait before shutdown
        #[arg(long)]
        shutdown_delay: Option<u32>,
    },
}

#[derive(Tabled)]
struct ProtocolRow {
    protocol: String,
    installed: String,
    enabled: String,
    running: String,
    connections: u32,
    error: String,
}

impl From<&VpnProtocolStatus> for ProtocolRow {
    fn from(status: &VpnProtocolStatus) -> Self {
        Self {
            protocol: status.protocol.clone(),
            installed: output::yes_no(status.installed).to_string(),
            enabled: output::yes_no(status.enabled).to_string(),
            running: output::yes_no(status.running).to_string(),
            connections: status.connections,
            error: output::or_dash(status.error.as_deref().unwrap_or("")),
        }
    }
}

#[derive(Tabled)]
struct PeerRow {
    id: String,
    name: String,
    allowed_ips: String,
    endpoint: String,
    enabled: String,
    received: String,
    sent: String,
    handshake: String,
}

impl From<&WireGuardPeer> for PeerRow {
    fn from(peer: &WireGuardPeer) -> Self {
        Self {
            id: peer.id.clone(),
            name: peer.name.clone(),
            allowed_ips: peer.allowed_ips.clone(),
            endpoint: output::or_dash(&peer.endpoint),
            enabled: output::yes_no(peer.enabled).to_string(),
            received: output::format_bytes(peer.bytes_received),
            sent: output::format_bytes(peer.bytes_sent),
            handshake: output::format_time(peer.latest_handshake.as_ref()),
        }
    }
}

pub async fn handle_vpn_command(command: VpnCommands, ctx: &Context) -> Result<()> {
    let vpn = &ctx.api.vpn;

    match command {
        VpnCommands::Status => {
            let statuses = ctx.with_spinner("Loading VPN status...", vpn.status()).await?;
            output::print_records::<_, ProtocolRow>(&statuses, ctx.format)?;
        }

        VpnCommands::Install { protocol } => {
            ctx.with_spinner(&format!("Installing {}...", protocol), vpn.install(protocol))
                .await?;
            output::print_success(&format!("{} installed", protocol));
        }

        VpnCommands::Enable { protocol } => {
            vpn.enable(protocol).await?;
            output::print_success(&format!("{} enabled", protocol));
        }

        VpnCommands::Disable { protocol } => {
            vpn.disable(protocol).await?;
            output::print_success(&format!("{} disabled", protocol));
        }

        VpnCommands::Peers => {
            let peers = vpn.list_peers().await?;
            output::print_records::<_, PeerRow>(&peers, ctx.format)?;
        }

        VpnCommands::AddPeer { name, allowed_ips } => {
            let peer = vpn
                .create_peer(&CreatePeerRequest { name, allowed_ips })
                .await?;
            match ctx.format {
                OutputFormat::Table => {
                    output::print_created("Peer", &peer.name);
                    println!("  ID: {}", peer.id);
                    println!("  Public key: {}", peer.public_key);
                    println!("  Allowed IPs: {}", peer.allowed_ips);
                }
                format => output::print_single(&peer, format)?,
            }
        }

        VpnCommands::RemovePeer { id } => {
            if !ctx.confirm(&format!("Remove WireGuard peer {}?", id))? {
                output::print_info("Removal aborted");
                return Ok(());
            }
            vpn.delete_peer(&id).await?;
            output::print_deleted("Peer", &id);
        }
    }

    Ok(())
}

pub async fn handle_ups_command(command: UpsCommands, ctx: &Context) -> Result<()> {
    let ups = &ctx.api.ups;

    match command {
        UpsCommands::Status => {
            let status = ups.status().await?;
            match ctx.format {
                OutputFormat::Table => {
                    let power = if status.on_battery() {
                        "on battery".yellow()
                    } else if status.online {
                        "online".green()
                    } else {
                        "offline".red()
                    };
                    println!("UPS:");
                    println!("  Model: {} {}", status.manufacturer, status.model);
                    println!("  Power: {} ({})", power, output::or_dash(&status.status));
                    println!("  Battery: {}%", status.battery_charge);
                    println!("  Runtime: {}", output::format_duration(status.runtime));
                    println!("  Load: {}%", status.load_percent);
                    println!(
                        "  Voltage: {:.1} V in / {:.1} V out",
                        status.input_voltage, status.output_voltage
                    );
                }
                format => output::print_single(&status, format)?,
            }
        }

        UpsCommands::Config => {
            let config = ups.config().await?;
            output::print_single(&config, ctx.format)?;
        }

        UpsCommands::Configure {
            enabled,
            host,
            port,
            name,
            threshold,
            shutdown_delay,
        } => {
            let mut config = ups.config().await?;
            if let Some(enabled) = enabled {
                config.enabled = enabled;
            }
            if let Some(host) = host {
                config.ups_host = host;
            }
            if let Some(port) = port {
                config.ups_port = port;
            }
            if let Some(name) = name {
                config.ups_name = name;
            }
            if let Some(threshold) = threshold {
                config.low_battery_threshold = threshold.min(100);
            }
            if let Some(delay) = shutdown_delay {
                config.shutdown_delay = delay;
            }
            ups.update_config(&config).await?;
            output::print_success("UPS configuration saved");
        }
    }

    Ok(())
}
