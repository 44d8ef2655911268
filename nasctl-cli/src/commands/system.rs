//! System, network, directory and monitoring commands

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Subcommand;
use nasctl_common::system::NetworkInterface;
use tabled::Tabled;

#[derive(Subcommand)]
pub enum SystemCommands {
    /// Host information
    Info,
    /// Backend version
    Version,
    /// Storage library health
    Health,
    /// Network interfaces
    Interfaces,
    /// DNS resolver settings
    Dns,
    /// Active Directory state
    AdStatus,
    /// Active Directory settings
    AdConfig,
    /// Test the Active Directory connection
    AdTest,
    /// Show monitoring integrations
    Monitoring,
    /// Change monitoring integrations
    ConfigureMonitoring {
        #[arg(long)]
        prometheus: Option<bool>,
        #[arg(long)]
        grafana_url: Option<String>,
        #[arg(long)]
        datadog: Option<bool>,
    },
}

#[derive(Tabled)]
struct InterfaceRow {
    name: String,
    state: String,
    addresses: String,
    mac: String,
    mtu: u32,
    speed: String,
}

impl From<&NetworkInterface> for InterfaceRow {
    fn from(iface: &NetworkInterface) -> Self {
        Self {
            name: iface.name.clone(),
            state: iface.state.clone(),
            addresses: output::or_dash(&iface.ip_addresses.join(", ")),
            mac: output::or_dash(&iface.hardware_addr),
            mtu: iface.mtu,
            speed: output::or_dash(&iface.speed),
        }
    }
}

pub async fn handle_system_command(command: SystemCommands, ctx: &Context) -> Result<()> {
    let api = &ctx.api;

    match command {
        SystemCommands::Info => {
            let info = api.system.info().await?;
            match ctx.format {
                OutputFormat::Table => {
                    println!("System:");
                    println!("  Hostname: {}", info.hostname);
                    println!("  OS: {} ({})", info.os, info.platform);
                    println!("  Architecture: {}", info.architecture);
                    println!("  CPU cores: {}", info.cpu_cores);
                    println!("  Uptime: {}", output::format_duration(info.uptime));
                }
                format => output::print_single(&info, format)?,
            }
        }

        SystemCommands::Version => {
            let version = api.system.version().await?;
            output::print_single(&version, ctx.format)?;
        }

        SystemCommands::Health => {
            let health = api.syslib.health().await?;
            output::print_single(&health, ctx.format)?;
        }

        SystemCommands::Interfaces => {
            let interfaces = api.network.interfaces().await?;
            output::print_records::<_, InterfaceRow>(&interfaces, ctx.format)?;
        }

        SystemCommands::Dns => {
            let dns = api.network.dns().await?;
            match ctx.format {
                OutputFormat::Table => {
                    println!("DNS:");
                    println!("  Nameservers: {}", output::or_dash(&dns.nameservers.join(", ")));
                    println!("  Search: {}", output::or_dash(&dns.search.join(" ")));
                    println!("  Domain: {}", output::or_dash(&dns.domain));
                }
                format => output::print_single(&dns, format)?,
            }
        }

        SystemCommands::AdStatus => {
            let status = api.ad.status().await?;
            match ctx.format {
                OutputFormat::Table => {
                    println!("Active Directory:");
                    println!("  Available: {}", output::yes_no(status.available));
                    println!("  Enabled: {}", output::yes_no(status.enabled));
                }
                format => output::print_single(&status, format)?,
            }
        }

        SystemCommands::AdConfig => {
            let config = api.ad.config().await?;
            output::print_single(&config, ctx.format)?;
        }

        SystemCommands::AdTest => {
            ctx.with_spinner("Testing directory connection...", api.ad.test_connection())
                .await?;
            output::print_success("Active Directory connection succeeded");
        }

        SystemCommands::Monitoring => {
            let config = api.monitoring.config().await?;
            match ctx.format {
                OutputFormat::Table => {
                    println!("Monitoring:");
                    println!("  Prometheus: {}", output::yes_no(config.prometheus_enabled));
                    println!("  Grafana: {}", output::or_dash(&config.grafana_url));
                    println!("  Datadog: {}", output::yes_no(config.datadog_enabled));
                }
                format => output::print_single(&config, format)?,
            }
        }

        SystemCommands::ConfigureMonitoring {
            prometheus,
            grafana_url,
            datadog,
        } => {
            let mut config = api.monitoring.config().await?;
            if let Some(enabled) = prometheus {
                config.prometheus_enabled = enabled;
            }
            if let Some(url) = grafana_url {
                config.grafana_url = url;
            }
            if let Some(enabled) = datadog {
                config.datadog_enabled = enabled;
            }
            api.monitoring.update_config(&config).await?;
            output::print_success("Monitoring configuration saved");
        }
    }

    Ok(())
}
