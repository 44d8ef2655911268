//! nasctl
//!
//! Command-line console for a NAS management backend: NFS exports, Samba
//! shares, pools, disks, accounts, schedules and backups.

mod commands;
mod config;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::accounts::{GroupCommands, UserCommands};
use commands::auth::AuthCommands;
use commands::backup::BackupCommands;
use commands::nfs::NfsCommands;
use commands::services::{UpsCommands, VpnCommands};
use commands::smb::SmbCommands;
use commands::storage::{DiskCommands, ShareCommands, VolumeCommands};
use commands::syslib::{RaidCommands, SmartCommands, ZfsCommands};
use commands::system::SystemCommands;
use commands::tasks::TaskCommands;
use commands::Context;
use nasctl_console::ApiClient;
use output::OutputFormat;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// API server address, defaults to the configured server
    #[arg(short, long, env = "NASCTL_SERVER")]
    server: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long)]
    output: Option<String>,

    /// More log output, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Answer yes to confirmation prompts
    #[arg(short = 'y', long = "yes", global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, log out, inspect the session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Manage NFS exports
    Nfs {
        #[command(subcommand)]
        command: NfsCommands,
    },
    /// Manage Samba shares
    Smb {
        #[command(subcommand)]
        command: SmbCommands,
    },
    /// Manage ZFS pools, datasets and snapshots
    Zfs {
        #[command(subcommand)]
        command: ZfsCommands,
    },
    /// Manage software RAID arrays
    Raid {
        #[command(subcommand)]
        command: RaidCommands,
    },
    /// SMART health and self-tests
    Smart {
        #[command(subcommand)]
        command: SmartCommands,
    },
    /// Inspect and prepare disks
    Disk {
        #[command(subcommand)]
        command: DiskCommands,
    },
    /// Manage volumes
    Volume {
        #[command(subcommand)]
        command: VolumeCommands,
    },
    /// Manage protocol-neutral shares
    Share {
        #[command(subcommand)]
        command: ShareCommands,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage groups
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },
    /// Manage scheduled tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Manage backup jobs
    Backup {
        #[command(subcommand)]
        command: BackupCommands,
    },
    /// Manage VPN protocols and peers
    Vpn {
        #[command(subcommand)]
        command: VpnCommands,
    },
    /// UPS status and settings
    Ups {
        #[command(subcommand)]
        command: UpsCommands,
    },
    /// Host, network and directory information
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return;
    }

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = config::Config::load().unwrap_or_default().with_env();

    let _log_guard = logging::LoggingConfig::from_settings(
        cli.verbose,
        &config.log_level,
        config.log_dir.as_deref(),
        &config.log_rotation,
    )
    .init()?;

    let server = cli
        .server
        .clone()
        .unwrap_or_else(|| config.default_server.clone());
    let format = OutputFormat::parse(cli.output.as_deref().unwrap_or(&config.default_output));
    debug!(server = %server, ?format, "Starting");

    let client = Arc::new(ApiClient::with_timeout(
        &server,
        Duration::from_secs(config.timeout_secs),
    )?);
    if let Some(token) = &config.token {
        client.set_token(token.clone()).await;
    }

    let ctx = Context::new(client, format, cli.yes);

    match cli.command {
        Commands::Auth { command } => {
            commands::auth::handle_auth_command(command, &ctx, &mut config).await?
        }
        Commands::Nfs { command } => commands::nfs::handle_nfs_command(command, &ctx).await?,
        Commands::Smb { command } => commands::smb::handle_smb_command(command, &ctx).await?,
        Commands::Zfs { command } => commands::syslib::handle_zfs_command(command, &ctx).await?,
        Commands::Raid { command } => commands::syslib::handle_raid_command(command, &ctx).await?,
        Commands::Smart { command } => {
            commands::syslib::handle_smart_command(command, &ctx).await?
        }
        Commands::Disk { command } => commands::storage::handle_disk_command(command, &ctx).await?,
        Commands::Volume { command } => {
            commands::storage::handle_volume_command(command, &ctx).await?
        }
        Commands::Share { command } => {
            commands::storage::handle_share_command(command, &ctx).await?
        }
        Commands::User { command } => {
            commands::accounts::handle_user_command(command, &ctx).await?
        }
        Commands::Group { command } => {
            commands::accounts::handle_group_command(command, &ctx).await?
        }
        Commands::Task { command } => commands::tasks::handle_task_command(command, &ctx).await?,
        Commands::Backup { command } => {
            commands::backup::handle_backup_command(command, &ctx).await?
        }
        Commands::Vpn { command } => commands::services::handle_vpn_command(command, &ctx).await?,
        Commands::Ups { command } => commands::services::handle_ups_command(command, &ctx).await?,
        Commands::System { command } => {
            commands::system::handle_system_command(command, &ctx).await?
        }
        Commands::Completions { shell } => generate_completions(shell),
    }

    Ok(())
}

/// Generate shell completions
fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_nfs_create() {
        let cli = Cli::try_parse_from([
            "nasctl",
            "-o",
            "json",
            "nfs",
            "create",
            "/srv/media",
            "-c",
            "10.0.0.0/24",
            "-t",
            "sync",
        ])
        .unwrap();
        assert_eq!(cli.output.as_deref(), Some("json"));
        assert!(matches!(cli.command, Commands::Nfs { .. }));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["nasctl", "user", "delete", "7", "-y", "-vv"]).unwrap();
        assert!(cli.yes);
        assert_eq!(cli.verbose, 2);
    }
}
