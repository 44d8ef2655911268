//! Authentication commands

use super::Context;
use crate::config::Config;
use crate::output::{self, OutputFormat};
use anyhow::{anyhow, Result};
use clap::Subcommand;
use tracing::warn;

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Log in to the NAS and store the access token
    Login {
        #[arg(short, long)]
        username: String,

        /// Prompted when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// End the session and forget the stored token
    Logout,

    /// Show stored credentials
    Status,

    /// Show the account the token belongs to
    Whoami,
}

pub async fn handle_auth_command(
    command: AuthCommands,
    ctx: &Context,
    config: &mut Config,
) -> Result<()> {
    match command {
        AuthCommands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")?,
            };

            let response = ctx
                .with_spinner(
                    "Logging in...",
                    ctx.api.system.login_with(&ctx.client, &username, &password),
                )
                .await?;

            config.token = ctx.client.get_token().await;
            config.username = Some(
                response
                    .user
                    .as_ref()
                    .map(|u| u.username.clone())
                    .unwrap_or_else(|| username.clone()),
            );
            config.save()?;

            output::print_success("Login successful");
            if let Some(user) = &response.user {
                println!("  Username: {}", user.username);
                println!("  Role: {}", user.role);
            }
        }

        AuthCommands::Logout => {
            if config.token.is_some() {
                if let Err(e) = ctx.api.system.logout().await {
                    warn!(error = %e, "Server-side logout failed");
                }
            }
            ctx.client.clear_token().await;

            config.token = None;
            config.username = None;
            config.save()?;

            output::print_success("Logged out");
        }

        AuthCommands::Status => match (&config.token, &config.username) {
            (Some(token), username) => {
                println!(
                    "Authenticated as: {}",
                    username.as_deref().unwrap_or("(unknown user)")
                );
                let shown: String = token.chars().take(12).collect();
                println!("Token: {}...", shown);
                println!("Server: {}", ctx.client.base_url());
            }
            (None, _) => {
                println!("Not authenticated");
                println!("Use 'nasctl auth login' to authenticate");
            }
        },

        AuthCommands::Whoami => {
            if ctx.client.get_token().await.is_none() {
                return Err(anyhow!("Not logged in. Use 'nasctl auth login' first"));
            }
            let user = ctx.api.system.me().await?;
            match ctx.format {
                OutputFormat::Table => {
                    println!("{} ({})", user.username, user.role);
                    if !user.email.is_empty() {
                        println!("  Email: {}", user.email);
                    }
                }
                format => output::print_single(&user, format)?,
            }
        }
    }

    Ok(())
}
